//! In-memory directory backend.

use crate::connection::{DirectoryConnection, EntryStream};
use crate::error::ProtocolError;
use crate::filter::Filter;
use crate::request::{SearchEntry, SearchFilter, SearchRequest, SearchScope};

/// A fixed tree of entries answering searches locally.
///
/// Aliases are not modelled, so `deref_aliases` has no effect. The time
/// limit is not enforced.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
	entries: Vec<SearchEntry>,
	closed: bool,
}

impl MemoryDirectory {
	pub fn new(entries: impl IntoIterator<Item = SearchEntry>) -> Self {
		Self {
			entries: entries.into_iter().collect(),
			closed: false,
		}
	}

	pub fn insert(&mut self, entry: SearchEntry) {
		self.entries.push(entry);
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}

	fn exists(&self, dn: &str) -> bool {
		dn.is_empty() || self.entries.iter().any(|e| e.dn.eq_ignore_ascii_case(dn))
	}
}

impl DirectoryConnection for MemoryDirectory {
	fn search(&mut self, request: &SearchRequest) -> Result<EntryStream, ProtocolError> {
		if self.closed {
			return Err(ProtocolError::Unavailable("connection closed".to_string()));
		}
		if !self.exists(&request.base_dn) {
			return Err(ProtocolError::NoSuchObject(request.base_dn.clone()));
		}

		let matcher: Box<dyn Fn(&SearchEntry) -> bool> = match &request.filter {
			SearchFilter::Expression(expr) => {
				let filter = Filter::parse(expr)?;
				Box::new(move |entry| filter.matches(entry))
			}
			SearchFilter::Matching(attrs) => {
				let attrs = attrs.clone();
				Box::new(move |entry| {
					attrs.iter().all(|(name, value)| {
						entry.get(name).is_some_and(|values| {
							value.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case(value))
						})
					})
				})
			}
		};

		let found: Vec<_> = self
			.entries
			.iter()
			.filter(|e| in_scope(&e.dn, &request.base_dn, request.scope))
			.filter(|e| matcher(*e))
			.map(|e| match &request.attributes {
				Some(names) => e.project(names),
				None => e.clone(),
			})
			.collect();
		Ok(Box::new(found.into_iter().map(Ok)))
	}

	fn close(&mut self) -> Result<(), ProtocolError> {
		self.closed = true;
		Ok(())
	}
}

fn parent(dn: &str) -> &str {
	dn.split_once(',').map_or("", |(_, parent)| parent.trim_start())
}

fn in_scope(dn: &str, base: &str, scope: SearchScope) -> bool {
	match scope {
		SearchScope::Base => dn.eq_ignore_ascii_case(base),
		SearchScope::OneLevel => !dn.is_empty() && parent(dn).eq_ignore_ascii_case(base),
		SearchScope::Subtree => {
			if base.is_empty() || dn.eq_ignore_ascii_case(base) {
				return true;
			}
			let dn = dn.to_ascii_lowercase();
			let suffix = format!(",{}", base.to_ascii_lowercase());
			dn.ends_with(&suffix)
		}
	}
}
