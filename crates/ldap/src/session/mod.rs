//! Directory search sessions.
//!
//! A [`DirectorySession`] owns one [`DirectoryConnection`] and releases it
//! exactly once: on [`close`](DirectorySession::close) or, failing that, when
//! the session is dropped.


use tracing::{debug, error};

use crate::config::SessionConfig;
use crate::connection::{DirectoryConnection, EntryStream};
use crate::error::SessionError;
use crate::request::{SearchEntry, SearchFilter, SearchRequest, SearchScope};

/// A scoped search session over a directory connection.
pub struct DirectorySession<C: DirectoryConnection> {
	connection: Option<C>,
	config: SessionConfig,
}

impl<C: DirectoryConnection> DirectorySession<C> {
	pub fn new(connection: C, config: SessionConfig) -> Self {
		Self {
			connection: Some(connection),
			config,
		}
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn is_open(&self) -> bool {
		self.connection.is_some()
	}

	/// The underlying connection, while the session is open.
	pub fn connection(&self) -> Option<&C> {
		self.connection.as_ref()
	}

	/// Searches the subtree under `base_dn` with a string filter.
	///
	/// Aliases are dereferenced per [`SessionConfig::deref_aliases`] and the
	/// server is asked to stop after [`SessionConfig::time_limit`].
	/// `attributes` restricts the returned attributes; `None` returns all.
	pub fn search(
		&mut self,
		base_dn: &str,
		filter: &str,
		attributes: Option<&[&str]>,
	) -> Result<Entries, SessionError> {
		self.run(SearchRequest {
			base_dn: base_dn.to_string(),
			filter: SearchFilter::Expression(filter.to_string()),
			scope: SearchScope::Subtree,
			attributes: attribute_list(attributes),
			deref_aliases: self.config.deref_aliases,
			time_limit: Some(self.config.time_limit()),
		})
	}

	/// Searches the direct children of `base_dn` for entries carrying every
	/// `(attribute, value)` pair. No time limit is requested.
	pub fn search_matching(
		&mut self,
		base_dn: &str,
		matching: &[(&str, &str)],
		attributes: Option<&[&str]>,
	) -> Result<Entries, SessionError> {
		let matching = matching
			.iter()
			.map(|(name, value)| (name.to_string(), value.to_string()))
			.collect();
		self.run(SearchRequest {
			base_dn: base_dn.to_string(),
			filter: SearchFilter::Matching(matching),
			scope: SearchScope::OneLevel,
			attributes: attribute_list(attributes),
			deref_aliases: self.config.deref_aliases,
			time_limit: None,
		})
	}

	/// Releases the connection. Closing a closed session does nothing.
	pub fn close(&mut self) -> Result<(), SessionError> {
		let Some(mut connection) = self.connection.take() else {
			return Ok(());
		};
		connection.close().map_err(|source| {
			error!(error = %source, "failed to close directory session");
			SessionError::Close(source)
		})
	}

	fn run(&mut self, request: SearchRequest) -> Result<Entries, SessionError> {
		let Some(connection) = self.connection.as_mut() else {
			return Err(SessionError::Closed);
		};

		debug!(base_dn = %request.base_dn, filter = %request.filter, scope = ?request.scope, "directory search");
		match connection.search(&request) {
			Ok(stream) => Ok(Entries {
				stream: Some(stream),
				base_dn: request.base_dn,
				filter: request.filter.to_string(),
			}),
			Err(source) => {
				error!(
					base_dn = %request.base_dn,
					filter = %request.filter,
					error = %source,
					"directory search failed",
				);
				Err(SessionError::Search {
					base_dn: request.base_dn,
					filter: request.filter.to_string(),
					source,
				})
			}
		}
	}
}

impl<C: DirectoryConnection> Drop for DirectorySession<C> {
	fn drop(&mut self) {
		if let Some(mut connection) = self.connection.take()
			&& let Err(error) = connection.close()
		{
			error!(%error, "failed to close directory session");
		}
	}
}

impl<C: DirectoryConnection> core::fmt::Debug for DirectorySession<C> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("DirectorySession")
			.field("open", &self.is_open())
			.field("config", &self.config)
			.finish()
	}
}

fn attribute_list(attributes: Option<&[&str]>) -> Option<Vec<String>> {
	attributes.map(|names| names.iter().map(|n| n.to_string()).collect())
}

/// Results of one search, yielded in server order.
///
/// A protocol error while streaming is yielded once, wrapped with the
/// search's base DN and filter, and ends the stream.
pub struct Entries {
	stream: Option<EntryStream>,
	base_dn: String,
	filter: String,
}

impl Iterator for Entries {
	type Item = Result<SearchEntry, SessionError>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.stream.as_mut()?.next()? {
			Ok(entry) => Some(Ok(entry)),
			Err(source) => {
				self.stream = None;
				error!(
					base_dn = %self.base_dn,
					filter = %self.filter,
					error = %source,
					"directory search failed",
				);
				Some(Err(SessionError::Search {
					base_dn: self.base_dn.clone(),
					filter: self.filter.clone(),
					source,
				}))
			}
		}
	}
}

impl core::fmt::Debug for Entries {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Entries")
			.field("base_dn", &self.base_dn)
			.field("filter", &self.filter)
			.field("done", &self.stream.is_none())
			.finish()
	}
}
