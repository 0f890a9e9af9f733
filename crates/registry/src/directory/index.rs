//! The four indexes behind the directory lock.
//!
//! Every mutation goes through [`Indexes`] so the by-name and by-prefix
//! views of a family are updated together.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use thiserror::Error;

use crate::property::PropertyDescriptor;

/// Index family a property lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
	Active,
	Pending,
}

impl std::fmt::Display for Family {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Family::Active => write!(f, "active"),
			Family::Pending => write!(f, "pending"),
		}
	}
}

/// A broken index invariant found by
/// [`PropertyDirectory::check_consistency`](super::PropertyDirectory::check_consistency).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
	#[error("{0} is registered as both active and pending")]
	BothFamilies(String),
	#[error("{family} index holds {qualified_name} under the wrong key")]
	MisfiledName { family: Family, qualified_name: String },
	#[error("{family} prefix index disagrees with the name index for {qualified_name}")]
	PrefixMismatch { family: Family, qualified_name: String },
	#[error("{family} prefix index has an empty entry set {prefix}")]
	EmptyEntrySet { family: Family, prefix: String },
}

#[derive(Default)]
pub(super) struct Indexes {
	active_by_name: HashMap<String, Arc<PropertyDescriptor>>,
	/// Entry set -> descriptors in total order.
	active_by_prefix: BTreeMap<String, BTreeSet<Arc<PropertyDescriptor>>>,
	pending_by_name: HashMap<String, Arc<PropertyDescriptor>>,
	/// Entry set -> qualified name -> descriptor. No ordering guarantee.
	pending_by_prefix: HashMap<String, HashMap<String, Arc<PropertyDescriptor>>>,
}

impl Indexes {
	pub fn active(&self, qualified_name: &str) -> Option<&Arc<PropertyDescriptor>> {
		self.active_by_name.get(qualified_name)
	}

	pub fn pending(&self, qualified_name: &str) -> Option<&Arc<PropertyDescriptor>> {
		self.pending_by_name.get(qualified_name)
	}

	/// Returns the family and owner already holding `qualified_name`.
	pub fn owner(&self, qualified_name: &str) -> Option<(Family, &Arc<PropertyDescriptor>)> {
		self.active(qualified_name)
			.map(|p| (Family::Active, p))
			.or_else(|| self.pending(qualified_name).map(|p| (Family::Pending, p)))
	}

	/// Inserts into both active indexes. The caller has checked the name is free.
	pub fn insert_active(&mut self, prop: Arc<PropertyDescriptor>) {
		debug_assert!(self.owner(prop.qualified_name()).is_none());
		self.active_by_prefix
			.entry(prop.entry_set_name().to_string())
			.or_default()
			.insert(prop.clone());
		self.active_by_name
			.insert(prop.qualified_name().to_string(), prop);
	}

	/// Inserts into both pending indexes. The caller has checked the name is free.
	pub fn insert_pending(&mut self, prop: Arc<PropertyDescriptor>) {
		debug_assert!(self.owner(prop.qualified_name()).is_none());
		self.pending_by_prefix
			.entry(prop.entry_set_name().to_string())
			.or_default()
			.insert(prop.qualified_name().to_string(), prop.clone());
		self.pending_by_name
			.insert(prop.qualified_name().to_string(), prop);
	}

	/// Removes an active property from both indexes.
	pub fn remove_active(&mut self, qualified_name: &str) -> Option<Arc<PropertyDescriptor>> {
		let prop = self.active_by_name.remove(qualified_name)?;
		if let Some(set) = self.active_by_prefix.get_mut(prop.entry_set_name()) {
			set.remove(&prop);
			if set.is_empty() {
				self.active_by_prefix.remove(prop.entry_set_name());
			}
		}
		Some(prop)
	}

	pub fn entry_set_names(&self) -> impl Iterator<Item = &String> {
		self.active_by_prefix.keys()
	}

	pub fn entry_set(&self, prefix: &str) -> impl Iterator<Item = &Arc<PropertyDescriptor>> {
		self.active_by_prefix.get(prefix).into_iter().flatten()
	}

	pub fn all_active(&self) -> impl Iterator<Item = &Arc<PropertyDescriptor>> {
		self.active_by_prefix.values().flatten()
	}

	pub fn pending_entries(&self) -> impl Iterator<Item = (&String, &Arc<PropertyDescriptor>)> {
		self.pending_by_prefix
			.iter()
			.flat_map(|(prefix, set)| set.values().map(move |p| (prefix, p)))
	}

	pub fn pending_entry_set(&self, prefix: &str) -> impl Iterator<Item = &Arc<PropertyDescriptor>> {
		self.pending_by_prefix
			.get(prefix)
			.into_iter()
			.flat_map(|set| set.values())
	}

	pub fn active_len(&self) -> usize {
		self.active_by_name.len()
	}

	pub fn pending_len(&self) -> usize {
		self.pending_by_name.len()
	}

	/// Verifies family disjointness and that each prefix index is exactly the
	/// grouping of its name index.
	pub fn check(&self) -> Result<(), InvariantViolation> {
		for name in self.active_by_name.keys() {
			if self.pending_by_name.contains_key(name) {
				return Err(InvariantViolation::BothFamilies(name.clone()));
			}
		}

		for (name, prop) in &self.active_by_name {
			if prop.qualified_name() != name {
				return Err(InvariantViolation::MisfiledName {
					family: Family::Active,
					qualified_name: prop.qualified_name().to_string(),
				});
			}
			let filed = self
				.active_by_prefix
				.get(prop.entry_set_name())
				.and_then(|set| set.get(prop))
				.is_some_and(|p| Arc::ptr_eq(p, prop));
			if !filed {
				return Err(InvariantViolation::PrefixMismatch {
					family: Family::Active,
					qualified_name: name.clone(),
				});
			}
		}
		for (prefix, set) in &self.active_by_prefix {
			if set.is_empty() {
				return Err(InvariantViolation::EmptyEntrySet {
					family: Family::Active,
					prefix: prefix.clone(),
				});
			}
			for prop in set {
				let owned = self
					.active_by_name
					.get(prop.qualified_name())
					.is_some_and(|p| Arc::ptr_eq(p, prop));
				if prop.entry_set_name() != prefix || !owned {
					return Err(InvariantViolation::PrefixMismatch {
						family: Family::Active,
						qualified_name: prop.qualified_name().to_string(),
					});
				}
			}
		}

		for (name, prop) in &self.pending_by_name {
			if prop.qualified_name() != name {
				return Err(InvariantViolation::MisfiledName {
					family: Family::Pending,
					qualified_name: prop.qualified_name().to_string(),
				});
			}
			let filed = self
				.pending_by_prefix
				.get(prop.entry_set_name())
				.and_then(|set| set.get(name))
				.is_some_and(|p| Arc::ptr_eq(p, prop));
			if !filed {
				return Err(InvariantViolation::PrefixMismatch {
					family: Family::Pending,
					qualified_name: name.clone(),
				});
			}
		}
		for (prefix, set) in &self.pending_by_prefix {
			if set.is_empty() {
				return Err(InvariantViolation::EmptyEntrySet {
					family: Family::Pending,
					prefix: prefix.clone(),
				});
			}
			for (name, prop) in set {
				let owned = self
					.pending_by_name
					.get(name)
					.is_some_and(|p| Arc::ptr_eq(p, prop));
				if prop.entry_set_name() != prefix || !owned {
					return Err(InvariantViolation::PrefixMismatch {
						family: Family::Pending,
						qualified_name: name.clone(),
					});
				}
			}
		}

		Ok(())
	}
}
