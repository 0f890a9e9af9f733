//! The property directory.
//!
//! [`PropertyDirectory`] owns four indexes behind a single reader/writer lock:
//!
//! | Index | Key | Semantics |
//! |---|---|---|
//! | active by name | qualified name | unique |
//! | active by prefix | entry set | ordered by [`PropertyDescriptor::total_order_cmp`] |
//! | pending by name | qualified name | unique, disjoint from active |
//! | pending by prefix | entry set | set, unordered |
//!
//! A descriptor's `deferred` flag picks its family at registration and it
//! never moves between families afterwards. Moving a property requires
//! removing it and registering it again.
//!
//! Queries copy matches into a fresh `Vec` under the read lock; callers never
//! hold the lock or see a live view.

mod index;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, warn};

pub use self::index::{Family, InvariantViolation};
use self::index::Indexes;
use crate::builder::BuilderChain;
use crate::config::DirectoryConfig;
use crate::decl::{ConfigurableClass, ConfigurableField};
use crate::error::{RegistryError, Result};
use crate::property::PropertyDescriptor;
use crate::store::PropertyStore;
use crate::summary::ComponentProperty;

/// Catalog of configurable properties.
///
/// One directory is created per process at bring-up and shared by reference
/// or [`Arc`] with every subsystem that registers or queries properties.
pub struct PropertyDirectory {
	chain: BuilderChain,
	config: DirectoryConfig,
	indexes: RwLock<Indexes>,
}

impl PropertyDirectory {
	/// Creates an empty directory driven by `chain`.
	pub fn new(chain: BuilderChain) -> Self {
		Self::with_config(chain, DirectoryConfig::default())
	}

	pub fn with_config(chain: BuilderChain, config: DirectoryConfig) -> Self {
		Self {
			chain,
			config,
			indexes: RwLock::new(Indexes::default()),
		}
	}

	/// Creates a directory with [`BuilderChain::standard`] over `store`.
	pub fn standard(store: Arc<dyn PropertyStore>, config: DirectoryConfig) -> Self {
		Self::with_config(BuilderChain::standard(store), config)
	}

	pub fn config(&self) -> &DirectoryConfig {
		&self.config
	}

	/// Builds the property for `field` and files it under its family.
	///
	/// Returns `Ok(None)` when every builder declines, or when a deferred
	/// property's name is already taken (first registration wins). A second
	/// active registration of a name is a [`RegistryError::DuplicateRegistration`]
	/// and leaves the directory unchanged.
	///
	/// The builder chain runs under the writer lock, so a builder blocking on
	/// its store stalls every other registration and query until it returns.
	pub fn register(
		&self,
		class: &ConfigurableClass,
		field: &ConfigurableField,
	) -> Result<Option<Arc<PropertyDescriptor>>> {
		let mut indexes = self.indexes.write();

		let Some(prop) = self
			.chain
			.build(class, field, self.config.builder_failures)?
		else {
			return Ok(None);
		};

		if prop.is_deferred() {
			if let Some((family, existing)) = indexes.owner(prop.qualified_name()) {
				debug!(
					qualified_name = prop.qualified_name(),
					%family,
					existing = existing.defining_type(),
					ignored = prop.defining_type(),
					"pending property already registered",
				);
				return Ok(None);
			}
			let prop = Arc::new(prop);
			indexes.insert_pending(prop.clone());
			return Ok(Some(prop));
		}

		if let Some((_, existing)) = indexes.owner(prop.qualified_name()) {
			let err = RegistryError::DuplicateRegistration {
				qualified_name: prop.qualified_name().to_string(),
				existing: existing.defining_type().to_string(),
				conflicting: prop.defining_type().to_string(),
			};
			error!(
				qualified_name = prop.qualified_name(),
				existing = existing.defining_type(),
				conflicting = prop.defining_type(),
				"duplicate configurable property",
			);
			return Err(err);
		}

		let prop = Arc::new(prop);
		indexes.insert_active(prop.clone());
		Ok(Some(prop))
	}

	/// Adds an already built property to the active family.
	///
	/// Returns `false` without touching the directory if the name is taken by
	/// either family or if the property is deferred.
	pub fn add_active(&self, prop: impl Into<Arc<PropertyDescriptor>>) -> bool {
		let prop = prop.into();
		if prop.is_deferred() {
			warn!(
				qualified_name = prop.qualified_name(),
				"refusing to add a deferred property to the active index",
			);
			return false;
		}

		let mut indexes = self.indexes.write();
		if indexes.owner(prop.qualified_name()).is_some() {
			return false;
		}
		indexes.insert_active(prop);
		true
	}

	/// Removes the active property registered under `prop`'s qualified name.
	pub fn remove_active(&self, prop: &PropertyDescriptor) {
		self.remove_active_by_name(prop.qualified_name());
	}

	/// Removes the active property named `qualified_name`, returning it.
	pub fn remove_active_by_name(&self, qualified_name: &str) -> Option<Arc<PropertyDescriptor>> {
		self.indexes.write().remove_active(qualified_name)
	}

	/// Returns the active entry set names in order.
	pub fn entry_set_names(&self) -> Vec<String> {
		self.indexes.read().entry_set_names().cloned().collect()
	}

	/// Returns every active property, grouped by entry set in order.
	pub fn all(&self) -> Vec<Arc<PropertyDescriptor>> {
		self.indexes.read().all_active().cloned().collect()
	}

	/// Returns the active properties of one entry set in order.
	pub fn entry_set(&self, prefix: &str) -> Vec<Arc<PropertyDescriptor>> {
		self.indexes.read().entry_set(prefix).cloned().collect()
	}

	/// Returns the active properties of one entry set with a matching alias.
	pub fn entry_set_for_alias(&self, prefix: &str, alias: &str) -> Vec<Arc<PropertyDescriptor>> {
		self.indexes
			.read()
			.entry_set(prefix)
			.filter(|p| p.alias() == alias)
			.cloned()
			.collect()
	}

	/// Looks up an active property. Pending properties are not visible here.
	pub fn get(&self, qualified_name: &str) -> Result<Arc<PropertyDescriptor>> {
		self.indexes
			.read()
			.active(qualified_name)
			.cloned()
			.ok_or_else(|| RegistryError::NotFound(qualified_name.to_string()))
	}

	/// Returns every pending property with its entry set. Order is unspecified.
	pub fn pending_entries(&self) -> Vec<(String, Arc<PropertyDescriptor>)> {
		self.indexes
			.read()
			.pending_entries()
			.map(|(prefix, p)| (prefix.clone(), p.clone()))
			.collect()
	}

	/// Returns the pending properties of one entry set. Order is unspecified.
	pub fn pending_entry_set(&self, prefix: &str) -> Vec<Arc<PropertyDescriptor>> {
		self.indexes.read().pending_entry_set(prefix).cloned().collect()
	}

	/// Management view of one entry set.
	pub fn component_properties(&self, prefix: &str) -> Vec<ComponentProperty> {
		self.entry_set(prefix)
			.iter()
			.map(|p| ComponentProperty::from(&**p))
			.collect()
	}

	/// Management view of one entry set, restricted to an alias.
	pub fn component_properties_for_alias(&self, prefix: &str, alias: &str) -> Vec<ComponentProperty> {
		self.entry_set_for_alias(prefix, alias)
			.iter()
			.map(|p| ComponentProperty::from(&**p))
			.collect()
	}

	/// Number of active properties.
	pub fn len(&self) -> usize {
		self.indexes.read().active_len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of pending properties.
	pub fn pending_len(&self) -> usize {
		self.indexes.read().pending_len()
	}

	/// Verifies the index invariants under the read lock.
	pub fn check_consistency(&self) -> std::result::Result<(), InvariantViolation> {
		self.indexes.read().check()
	}
}

impl core::fmt::Debug for PropertyDirectory {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let indexes = self.indexes.read();
		f.debug_struct("PropertyDirectory")
			.field("chain", &self.chain)
			.field("config", &self.config)
			.field("active", &indexes.active_len())
			.field("pending", &indexes.pending_len())
			.finish()
	}
}
