//! Value stores backing persisted properties.
//!
//! Store-backed builders read a property's initial value from a
//! [`PropertyStore`] and attach a [`WriteThrough`] listener so later updates
//! are persisted before the in-memory value changes. Stores hold values only;
//! registrations themselves are never persisted.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::error::{PropertyError, StoreError};
use crate::property::{PropertyChangeListener, PropertyDescriptor};

/// Location of one persisted value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey {
	/// Component instance for per-component properties.
	pub component: Option<String>,
	pub entry_set: String,
	pub field: String,
}

impl StoreKey {
	pub fn singleton(entry_set: impl Into<String>, field: impl Into<String>) -> Self {
		Self {
			component: None,
			entry_set: entry_set.into(),
			field: field.into(),
		}
	}

	pub fn component(
		component: impl Into<String>,
		entry_set: impl Into<String>,
		field: impl Into<String>,
	) -> Self {
		Self {
			component: Some(component.into()),
			entry_set: entry_set.into(),
			field: field.into(),
		}
	}

	/// Parses the dotted form used in manifests: `root.field` or
	/// `component.root.field`.
	pub fn parse(dotted: &str) -> Option<Self> {
		let parts: Vec<&str> = dotted.split('.').collect();
		if parts.iter().any(|p| p.is_empty()) {
			return None;
		}
		match parts.as_slice() {
			[entry_set, field] => Some(Self::singleton(*entry_set, *field)),
			[component, entry_set, field] => Some(Self::component(*component, *entry_set, *field)),
			_ => None,
		}
	}
}

impl fmt::Display for StoreKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(component) = &self.component {
			write!(f, "{component}.")?;
		}
		write!(f, "{}.{}", self.entry_set, self.field)
	}
}

/// Persistence backend for property values.
///
/// Calls may block; builders invoke [`load`](Self::load) while the directory's
/// writer lock is held.
pub trait PropertyStore: Send + Sync {
	fn load(&self, key: &StoreKey) -> Result<Option<String>, StoreError>;
	fn store(&self, key: &StoreKey, value: &str) -> Result<(), StoreError>;
}

/// In-process [`PropertyStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-populated with `values`.
	pub fn with_values<I>(values: I) -> Self
	where
		I: IntoIterator<Item = (StoreKey, String)>,
	{
		Self {
			values: Mutex::new(values.into_iter().collect()),
		}
	}

	pub fn get(&self, key: &StoreKey) -> Option<String> {
		self.values.lock().get(key).cloned()
	}

	pub fn len(&self) -> usize {
		self.values.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.lock().is_empty()
	}
}

impl PropertyStore for MemoryStore {
	fn load(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
		Ok(self.get(key))
	}

	fn store(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
		self.values.lock().insert(key.clone(), value.to_string());
		Ok(())
	}
}

/// Change listener persisting accepted values to a store.
pub struct WriteThrough {
	store: Arc<dyn PropertyStore>,
	key: StoreKey,
}

impl WriteThrough {
	pub fn new(store: Arc<dyn PropertyStore>, key: StoreKey) -> Self {
		Self { store, key }
	}
}

impl PropertyChangeListener for WriteThrough {
	fn fire_change(&self, property: &PropertyDescriptor, new_value: &str) -> Result<(), PropertyError> {
		self.store
			.store(&self.key, new_value)
			.map_err(|source| PropertyError::Persist {
				property: property.qualified_name().to_string(),
				source,
			})
	}
}
