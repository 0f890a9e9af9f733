//! Builders for store-backed properties.
//!
//! Both read the initial value from a [`PropertyStore`] and attach a
//! [`WriteThrough`] listener. Store reads happen while the directory's writer
//! lock is held, so a slow store stalls every concurrent registration.

use std::sync::Arc;

use super::{BuildOutcome, PropertyBuilder, check_names, describe};
use crate::decl::{ConfigurableClass, ConfigurableField, PropertyStorage};
use crate::error::BuildError;
use crate::store::{PropertyStore, StoreKey, WriteThrough};

/// Builds [`PropertyStorage::Singleton`] properties named `root.field`.
pub struct SingletonStoreBuilder {
	store: Arc<dyn PropertyStore>,
}

impl SingletonStoreBuilder {
	pub fn new(store: Arc<dyn PropertyStore>) -> Self {
		Self { store }
	}
}

impl PropertyBuilder for SingletonStoreBuilder {
	fn name(&self) -> &'static str {
		"singleton-store"
	}

	fn build(&self, class: &ConfigurableClass, field: &ConfigurableField) -> BuildOutcome {
		if class.storage != PropertyStorage::Singleton {
			return BuildOutcome::Declined;
		}
		if let Err(e) = check_names(class, field) {
			return BuildOutcome::Failed(e);
		}

		let Some(key) = class.store_key(field) else {
			return BuildOutcome::Declined;
		};
		let qualified_name = key.to_string();
		let alias = class.alias.as_deref().unwrap_or(class.root.as_str());
		build_stored(&self.store, class, field, key, qualified_name, alias)
	}
}

/// Builds [`PropertyStorage::PerComponent`] properties named
/// `component.root.field`, aliased by component.
pub struct ComponentStoreBuilder {
	store: Arc<dyn PropertyStore>,
}

impl ComponentStoreBuilder {
	pub fn new(store: Arc<dyn PropertyStore>) -> Self {
		Self { store }
	}
}

impl PropertyBuilder for ComponentStoreBuilder {
	fn name(&self) -> &'static str {
		"component-store"
	}

	fn build(&self, class: &ConfigurableClass, field: &ConfigurableField) -> BuildOutcome {
		if class.storage != PropertyStorage::PerComponent {
			return BuildOutcome::Declined;
		}
		if let Err(e) = check_names(class, field) {
			return BuildOutcome::Failed(e);
		}
		let Some(key) = class.store_key(field) else {
			return BuildOutcome::Failed(BuildError::MissingComponent {
				class: class.name.clone(),
			});
		};
		let qualified_name = key.to_string();
		let component = key.component.clone().unwrap_or_default();
		build_stored(&self.store, class, field, key, qualified_name, &component)
	}
}

fn build_stored(
	store: &Arc<dyn PropertyStore>,
	class: &ConfigurableClass,
	field: &ConfigurableField,
	key: StoreKey,
	qualified_name: String,
	alias: &str,
) -> BuildOutcome {
	let value = match store.load(&key) {
		Ok(Some(value)) => value,
		Ok(None) => field.default.clone().unwrap_or_default(),
		Err(e) => return BuildOutcome::Failed(e.into()),
	};
	let listener = Arc::new(WriteThrough::new(store.clone(), key));
	BuildOutcome::Built(
		describe(class, field, qualified_name, alias)
			.with_value(value)
			.with_listener(listener),
	)
}
