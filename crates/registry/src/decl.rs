//! Declarations of configurable classes and fields.
//!
//! Subsystems describe the properties they expose as plain data and hand
//! them to the directory at startup through [`PropertySource`], or through a
//! TOML [`PropertyManifest`](crate::manifest::PropertyManifest).

use serde::{Deserialize, Serialize};

use crate::property::WidgetType;
use crate::store::StoreKey;

/// Where a property's value comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStorage {
	/// Value lives only in memory, seeded from the field default.
	#[default]
	Static,
	/// One persisted value per field.
	Singleton,
	/// One persisted value per field and component instance.
	PerComponent,
}

/// A declaring type: a group of fields sharing a root prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableClass {
	/// Type name used in diagnostics, e.g. `DatabaseConfiguration`.
	pub name: String,
	/// Entry set the class's properties are grouped under.
	pub root: String,
	/// Component instance for [`PropertyStorage::PerComponent`] classes.
	#[serde(default)]
	pub alias: Option<String>,
	#[serde(default)]
	pub description: String,
	/// Properties whose dependencies are not yet available at bring-up.
	#[serde(default)]
	pub deferred: bool,
	#[serde(default)]
	pub storage: PropertyStorage,
	#[serde(default, rename = "field")]
	pub fields: Vec<ConfigurableField>,
}

impl ConfigurableClass {
	pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			root: root.into(),
			alias: None,
			description: String::new(),
			deferred: false,
			storage: PropertyStorage::Static,
			fields: Vec::new(),
		}
	}

	pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = Some(alias.into());
		self
	}

	pub fn with_storage(mut self, storage: PropertyStorage) -> Self {
		self.storage = storage;
		self
	}

	pub fn deferred(mut self, deferred: bool) -> Self {
		self.deferred = deferred;
		self
	}

	pub fn field(mut self, field: ConfigurableField) -> Self {
		self.fields.push(field);
		self
	}

	/// `Type.field` identity recorded on built descriptors.
	pub fn defining_type(&self, field: &ConfigurableField) -> String {
		format!("{}.{}", self.name, field.name)
	}

	/// Where a store-backed builder keeps `field`'s value.
	///
	/// `None` for static classes and for per-component classes without a
	/// component alias.
	pub fn store_key(&self, field: &ConfigurableField) -> Option<StoreKey> {
		match self.storage {
			PropertyStorage::Static => None,
			PropertyStorage::Singleton => Some(StoreKey::singleton(self.root.clone(), field.key())),
			PropertyStorage::PerComponent => self
				.alias
				.as_deref()
				.filter(|component| !component.is_empty())
				.map(|component| StoreKey::component(component, self.root.clone(), field.key())),
		}
	}
}

/// One configurable field of a [`ConfigurableClass`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableField {
	pub name: String,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub widget: WidgetType,
	/// Initial value when no stored value exists.
	#[serde(default)]
	pub default: Option<String>,
	#[serde(default)]
	pub read_only: bool,
}

impl ConfigurableField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = Some(display_name.into());
		self
	}

	pub fn with_widget(mut self, widget: WidgetType) -> Self {
		self.widget = widget;
		self
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = Some(default.into());
		self
	}

	pub fn read_only(mut self, read_only: bool) -> Self {
		self.read_only = read_only;
		self
	}

	/// Field name as it appears in qualified names.
	pub fn key(&self) -> String {
		self.name.to_lowercase()
	}
}

/// A subsystem that exposes configurable properties.
pub trait PropertySource {
	/// Name used in scan diagnostics.
	fn name(&self) -> &str;

	fn classes(&self) -> Vec<ConfigurableClass>;
}
