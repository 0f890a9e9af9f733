//! TOML property manifests.
//!
//! A manifest bundles directory configuration, seed values for the value
//! store and class declarations in one file:
//!
//! ```toml
//! name = "cloud-controller"
//!
//! [directory]
//! builder_failures = "abort"
//!
//! [store]
//! "db.timeout" = "120"
//! "zone1.storage.quota" = "50"
//!
//! [[class]]
//! name = "DatabaseConfiguration"
//! root = "db"
//! storage = "singleton"
//!
//! [[class.field]]
//! name = "timeout"
//! default = "30"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::DirectoryConfig;
use crate::decl::{ConfigurableClass, PropertySource};
use crate::error::ConfigError;
use crate::store::{MemoryStore, StoreKey};

/// Declarations loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyManifest {
	#[serde(default = "default_name")]
	pub name: String,
	#[serde(default)]
	pub directory: DirectoryConfig,
	/// Seed values keyed by `root.field` or `component.root.field`.
	#[serde(default)]
	pub store: BTreeMap<String, String>,
	#[serde(default, rename = "class")]
	pub classes: Vec<ConfigurableClass>,
}

fn default_name() -> String {
	"manifest".to_string()
}

impl Default for PropertyManifest {
	fn default() -> Self {
		Self {
			name: default_name(),
			directory: DirectoryConfig::default(),
			store: BTreeMap::new(),
			classes: Vec::new(),
		}
	}
}

impl PropertyManifest {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Builds a [`MemoryStore`] seeded from the `[store]` table.
	///
	/// Keys naming a declared store-backed field resolve to that field's
	/// store key, so roots may contain dots. Other keys must be
	/// `root.field` or `component.root.field`.
	pub fn memory_store(&self) -> Result<MemoryStore, ConfigError> {
		let declared = self.declared_store_keys();
		let values = self
			.store
			.iter()
			.map(|(name, value)| {
				declared
					.get(name.as_str())
					.cloned()
					.or_else(|| StoreKey::parse(name))
					.map(|key| (key, value.clone()))
					.ok_or_else(|| ConfigError::InvalidStoreKey(name.clone()))
			})
			.collect::<Result<Vec<_>, _>>()?;
		Ok(MemoryStore::with_values(values))
	}

	/// Qualified name -> store key for every store-backed declared field.
	fn declared_store_keys(&self) -> BTreeMap<String, StoreKey> {
		let mut keys = BTreeMap::new();
		for class in &self.classes {
			for field in &class.fields {
				if let Some(key) = class.store_key(field) {
					keys.entry(key.to_string()).or_insert(key);
				}
			}
		}
		keys
	}
}

impl PropertySource for PropertyManifest {
	fn name(&self) -> &str {
		&self.name
	}

	fn classes(&self) -> Vec<ConfigurableClass> {
		self.classes.clone()
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;
	use std::sync::Arc;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::PropertyDirectory;
	use crate::config::BuilderFailurePolicy;
	use crate::decl::{ConfigurableField, PropertyStorage};
	use crate::property::WidgetType;
	use crate::scan::register_source;

	const MANIFEST: &str = r#"
		name = "cloud-controller"

		[directory]
		builder_failures = "abort"

		[store]
		"db.timeout" = "120"
		"zone1.storage.quota" = "50"

		[[class]]
		name = "DatabaseConfiguration"
		root = "db"
		storage = "singleton"

		[[class.field]]
		name = "timeout"
		default = "30"

		[[class.field]]
		name = "pooled"
		widget = "boolean"
		default = "false"

		[[class]]
		name = "StorageControllerConfiguration"
		root = "storage"
		alias = "zone1"
		storage = "per-component"
		deferred = true

		[[class.field]]
		name = "quota"
	"#;

	#[test]
	fn parses_classes_and_fields() {
		let manifest = PropertyManifest::from_toml_str(MANIFEST).unwrap();

		assert_eq!(manifest.name, "cloud-controller");
		assert_eq!(manifest.directory.builder_failures, BuilderFailurePolicy::Abort);
		assert_eq!(manifest.classes.len(), 2);
		assert_eq!(
			manifest.classes[0],
			ConfigurableClass::new("DatabaseConfiguration", "db")
				.with_storage(PropertyStorage::Singleton)
				.field(ConfigurableField::new("timeout").with_default("30"))
				.field(
					ConfigurableField::new("pooled")
						.with_widget(WidgetType::Boolean)
						.with_default("false")
				)
		);
		let storage = &manifest.classes[1];
		assert_eq!(storage.alias.as_deref(), Some("zone1"));
		assert_eq!(storage.storage, PropertyStorage::PerComponent);
		assert!(storage.deferred);
	}

	#[test]
	fn seeds_memory_store() {
		let manifest = PropertyManifest::from_toml_str(MANIFEST).unwrap();
		let store = manifest.memory_store().unwrap();

		assert_eq!(store.len(), 2);
		assert_eq!(
			store.get(&StoreKey::component("zone1", "storage", "quota")).as_deref(),
			Some("50")
		);
	}

	#[test]
	fn rejects_malformed_store_key() {
		let manifest = PropertyManifest::from_toml_str("[store]\ntimeout = \"1\"\n").unwrap();
		assert!(matches!(
			manifest.memory_store(),
			Err(ConfigError::InvalidStoreKey(key)) if key == "timeout"
		));
	}

	const DOTTED_ROOTS: &str = r#"
		[store]
		"cloud.db.timeout" = "120"
		"zone1.cloud.storage.quota" = "50"

		[[class]]
		name = "CloudDatabaseConfiguration"
		root = "cloud.db"
		storage = "singleton"

		[[class.field]]
		name = "timeout"
		default = "30"

		[[class]]
		name = "CloudStorageConfiguration"
		root = "cloud.storage"
		alias = "zone1"
		storage = "per-component"

		[[class.field]]
		name = "quota"
		default = "10"
	"#;

	#[test]
	fn store_keys_resolve_against_dotted_roots() {
		let manifest = PropertyManifest::from_toml_str(DOTTED_ROOTS).unwrap();
		let store = manifest.memory_store().unwrap();

		assert_eq!(
			store.get(&StoreKey::singleton("cloud.db", "timeout")).as_deref(),
			Some("120")
		);
		assert_eq!(
			store
				.get(&StoreKey::component("zone1", "cloud.storage", "quota"))
				.as_deref(),
			Some("50")
		);
	}

	#[test]
	fn seeded_values_reach_dotted_root_properties() {
		let manifest = PropertyManifest::from_toml_str(DOTTED_ROOTS).unwrap();
		let store = Arc::new(manifest.memory_store().unwrap());
		let dir = PropertyDirectory::standard(store.clone(), manifest.directory.clone());
		register_source(&dir, &manifest).unwrap();

		let timeout = dir.get("cloud.db.timeout").unwrap();
		assert_eq!(timeout.value().as_str(), "120");
		assert_eq!(dir.get("zone1.cloud.storage.quota").unwrap().value().as_str(), "50");

		timeout.set_value("90").unwrap();
		assert_eq!(
			store.get(&StoreKey::singleton("cloud.db", "timeout")).as_deref(),
			Some("90")
		);
		assert_eq!(store.len(), 2);
	}

	#[test]
	fn empty_document_uses_defaults() {
		assert_eq!(PropertyManifest::from_toml_str("").unwrap(), PropertyManifest::default());
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent.toml");
		assert!(matches!(
			PropertyManifest::load(&path),
			Err(ConfigError::Io { path: p, .. }) if p == path
		));
	}

	#[test]
	fn load_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(MANIFEST.as_bytes()).unwrap();

		let manifest = PropertyManifest::load(file.path()).unwrap();

		assert_eq!(manifest.classes.len(), 2);
	}

	#[test]
	fn syntax_errors_surface_as_toml() {
		assert!(matches!(
			PropertyManifest::from_toml_str("[[class]\nname ="),
			Err(ConfigError::Toml(_))
		));
	}
}
