//! Error types for the property directory.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by directory operations.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// An active property with the same qualified name is already registered.
	///
	/// Raised at bring-up; a deployment carrying this conflict must not start.
	#[error(
		"duplicate configurable property '{qualified_name}':\n-> {existing}\n-> {conflicting}"
	)]
	DuplicateRegistration {
		qualified_name: String,
		/// Defining type of the registered property.
		existing: String,
		/// Defining type of the rejected property.
		conflicting: String,
	},

	/// No active property is registered under the qualified name.
	#[error("no such property: {0}")]
	NotFound(String),

	/// A builder failed while the directory runs with [`BuilderFailurePolicy::Abort`].
	///
	/// [`BuilderFailurePolicy::Abort`]: crate::config::BuilderFailurePolicy::Abort
	#[error("failed to prepare configurable field {field}: {source}")]
	Build {
		field: String,
		#[source]
		source: BuildError,
	},
}

/// Failure inside a property builder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
	#[error("field name is empty")]
	EmptyFieldName,
	#[error("class {class} has an empty root")]
	EmptyRoot { class: String },
	#[error("per-component class {class} declares no component alias")]
	MissingComponent { class: String },
	#[error("value store: {0}")]
	Store(#[from] StoreError),
}

/// Errors from a [`PropertyStore`](crate::store::PropertyStore).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
	#[error("store unavailable: {0}")]
	Unavailable(String),
	#[error("value rejected for {key}: {reason}")]
	Rejected { key: String, reason: String },
}

/// Errors from updating a property value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropertyError {
	#[error("property {0} is read-only")]
	ReadOnly(String),
	#[error("invalid value for {property}: {reason}")]
	InvalidValue { property: String, reason: String },
	#[error("failed to persist {property}: {source}")]
	Persist {
		property: String,
		#[source]
		source: StoreError,
	},
}

/// Errors that can occur when loading a manifest or configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	/// A `[store]` key is not `root.field` or `component.root.field`.
	#[error("invalid store key: {0}")]
	InvalidStoreKey(String),
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
