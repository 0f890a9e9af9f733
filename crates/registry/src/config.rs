//! Directory configuration.

use serde::{Deserialize, Serialize};

/// What the builder chain does when a builder fails unexpectedly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuilderFailurePolicy {
	/// Log the failure and try the next builder.
	#[default]
	Skip,
	/// Stop and return the failure to the caller.
	Abort,
}

/// Configuration for a [`PropertyDirectory`](crate::PropertyDirectory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
	pub builder_failures: BuilderFailurePolicy,
}
