use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Search defaults applied by a [`DirectorySession`](crate::DirectorySession).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	/// Server-side time limit for filter searches, in milliseconds.
	pub time_limit_ms: u64,
	pub deref_aliases: bool,
}

impl SessionConfig {
	pub const DEFAULT_TIME_LIMIT_MS: u64 = 60_000;

	pub fn time_limit(&self) -> Duration {
		Duration::from_millis(self.time_limit_ms)
	}
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			time_limit_ms: Self::DEFAULT_TIME_LIMIT_MS,
			deref_aliases: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_one_minute() {
		let config = SessionConfig::default();
		assert_eq!(config.time_limit(), Duration::from_secs(60));
		assert!(config.deref_aliases);
	}

	#[test]
	fn partial_table_keeps_defaults() {
		let config: SessionConfig = toml::from_str("time_limit_ms = 500").unwrap();
		assert_eq!(config.time_limit_ms, 500);
		assert!(config.deref_aliases);
	}
}
