//! Error types for directory sessions.

use thiserror::Error;

/// Failure reported by a [`DirectoryConnection`](crate::DirectoryConnection).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
	#[error("time limit exceeded")]
	TimeLimitExceeded,
	#[error("directory server unavailable: {0}")]
	Unavailable(String),
	#[error("invalid filter {filter:?}: {reason}")]
	InvalidFilter { filter: String, reason: String },
	#[error("no such object: {0}")]
	NoSuchObject(String),
	#[error("operation failed with result code {code}: {message}")]
	Operation { code: u16, message: String },
}

/// Errors surfaced by [`DirectorySession`](crate::DirectorySession).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
	/// The session was closed before the call.
	#[error("directory session is closed")]
	Closed,

	#[error("searching {base_dn} failed using {filter}: {source}")]
	Search {
		base_dn: String,
		filter: String,
		#[source]
		source: ProtocolError,
	},

	#[error("failed to close directory session: {0}")]
	Close(#[source] ProtocolError),
}
