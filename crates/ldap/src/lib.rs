//! Directory search sessions.
//!
//! [`DirectorySession`] wraps a [`DirectoryConnection`] with the search
//! defaults management lookups need (subtree scope, alias dereferencing, a
//! one-minute time limit) and guarantees the connection is released on every
//! exit path. [`MemoryDirectory`] is a local backend for tests and tooling.

mod config;
mod connection;
mod error;
pub mod filter;
mod memory;
mod request;
mod session;

pub use config::SessionConfig;
pub use connection::{DirectoryConnection, EntryStream};
pub use error::{ProtocolError, SessionError};
pub use filter::Filter;
pub use memory::MemoryDirectory;
pub use request::{SearchEntry, SearchFilter, SearchRequest, SearchScope};
pub use session::{DirectorySession, Entries};
