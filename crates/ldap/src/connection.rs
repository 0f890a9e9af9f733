use crate::error::ProtocolError;
use crate::request::{SearchEntry, SearchRequest};

/// Forward-only stream of search results.
pub type EntryStream = Box<dyn Iterator<Item = Result<SearchEntry, ProtocolError>> + Send>;

/// An authenticated connection to a directory server.
///
/// Implementations carry out one protocol operation per call. Sessions own
/// their connection and call [`close`](Self::close) at most once.
pub trait DirectoryConnection: Send {
	/// Starts a search. Results may be produced lazily; errors found while
	/// streaming are yielded by the stream itself.
	fn search(&mut self, request: &SearchRequest) -> Result<EntryStream, ProtocolError>;

	fn close(&mut self) -> Result<(), ProtocolError>;
}
