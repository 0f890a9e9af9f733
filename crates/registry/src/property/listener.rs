use super::PropertyDescriptor;
use crate::error::PropertyError;

/// Observer consulted before a property value changes.
///
/// Returning an error vetoes the change; the descriptor keeps its old value.
pub trait PropertyChangeListener: Send + Sync {
	fn fire_change(&self, property: &PropertyDescriptor, new_value: &str)
	-> Result<(), PropertyError>;
}

/// Listener that accepts every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl PropertyChangeListener for NoopListener {
	fn fire_change(&self, _: &PropertyDescriptor, _: &str) -> Result<(), PropertyError> {
		Ok(())
	}
}
