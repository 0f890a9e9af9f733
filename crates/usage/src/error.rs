use thiserror::Error;

/// Validation failures when building an [`InstanceUsageEvent`](crate::InstanceUsageEvent).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum UsageEventError {
	#[error("{0} is required")]
	MissingField(&'static str),
	#[error("{0} cannot be negative")]
	NegativeCounter(&'static str),
}
