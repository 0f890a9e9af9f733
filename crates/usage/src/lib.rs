//! Instance usage events.
//!
//! An [`InstanceUsageEvent`] reports the *cumulative* resource usage of one
//! instance up to the moment it was created. Because every event carries
//! running totals, a lost event only coarsens the reporting period; no usage
//! is lost, so events may travel over unreliable transports.

mod error;
mod event;

pub use error::UsageEventError;
pub use event::{InstanceUsageEvent, InstanceUsageEventBuilder};
