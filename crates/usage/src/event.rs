
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UsageEventError;

/// Cumulative usage of one instance, sent to the reporting subsystem.
///
/// User and account names travel alongside their ids: reports are kept long
/// after users are renamed or deleted, and may be produced on hosts without
/// access to the identity store.
///
/// Counters are megabytes. `None` means the statistic is not collected for
/// this instance, not that usage was zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceUsageEvent {
	uuid: Uuid,
	instance_id: String,
	instance_type: String,
	user_id: String,
	user_name: String,
	account_id: String,
	account_name: String,
	cluster_name: String,
	availability_zone: String,
	#[serde(default)]
	cumulative_network_io_megs: Option<u64>,
	#[serde(default)]
	cumulative_disk_io_megs: Option<u64>,
}

impl InstanceUsageEvent {
	pub fn builder() -> InstanceUsageEventBuilder {
		InstanceUsageEventBuilder::default()
	}

	/// A new event for the same instance and owner with updated counters.
	pub fn with_usage(
		&self,
		cumulative_network_io_megs: Option<i64>,
		cumulative_disk_io_megs: Option<i64>,
	) -> Result<Self, UsageEventError> {
		Ok(Self {
			cumulative_network_io_megs: counter("cumulative_network_io_megs", cumulative_network_io_megs)?,
			cumulative_disk_io_megs: counter("cumulative_disk_io_megs", cumulative_disk_io_megs)?,
			..self.clone()
		})
	}

	pub fn uuid(&self) -> Uuid {
		self.uuid
	}

	pub fn instance_id(&self) -> &str {
		&self.instance_id
	}

	pub fn instance_type(&self) -> &str {
		&self.instance_type
	}

	pub fn user_id(&self) -> &str {
		&self.user_id
	}

	pub fn user_name(&self) -> &str {
		&self.user_name
	}

	pub fn account_id(&self) -> &str {
		&self.account_id
	}

	pub fn account_name(&self) -> &str {
		&self.account_name
	}

	pub fn cluster_name(&self) -> &str {
		&self.cluster_name
	}

	pub fn availability_zone(&self) -> &str {
		&self.availability_zone
	}

	pub fn cumulative_network_io_megs(&self) -> Option<u64> {
		self.cumulative_network_io_megs
	}

	pub fn cumulative_disk_io_megs(&self) -> Option<u64> {
		self.cumulative_disk_io_megs
	}

	/// Cumulative totals make a lost event harmless.
	pub fn requires_reliable_transmission(&self) -> bool {
		false
	}
}

impl fmt::Display for InstanceUsageEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[uuid:{},instanceId:{},instanceType:{},userId:{},accountId:{},cluster:{},zone:{},net:{},disk:{}]",
			self.uuid,
			self.instance_id,
			self.instance_type,
			self.user_id,
			self.account_id,
			self.cluster_name,
			self.availability_zone,
			Counter(self.cumulative_network_io_megs),
			Counter(self.cumulative_disk_io_megs),
		)
	}
}

struct Counter(Option<u64>);

impl fmt::Display for Counter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0 {
			Some(megs) => write!(f, "{megs}"),
			None => f.write_str("null"),
		}
	}
}

fn counter(field: &'static str, value: Option<i64>) -> Result<Option<u64>, UsageEventError> {
	value
		.map(|v| u64::try_from(v).map_err(|_| UsageEventError::NegativeCounter(field)))
		.transpose()
}

/// Collects the fields of an [`InstanceUsageEvent`].
#[derive(Debug, Clone, Default)]
pub struct InstanceUsageEventBuilder {
	uuid: Option<Uuid>,
	instance_id: Option<String>,
	instance_type: Option<String>,
	user_id: Option<String>,
	user_name: Option<String>,
	account_id: Option<String>,
	account_name: Option<String>,
	cluster_name: Option<String>,
	availability_zone: Option<String>,
	cumulative_network_io_megs: Option<i64>,
	cumulative_disk_io_megs: Option<i64>,
}

macro_rules! text_setters {
	($($field:ident),* $(,)?) => {
		$(
			pub fn $field(mut self, value: impl Into<String>) -> Self {
				self.$field = Some(value.into());
				self
			}
		)*
	};
}

impl InstanceUsageEventBuilder {
	text_setters!(
		instance_id,
		instance_type,
		user_id,
		user_name,
		account_id,
		account_name,
		cluster_name,
		availability_zone,
	);

	pub fn uuid(mut self, uuid: Uuid) -> Self {
		self.uuid = Some(uuid);
		self
	}

	pub fn cumulative_network_io_megs(mut self, megs: i64) -> Self {
		self.cumulative_network_io_megs = Some(megs);
		self
	}

	pub fn cumulative_disk_io_megs(mut self, megs: i64) -> Self {
		self.cumulative_disk_io_megs = Some(megs);
		self
	}

	/// Validates and builds the event.
	///
	/// Every identity field is required; counters must not be negative.
	pub fn build(self) -> Result<InstanceUsageEvent, UsageEventError> {
		fn required<T>(field: &'static str, value: Option<T>) -> Result<T, UsageEventError> {
			value.ok_or(UsageEventError::MissingField(field))
		}

		Ok(InstanceUsageEvent {
			uuid: required("uuid", self.uuid)?,
			instance_id: required("instance_id", self.instance_id)?,
			instance_type: required("instance_type", self.instance_type)?,
			user_id: required("user_id", self.user_id)?,
			user_name: required("user_name", self.user_name)?,
			account_id: required("account_id", self.account_id)?,
			account_name: required("account_name", self.account_name)?,
			cluster_name: required("cluster_name", self.cluster_name)?,
			availability_zone: required("availability_zone", self.availability_zone)?,
			cumulative_network_io_megs: counter("cumulative_network_io_megs", self.cumulative_network_io_megs)?,
			cumulative_disk_io_megs: counter("cumulative_disk_io_megs", self.cumulative_disk_io_megs)?,
		})
	}
}
