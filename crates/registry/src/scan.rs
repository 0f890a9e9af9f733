//! Bring-up registration of declared properties.

use serde::Serialize;
use tracing::info;

use crate::PropertyDirectory;
use crate::decl::PropertySource;
use crate::error::Result;

/// Counts from one registration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
	pub active: usize,
	pub pending: usize,
	/// Fields no builder produced a property for, plus ignored pending duplicates.
	pub skipped: usize,
}

impl ScanReport {
	pub fn total(&self) -> usize {
		self.active + self.pending + self.skipped
	}
}

impl std::ops::AddAssign for ScanReport {
	fn add_assign(&mut self, rhs: Self) {
		self.active += rhs.active;
		self.pending += rhs.pending;
		self.skipped += rhs.skipped;
	}
}

/// Registers every field of every class a source declares, in declaration
/// order. Stops at the first duplicate active registration.
pub fn register_source(directory: &PropertyDirectory, source: &dyn PropertySource) -> Result<ScanReport> {
	let mut report = ScanReport::default();
	for class in source.classes() {
		for field in &class.fields {
			match directory.register(&class, field)? {
				Some(prop) if prop.is_deferred() => report.pending += 1,
				Some(_) => report.active += 1,
				None => report.skipped += 1,
			}
		}
	}
	info!(
		source = source.name(),
		active = report.active,
		pending = report.pending,
		skipped = report.skipped,
		"registered configurable properties",
	);
	Ok(report)
}

/// Registers several sources in order.
pub fn register_sources(
	directory: &PropertyDirectory,
	sources: &[&dyn PropertySource],
) -> Result<ScanReport> {
	let mut total = ScanReport::default();
	for source in sources {
		total += register_source(directory, *source)?;
	}
	Ok(total)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::RegistryError;
	use crate::decl::{ConfigurableClass, ConfigurableField};
	use crate::store::MemoryStore;

	struct Subsystem {
		name: &'static str,
		classes: Vec<ConfigurableClass>,
	}

	impl PropertySource for Subsystem {
		fn name(&self) -> &str {
			self.name
		}

		fn classes(&self) -> Vec<ConfigurableClass> {
			self.classes.clone()
		}
	}

	fn directory() -> PropertyDirectory {
		PropertyDirectory::standard(Arc::new(MemoryStore::new()), Default::default())
	}

	#[test]
	fn counts_each_family() {
		let db = Subsystem {
			name: "db",
			classes: vec![
				ConfigurableClass::new("DatabaseConfiguration", "db")
					.field(ConfigurableField::new("timeout"))
					.field(ConfigurableField::new("pool")),
				ConfigurableClass::new("ReplicaConfiguration", "replica")
					.deferred(true)
					.field(ConfigurableField::new("lag")),
			],
		};
		let dir = directory();

		let report = register_source(&dir, &db).unwrap();

		assert_eq!(
			report,
			ScanReport {
				active: 2,
				pending: 1,
				skipped: 0
			}
		);
		assert_eq!(report.total(), 3);
		assert_eq!(dir.len(), 2);
		assert_eq!(dir.pending_len(), 1);
	}

	#[test]
	fn duplicate_across_sources_stops_the_scan() {
		let first = Subsystem {
			name: "first",
			classes: vec![ConfigurableClass::new("Foo", "db").field(ConfigurableField::new("timeout"))],
		};
		let second = Subsystem {
			name: "second",
			classes: vec![
				ConfigurableClass::new("Bar", "db")
					.field(ConfigurableField::new("timeout"))
					.field(ConfigurableField::new("retries")),
			],
		};
		let dir = directory();

		let err = register_sources(&dir, &[&first, &second]).unwrap_err();

		assert!(matches!(err, RegistryError::DuplicateRegistration { .. }));
		assert_eq!(dir.get("db.timeout").unwrap().defining_type(), "Foo.timeout");
		assert!(dir.get("db.retries").is_err());
	}

	#[test]
	fn pending_duplicates_are_skipped() {
		let class = ConfigurableClass::new("Replica", "replica")
			.deferred(true)
			.field(ConfigurableField::new("lag"));
		let twice = Subsystem {
			name: "twice",
			classes: vec![class.clone(), class],
		};
		let dir = directory();

		let report = register_source(&dir, &twice).unwrap();

		assert_eq!(report.pending, 1);
		assert_eq!(report.skipped, 1);
	}
}
