//! Concurrent registration and query against a shared directory.
//!
//! Readers must only ever observe states produced by whole operations: every
//! snapshot is ordered, names never appear in both families, and the index
//! invariants hold at each observation point.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use confdir_registry::{
	ConfigurableClass, ConfigurableField, DirectoryConfig, MemoryStore, PropertyDirectory,
	RegistryError,
};

const WRITERS: usize = 4;
const READERS: usize = 4;
const FIELDS_PER_WRITER: usize = 64;
const ROOTS: [&str; 3] = ["db", "www", "replica"];

fn directory() -> PropertyDirectory {
	PropertyDirectory::standard(Arc::new(MemoryStore::new()), DirectoryConfig::default())
}

fn declaration(writer: usize, n: usize) -> ConfigurableClass {
	let root = ROOTS[n % ROOTS.len()];
	ConfigurableClass::new(format!("Writer{writer}"), root)
		.deferred(root == "replica")
		.field(ConfigurableField::new(format!("w{writer}_f{n}")))
}

/// Signals readers to stop once every writer has exited, or as soon as one
/// panics, so a failed writer fails the test instead of hanging it.
struct WriterExit<'a> {
	remaining: &'a AtomicUsize,
	done: &'a AtomicBool,
}

impl Drop for WriterExit<'_> {
	fn drop(&mut self) {
		if thread::panicking() || self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
			self.done.store(true, Ordering::Release);
		}
	}
}

fn assert_snapshot_sane(dir: &PropertyDirectory) {
	dir.check_consistency().unwrap();

	for prefix in dir.entry_set_names() {
		let set = dir.entry_set(&prefix);
		assert!(
			set.windows(2).all(|w| w[0].total_order_cmp(&w[1]).is_lt()),
			"entry set {prefix} out of order"
		);
		assert!(set.iter().all(|p| p.entry_set_name() == prefix));
	}

	for (prefix, prop) in dir.pending_entries() {
		assert_eq!(prop.entry_set_name(), prefix);
		assert!(
			dir.get(prop.qualified_name()).is_err(),
			"{} visible as active while pending",
			prop.qualified_name()
		);
	}
}

#[test]
fn readers_observe_consistent_states() {
	let dir = directory();
	let done = AtomicBool::new(false);
	let remaining = AtomicUsize::new(WRITERS);

	thread::scope(|s| {
		for writer in 0..WRITERS {
			let dir = &dir;
			let exit = WriterExit {
				remaining: &remaining,
				done: &done,
			};
			s.spawn(move || {
				let _exit = exit;
				for n in 0..FIELDS_PER_WRITER {
					let class = declaration(writer, n);
					let prop = dir.register(&class, &class.fields[0]).unwrap();
					assert!(prop.is_some());
				}
			});
		}

		for _ in 0..READERS {
			let dir = &dir;
			let done = &done;
			s.spawn(move || {
				while !done.load(Ordering::Acquire) {
					assert_snapshot_sane(dir);
				}
			});
		}
	});

	assert_snapshot_sane(&dir);
	let total = WRITERS * FIELDS_PER_WRITER;
	assert_eq!(dir.len() + dir.pending_len(), total);
	assert_eq!(dir.pending_entry_set("replica").len(), dir.pending_len());
	for writer in 0..WRITERS {
		for n in 0..FIELDS_PER_WRITER {
			let class = declaration(writer, n);
			let name = format!("{}.{}", class.root, class.fields[0].key());
			if class.deferred {
				assert!(dir.get(&name).is_err());
			} else {
				assert_eq!(dir.get(&name).unwrap().qualified_name(), name);
			}
		}
	}
}

#[test]
fn contested_name_has_one_winner() {
	let dir = directory();
	let winners = AtomicUsize::new(0);
	let duplicates = AtomicUsize::new(0);

	thread::scope(|s| {
		for writer in 0..8 {
			let dir = &dir;
			let winners = &winners;
			let duplicates = &duplicates;
			s.spawn(move || {
				let class = ConfigurableClass::new(format!("Contender{writer}"), "db")
					.field(ConfigurableField::new("timeout"));
				match dir.register(&class, &class.fields[0]) {
					Ok(Some(_)) => winners.fetch_add(1, Ordering::Relaxed),
					Err(RegistryError::DuplicateRegistration { .. }) => {
						duplicates.fetch_add(1, Ordering::Relaxed)
					}
					other => panic!("unexpected registration result: {other:?}"),
				};
			});
		}
	});

	assert_eq!(winners.into_inner(), 1);
	assert_eq!(duplicates.into_inner(), 7);
	assert_eq!(dir.entry_set("db").len(), 1);
	dir.check_consistency().unwrap();
}

#[test]
fn removals_interleave_with_queries() {
	let dir = directory();
	let props: Vec<_> = (0..FIELDS_PER_WRITER)
		.map(|n| {
			let class = ConfigurableClass::new("Web", "www").field(ConfigurableField::new(format!("f{n}")));
			dir.register(&class, &class.fields[0]).unwrap().unwrap()
		})
		.collect();
	let done = AtomicBool::new(false);
	let remaining = AtomicUsize::new(1);

	thread::scope(|s| {
		let (dir, done) = (&dir, &done);
		let exit = WriterExit {
			remaining: &remaining,
			done,
		};
		s.spawn(move || {
			let _exit = exit;
			for prop in &props {
				dir.remove_active(prop);
			}
		});
		s.spawn(move || {
			let mut last = usize::MAX;
			while !done.load(Ordering::Acquire) {
				let len = dir.entry_set("www").len();
				assert!(len <= last, "entry set grew during removal");
				last = len;
				assert_snapshot_sane(dir);
			}
		});
	});

	assert!(dir.is_empty());
	assert!(dir.entry_set_names().is_empty());
}
