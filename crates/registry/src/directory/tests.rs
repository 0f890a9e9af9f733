use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use super::*;
use crate::decl::PropertyStorage;
use crate::property::WidgetType;
use crate::store::MemoryStore;

fn directory() -> PropertyDirectory {
	PropertyDirectory::standard(Arc::new(MemoryStore::new()), DirectoryConfig::default())
}

fn class(name: &str, root: &str, field: &str) -> ConfigurableClass {
	ConfigurableClass::new(name, root).field(ConfigurableField::new(field))
}

fn register(dir: &PropertyDirectory, class: &ConfigurableClass) -> Result<Option<Arc<PropertyDescriptor>>> {
	dir.register(class, &class.fields[0])
}

fn names(props: &[Arc<PropertyDescriptor>]) -> Vec<&str> {
	props.iter().map(|p| p.qualified_name()).collect()
}

#[test]
fn registered_property_is_queryable() {
	let dir = directory();
	let foo = class("Foo", "db", "timeout");

	let prop = register(&dir, &foo).unwrap().unwrap();

	assert_eq!(prop.qualified_name(), "db.timeout");
	assert!(Arc::ptr_eq(&dir.get("db.timeout").unwrap(), &prop));
	assert_eq!(names(&dir.entry_set("db")), ["db.timeout"]);
	assert_eq!(dir.entry_set_names(), ["db"]);
	dir.check_consistency().unwrap();
}

#[test]
fn duplicate_active_registration_is_fatal() {
	let dir = directory();
	let foo = class("Foo", "db", "timeout");
	let bar = class("Bar", "db", "Timeout");
	register(&dir, &foo).unwrap();

	let err = register(&dir, &bar).unwrap_err();

	match err {
		RegistryError::DuplicateRegistration {
			qualified_name,
			existing,
			conflicting,
		} => {
			assert_eq!(qualified_name, "db.timeout");
			assert_eq!(existing, "Foo.timeout");
			assert_eq!(conflicting, "Bar.Timeout");
		}
		other => panic!("unexpected error: {other}"),
	}
	assert_eq!(dir.get("db.timeout").unwrap().defining_type(), "Foo.timeout");
	assert_eq!(dir.entry_set("db").len(), 1);
	dir.check_consistency().unwrap();
}

#[test]
fn get_on_empty_directory_is_not_found() {
	let dir = directory();
	assert!(matches!(
		dir.get("missing.key"),
		Err(RegistryError::NotFound(name)) if name == "missing.key"
	));
	assert!(dir.is_empty());
}

#[test]
fn pending_duplicate_is_ignored() {
	let dir = directory();
	let first = class("Replica", "replica", "lag").deferred(true);
	let second = class("OtherReplica", "replica", "lag").deferred(true);

	let kept = register(&dir, &first).unwrap().unwrap();
	assert!(register(&dir, &second).unwrap().is_none());

	let pending = dir.pending_entry_set("replica");
	assert_eq!(pending.len(), 1);
	assert!(Arc::ptr_eq(&pending[0], &kept));
	assert_eq!(dir.pending_len(), 1);
	dir.check_consistency().unwrap();
}

#[test]
fn pending_properties_are_not_active() {
	let dir = directory();
	register(&dir, &class("Replica", "replica", "lag").deferred(true)).unwrap();

	assert!(matches!(dir.get("replica.lag"), Err(RegistryError::NotFound(_))));
	assert!(dir.entry_set("replica").is_empty());
	assert!(dir.entry_set_names().is_empty());
	assert!(dir.all().is_empty());
}

#[test]
fn deferred_registration_never_shadows_active() {
	let dir = directory();
	register(&dir, &class("Foo", "db", "timeout")).unwrap();

	let ignored = register(&dir, &class("Later", "db", "timeout").deferred(true)).unwrap();

	assert!(ignored.is_none());
	assert!(dir.pending_entries().is_empty());
	dir.check_consistency().unwrap();
}

#[test]
fn active_registration_conflicts_with_pending() {
	let dir = directory();
	register(&dir, &class("Early", "db", "timeout").deferred(true)).unwrap();

	let err = register(&dir, &class("Foo", "db", "timeout")).unwrap_err();

	assert!(matches!(err, RegistryError::DuplicateRegistration { ref existing, .. } if existing == "Early.timeout"));
	assert!(dir.is_empty());
	assert_eq!(dir.pending_len(), 1);
}

#[test]
fn declined_fields_are_not_registered() {
	let dir = PropertyDirectory::new(BuilderChain::new());
	assert!(register(&dir, &class("Foo", "db", "timeout")).unwrap().is_none());
	assert!(dir.is_empty());
	assert_eq!(dir.pending_len(), 0);
}

#[test]
fn entry_set_is_ordered_and_stable() {
	let dir = directory();
	for field in ["zeta", "alpha", "mid"] {
		register(&dir, &class("Foo", "db", field)).unwrap();
	}

	let first = dir.entry_set("db");
	assert_eq!(names(&first), ["db.alpha", "db.mid", "db.zeta"]);
	assert_eq!(names(&dir.entry_set("db")), names(&first));
}

#[test]
fn all_concatenates_entry_sets_in_order() {
	let dir = directory();
	register(&dir, &class("Web", "www", "port")).unwrap();
	register(&dir, &class("Db", "db", "timeout")).unwrap();
	register(&dir, &class("Db", "db", "retries")).unwrap();

	assert_eq!(dir.entry_set_names(), ["db", "www"]);
	assert_eq!(names(&dir.all()), ["db.retries", "db.timeout", "www.port"]);
}

#[test]
fn alias_filters_within_entry_set() {
	let dir = directory();
	for zone in ["zone1", "zone2"] {
		let storage = ConfigurableClass::new("StorageControllerConfiguration", "storage")
			.with_alias(zone)
			.with_storage(PropertyStorage::PerComponent)
			.field(ConfigurableField::new("quota"))
			.field(ConfigurableField::new("path"));
		for field in &storage.fields {
			dir.register(&storage, field).unwrap();
		}
	}

	assert_eq!(dir.entry_set("storage").len(), 4);
	assert_eq!(
		names(&dir.entry_set_for_alias("storage", "zone2")),
		["zone2.storage.path", "zone2.storage.quota"]
	);
	assert!(dir.entry_set_for_alias("storage", "zone3").is_empty());
}

#[test]
fn add_active_reports_duplicates() {
	let dir = directory();
	let prop = PropertyDescriptor::new("web.port", "web", "Web.port");

	assert!(dir.add_active(prop));
	assert!(!dir.add_active(PropertyDescriptor::new("web.port", "web", "Other.port")));
	assert_eq!(dir.get("web.port").unwrap().defining_type(), "Web.port");
	dir.check_consistency().unwrap();
}

#[test]
fn add_active_refuses_deferred() {
	let dir = directory();
	let prop = PropertyDescriptor::new("web.port", "web", "Web.port").deferred(true);

	assert!(!dir.add_active(prop));
	assert!(dir.is_empty());
}

#[test]
fn add_active_refuses_pending_names() {
	let dir = directory();
	register(&dir, &class("Replica", "replica", "lag").deferred(true)).unwrap();

	assert!(!dir.add_active(PropertyDescriptor::new("replica.lag", "replica", "Direct.lag")));
	dir.check_consistency().unwrap();
}

#[test]
fn remove_absent_is_noop() {
	let dir = directory();
	register(&dir, &class("Foo", "db", "timeout")).unwrap();

	dir.remove_active(&PropertyDescriptor::new("db.missing", "db", "Foo.missing"));

	assert_eq!(dir.len(), 1);
	dir.check_consistency().unwrap();
}

#[test]
fn remove_present_hides_property() {
	let dir = directory();
	let prop = register(&dir, &class("Foo", "db", "timeout")).unwrap().unwrap();
	register(&dir, &class("Foo", "db", "retries")).unwrap();

	dir.remove_active(&prop);

	assert!(dir.get("db.timeout").is_err());
	assert_eq!(names(&dir.entry_set("db")), ["db.retries"]);
	dir.check_consistency().unwrap();
}

#[test]
fn removing_last_property_drops_entry_set() {
	let dir = directory();
	let prop = register(&dir, &class("Foo", "db", "timeout")).unwrap().unwrap();

	dir.remove_active(&prop);

	assert!(dir.entry_set_names().is_empty());
	dir.check_consistency().unwrap();
}

#[test]
fn removed_name_can_register_again() {
	let dir = directory();
	let prop = register(&dir, &class("Foo", "db", "timeout")).unwrap().unwrap();
	dir.remove_active(&prop);

	let again = register(&dir, &class("Bar", "db", "timeout")).unwrap().unwrap();

	assert_eq!(dir.get("db.timeout").unwrap().defining_type(), again.defining_type());
}

#[test]
fn remove_does_not_touch_pending() {
	let dir = directory();
	let pending = register(&dir, &class("Replica", "replica", "lag").deferred(true))
		.unwrap()
		.unwrap();

	dir.remove_active(&pending);

	assert_eq!(dir.pending_len(), 1);
}

#[test]
fn snapshots_do_not_follow_later_changes() {
	let dir = directory();
	register(&dir, &class("Replica", "replica", "lag").deferred(true)).unwrap();
	register(&dir, &class("Foo", "db", "timeout")).unwrap();
	let pending = dir.pending_entries();
	let active = dir.entry_set("db");

	register(&dir, &class("Replica", "replica", "depth").deferred(true)).unwrap();
	dir.remove_active_by_name("db.timeout");

	assert_eq!(pending.len(), 1);
	assert_eq!(pending[0].0, "replica");
	assert_eq!(active.len(), 1);
}

#[test]
fn component_properties_project_entry_set() {
	let dir = directory();
	let web = ConfigurableClass::new("Web", "www")
		.field(
			ConfigurableField::new("https")
				.with_display_name("HTTPS only")
				.with_widget(WidgetType::Boolean)
				.with_default("true"),
		)
		.field(ConfigurableField::new("port").with_default("8773"));
	for field in &web.fields {
		dir.register(&web, field).unwrap();
	}

	let summary = dir.component_properties("www");

	assert_eq!(summary.len(), 2);
	assert_eq!(summary[0].qualified_name, "www.https");
	assert_eq!(summary[0].display_name, "HTTPS only");
	assert_eq!(summary[0].widget_type, "BOOLEAN");
	assert_eq!(summary[1].value, "8773");
	assert_eq!(dir.component_properties_for_alias("www", "www").len(), 2);
	assert!(dir.component_properties_for_alias("www", "other").is_empty());
}

#[test]
fn values_update_without_reregistration() {
	let dir = directory();
	register(&dir, &class("Foo", "db", "timeout")).unwrap();

	dir.get("db.timeout").unwrap().set_value("90").unwrap();

	assert_eq!(dir.get("db.timeout").unwrap().value().as_str(), "90");
}

fn declarations() -> impl Strategy<Value = Vec<((String, String), bool)>> {
	prop::collection::btree_map(("[a-c]", "[a-z]{1,6}"), any::<bool>(), 0..24)
		.prop_map(|m| m.into_iter().collect())
}

proptest! {
	#[test]
	fn distinct_names_are_all_retrievable(decls in declarations()) {
		let dir = directory();
		for ((root, field), deferred) in &decls {
			let class = class("Decl", root, field).deferred(*deferred);
			let prop = register(&dir, &class).unwrap();
			prop_assert!(prop.is_some());
			prop_assert_eq!(dir.check_consistency(), Ok(()));
		}

		for ((root, field), deferred) in &decls {
			let name = format!("{root}.{field}");
			if *deferred {
				prop_assert!(dir.pending_entry_set(root).iter().any(|p| p.qualified_name() == name));
				prop_assert!(dir.get(&name).is_err());
			} else {
				let prop = dir.get(&name).unwrap();
				prop_assert_eq!(prop.qualified_name(), name.as_str());
			}
		}
	}

	#[test]
	fn pending_set_ignores_registration_order(decls in declarations()) {
		let forward = directory();
		let backward = directory();
		for ((root, field), _) in &decls {
			register(&forward, &class("Decl", root, field).deferred(true)).unwrap();
		}
		for ((root, field), _) in decls.iter().rev() {
			register(&backward, &class("Decl", root, field).deferred(true)).unwrap();
		}

		for root in ["a", "b", "c"] {
			let lhs: Vec<String> = forward.pending_entry_set(root).iter().map(|p| p.qualified_name().to_string()).collect();
			let rhs: BTreeSet<String> = backward.pending_entry_set(root).iter().map(|p| p.qualified_name().to_string()).collect();
			let lhs_set: BTreeSet<String> = lhs.iter().cloned().collect();
			prop_assert_eq!(lhs.len(), lhs_set.len());
			prop_assert_eq!(lhs_set, rhs);
		}
	}
}
