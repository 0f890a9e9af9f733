
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use confdir_registry::{
	ComponentProperty, PropertyDescriptor, PropertyDirectory, PropertyManifest, ScanReport, WidgetType,
	register_source,
};
use serde::Serialize;
use tracing::debug;

use crate::Command;

/// JSON view of one property.
#[derive(Debug, Serialize)]
struct PropertyView {
	qualified_name: String,
	entry_set: String,
	alias: String,
	display_name: String,
	description: String,
	widget: WidgetType,
	value: String,
	defining_type: String,
	read_only: bool,
	deferred: bool,
}

impl From<&PropertyDescriptor> for PropertyView {
	fn from(prop: &PropertyDescriptor) -> Self {
		Self {
			qualified_name: prop.qualified_name().to_string(),
			entry_set: prop.entry_set_name().to_string(),
			alias: prop.alias().to_string(),
			display_name: prop.display_name().to_string(),
			description: prop.description().to_string(),
			widget: prop.widget(),
			value: prop.value().to_string(),
			defining_type: prop.defining_type().to_string(),
			read_only: prop.is_read_only(),
			deferred: prop.is_deferred(),
		}
	}
}

#[derive(Debug, Serialize)]
struct CheckView<'a> {
	manifest: &'a str,
	#[serde(flatten)]
	report: ScanReport,
	entry_sets: Vec<String>,
}

/// Loads `manifest`, registers it and writes the answer to `command`.
pub(crate) fn run(manifest: &Path, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
	let loaded = PropertyManifest::load(manifest)
		.with_context(|| format!("loading manifest {}", manifest.display()))?;
	let store = loaded
		.memory_store()
		.with_context(|| format!("seeding value store from {}", manifest.display()))?;
	let directory = PropertyDirectory::standard(Arc::new(store), loaded.directory.clone());
	let report = register_source(&directory, &loaded)
		.with_context(|| format!("registering properties from {}", manifest.display()))?;
	directory.check_consistency()?;
	debug!(?directory, "directory ready");

	match command {
		Command::Check => emit(
			out,
			&CheckView {
				manifest: &loaded.name,
				report,
				entry_sets: directory.entry_set_names(),
			},
		),
		Command::Prefixes => emit(out, &directory.entry_set_names()),
		Command::List { prefix, alias } => {
			let props = match (prefix, alias) {
				(Some(prefix), Some(alias)) => directory.entry_set_for_alias(prefix, alias),
				(Some(prefix), None) => directory.entry_set(prefix),
				(None, _) => directory.all(),
			};
			emit(out, &views(&props))
		}
		Command::Get { name } => emit(out, &PropertyView::from(&*directory.get(name)?)),
		Command::Pending { prefix } => {
			let mut props = match prefix {
				Some(prefix) => directory.pending_entry_set(prefix),
				None => directory.pending_entries().into_iter().map(|(_, p)| p).collect(),
			};
			props.sort_by(|a, b| a.total_order_cmp(b));
			emit(out, &views(&props))
		}
		Command::Summary { prefix, alias } => {
			let summary: Vec<ComponentProperty> = match alias {
				Some(alias) => directory.component_properties_for_alias(prefix, alias),
				None => directory.component_properties(prefix),
			};
			emit(out, &summary)
		}
	}
}

fn views(props: &[Arc<PropertyDescriptor>]) -> Vec<PropertyView> {
	props.iter().map(|p| PropertyView::from(&**p)).collect()
}

fn emit<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
	serde_json::to_writer_pretty(&mut *out, value)?;
	writeln!(out)?;
	Ok(())
}
