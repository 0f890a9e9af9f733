//! Property builders and the chain that drives them.
//!
//! A [`BuilderChain`] asks each builder in turn to turn a declared field into
//! a [`PropertyDescriptor`]. Builders answer with a [`BuildOutcome`]:
//!
//! * [`BuildOutcome::Built`] ends the walk; the first builder to produce wins.
//! * [`BuildOutcome::Declined`] moves on silently.
//! * [`BuildOutcome::Failed`] is logged and, under
//!   [`BuilderFailurePolicy::Skip`], treated like a decline. Under
//!   [`BuilderFailurePolicy::Abort`] it is returned to the caller.
//!
//! If every builder declines the field simply has no property.

mod static_field;
mod stored;


use std::sync::Arc;

pub use self::static_field::StaticPropertyBuilder;
pub use self::stored::{ComponentStoreBuilder, SingletonStoreBuilder};
use crate::config::BuilderFailurePolicy;
use crate::decl::{ConfigurableClass, ConfigurableField};
use crate::error::{BuildError, RegistryError};
use crate::property::PropertyDescriptor;
use crate::store::PropertyStore;

/// Result of one builder attempt.
#[derive(Debug)]
pub enum BuildOutcome {
	Built(PropertyDescriptor),
	Declined,
	Failed(BuildError),
}

/// Turns a declared field into a property descriptor.
pub trait PropertyBuilder: Send + Sync {
	/// Short name used in diagnostics.
	fn name(&self) -> &'static str;

	fn build(&self, class: &ConfigurableClass, field: &ConfigurableField) -> BuildOutcome;
}

/// Ordered list of builders, evaluated front to back.
#[derive(Default)]
pub struct BuilderChain {
	builders: Vec<Box<dyn PropertyBuilder>>,
}

impl BuilderChain {
	/// Creates an empty chain; every field is declined.
	pub fn new() -> Self {
		Self::default()
	}

	/// The standard chain: static, singleton-store, component-store.
	pub fn standard(store: Arc<dyn PropertyStore>) -> Self {
		Self::new()
			.with(StaticPropertyBuilder)
			.with(SingletonStoreBuilder::new(store.clone()))
			.with(ComponentStoreBuilder::new(store))
	}

	/// Appends a builder to the end of the chain.
	pub fn with(mut self, builder: impl PropertyBuilder + 'static) -> Self {
		self.builders.push(Box::new(builder));
		self
	}

	pub fn len(&self) -> usize {
		self.builders.len()
	}

	pub fn is_empty(&self) -> bool {
		self.builders.is_empty()
	}

	/// Runs the chain for one field.
	pub fn build(
		&self,
		class: &ConfigurableClass,
		field: &ConfigurableField,
		policy: BuilderFailurePolicy,
	) -> Result<Option<PropertyDescriptor>, RegistryError> {
		for builder in &self.builders {
			match builder.build(class, field) {
				BuildOutcome::Built(prop) => return Ok(Some(prop)),
				BuildOutcome::Declined => {
					tracing::trace!(
						builder = builder.name(),
						class = %class.name,
						field = %field.name,
						"builder declined field",
					);
				}
				BuildOutcome::Failed(error) => {
					tracing::error!(
						builder = builder.name(),
						class = %class.name,
						field = %field.name,
						%error,
						"failed to prepare configurable field",
					);
					if policy == BuilderFailurePolicy::Abort {
						return Err(RegistryError::Build {
							field: class.defining_type(field),
							source: error,
						});
					}
				}
			}
		}
		Ok(None)
	}
}

impl core::fmt::Debug for BuilderChain {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_list()
			.entries(self.builders.iter().map(|b| b.name()))
			.finish()
	}
}

/// Rejects declarations that cannot form a qualified name.
fn check_names(class: &ConfigurableClass, field: &ConfigurableField) -> Result<(), BuildError> {
	if field.name.trim().is_empty() {
		return Err(BuildError::EmptyFieldName);
	}
	if class.root.trim().is_empty() {
		return Err(BuildError::EmptyRoot {
			class: class.name.clone(),
		});
	}
	Ok(())
}

/// Fills the presentation fields every builder shares.
fn describe(
	class: &ConfigurableClass,
	field: &ConfigurableField,
	qualified_name: String,
	alias: &str,
) -> PropertyDescriptor {
	let display_name = field.display_name.clone().unwrap_or_else(|| field.key());
	PropertyDescriptor::new(qualified_name, class.root.clone(), class.defining_type(field))
		.with_alias(alias)
		.with_display_name(display_name)
		.with_description(field.description.clone())
		.with_widget(field.widget)
		.deferred(class.deferred)
		.read_only(field.read_only)
}
