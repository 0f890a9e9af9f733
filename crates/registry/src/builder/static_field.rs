use super::{BuildOutcome, PropertyBuilder, check_names, describe};
use crate::decl::{ConfigurableClass, ConfigurableField, PropertyStorage};

/// Builds in-memory properties for [`PropertyStorage::Static`] classes.
///
/// Qualified name is `root.field`; the value starts at the field default.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPropertyBuilder;

impl PropertyBuilder for StaticPropertyBuilder {
	fn name(&self) -> &'static str {
		"static"
	}

	fn build(&self, class: &ConfigurableClass, field: &ConfigurableField) -> BuildOutcome {
		if class.storage != PropertyStorage::Static {
			return BuildOutcome::Declined;
		}
		if let Err(e) = check_names(class, field) {
			return BuildOutcome::Failed(e);
		}

		let qualified_name = format!("{}.{}", class.root, field.key());
		let alias = class.alias.as_deref().unwrap_or(class.root.as_str());
		let value = field.default.clone().unwrap_or_default();
		BuildOutcome::Built(describe(class, field, qualified_name, alias).with_value(value))
	}
}
