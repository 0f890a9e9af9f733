//! Management-facing projection of properties.

use serde::{Deserialize, Serialize};

use crate::property::PropertyDescriptor;

/// What a management client sees of one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProperty {
	pub widget_type: String,
	pub display_name: String,
	pub value: String,
	pub qualified_name: String,
}

impl From<&PropertyDescriptor> for ComponentProperty {
	fn from(prop: &PropertyDescriptor) -> Self {
		Self {
			widget_type: prop.widget().to_string(),
			display_name: prop.display_name().to_string(),
			value: prop.value().to_string(),
			qualified_name: prop.qualified_name().to_string(),
		}
	}
}
