use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Presentation hint for how a management interface renders a property.
///
/// The uppercase [`Display`] form is what management clients receive in
/// [`ComponentProperty::widget_type`](crate::summary::ComponentProperty::widget_type).
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
	/// Plain key/value text entry.
	#[default]
	KeyValue,
	/// Key/value entry whose value is masked when displayed.
	KeyValueHidden,
	/// `true` / `false` toggle.
	Boolean,
	/// Not shown to management clients that lack elevated access.
	Private,
}

impl WidgetType {
	/// Checks that `value` can be edited through this widget.
	pub fn validate(self, value: &str) -> Result<(), String> {
		match self {
			WidgetType::Boolean if !matches!(value, "true" | "false") => {
				Err(format!("expected 'true' or 'false', got '{value}'"))
			}
			_ => Ok(()),
		}
	}
}
