//! Configurable property descriptors.

mod listener;
mod widget;


use std::cmp::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

pub use self::listener::{NoopListener, PropertyChangeListener};
pub use self::widget::WidgetType;
use crate::error::PropertyError;

/// A configurable property produced by a [`PropertyBuilder`](crate::builder::PropertyBuilder).
///
/// Everything except the value is fixed at construction. The value lives in
/// an [`ArcSwap`] so callers can read it without going through the
/// directory's lock. Updates are serialized per descriptor.
pub struct PropertyDescriptor {
	qualified_name: String,
	entry_set_name: String,
	alias: String,
	display_name: String,
	description: String,
	widget: WidgetType,
	deferred: bool,
	read_only: bool,
	defining_type: String,
	value: ArcSwap<String>,
	listener: Arc<dyn PropertyChangeListener>,
	/// Held across listener and store in `set_value`.
	update: Mutex<()>,
}

impl PropertyDescriptor {
	/// Creates an active, writable key/value property with an empty value.
	///
	/// The display name defaults to the qualified name and the alias to the
	/// entry set name.
	pub fn new(
		qualified_name: impl Into<String>,
		entry_set_name: impl Into<String>,
		defining_type: impl Into<String>,
	) -> Self {
		let qualified_name = qualified_name.into();
		let entry_set_name = entry_set_name.into();
		Self {
			display_name: qualified_name.clone(),
			alias: entry_set_name.clone(),
			qualified_name,
			entry_set_name,
			description: String::new(),
			widget: WidgetType::default(),
			deferred: false,
			read_only: false,
			defining_type: defining_type.into(),
			value: ArcSwap::from_pointee(String::new()),
			listener: Arc::new(NoopListener),
			update: Mutex::new(()),
		}
	}

	pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = alias.into();
		self
	}

	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = display_name.into();
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_widget(mut self, widget: WidgetType) -> Self {
		self.widget = widget;
		self
	}

	/// Sets the initial value without consulting the listener.
	pub fn with_value(self, value: impl Into<String>) -> Self {
		self.value.store(Arc::new(value.into()));
		self
	}

	pub fn with_listener(mut self, listener: Arc<dyn PropertyChangeListener>) -> Self {
		self.listener = listener;
		self
	}

	pub fn deferred(mut self, deferred: bool) -> Self {
		self.deferred = deferred;
		self
	}

	pub fn read_only(mut self, read_only: bool) -> Self {
		self.read_only = read_only;
		self
	}

	pub fn qualified_name(&self) -> &str {
		&self.qualified_name
	}

	pub fn entry_set_name(&self) -> &str {
		&self.entry_set_name
	}

	pub fn alias(&self) -> &str {
		&self.alias
	}

	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn widget(&self) -> WidgetType {
		self.widget
	}

	/// Returns true if the property's dependencies were not satisfied at
	/// registration time. Deferred properties live in the pending index.
	pub fn is_deferred(&self) -> bool {
		self.deferred
	}

	pub fn is_read_only(&self) -> bool {
		self.read_only
	}

	/// `Type.field` that declared this property.
	pub fn defining_type(&self) -> &str {
		&self.defining_type
	}

	/// Returns the current value.
	pub fn value(&self) -> Arc<String> {
		self.value.load_full()
	}

	/// Replaces the value after the widget and the change listener accept it.
	///
	/// Concurrent updates of one descriptor run one at a time, so the listener
	/// sees changes in the order they become visible.
	pub fn set_value(&self, value: impl Into<String>) -> Result<(), PropertyError> {
		if self.read_only {
			return Err(PropertyError::ReadOnly(self.qualified_name.clone()));
		}
		let value = value.into();
		self.widget
			.validate(&value)
			.map_err(|reason| PropertyError::InvalidValue {
				property: self.qualified_name.clone(),
				reason,
			})?;
		let _update = self.update.lock();
		self.listener.fire_change(self, &value)?;
		self.value.store(Arc::new(value));
		Ok(())
	}

	/// Total order used by the active prefix index: qualified name, then
	/// defining type.
	pub fn total_order_cmp(&self, other: &Self) -> Ordering {
		self.qualified_name
			.cmp(&other.qualified_name)
			.then_with(|| self.defining_type.cmp(&other.defining_type))
	}
}

impl core::fmt::Debug for PropertyDescriptor {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("PropertyDescriptor")
			.field("qualified_name", &self.qualified_name)
			.field("entry_set_name", &self.entry_set_name)
			.field("alias", &self.alias)
			.field("widget", &self.widget)
			.field("deferred", &self.deferred)
			.field("defining_type", &self.defining_type)
			.field("value", &self.value.load_full())
			.finish()
	}
}

impl PartialEq for PropertyDescriptor {
	fn eq(&self, other: &Self) -> bool {
		self.total_order_cmp(other) == Ordering::Equal
	}
}

impl Eq for PropertyDescriptor {}

impl PartialOrd for PropertyDescriptor {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for PropertyDescriptor {
	fn cmp(&self, other: &Self) -> Ordering {
		self.total_order_cmp(other)
	}
}
