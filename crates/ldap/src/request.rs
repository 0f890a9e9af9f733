use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How far below the base DN a search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchScope {
	/// The base entry only.
	Base,
	/// Direct children of the base entry.
	OneLevel,
	/// The base entry and everything below it.
	Subtree,
}

/// Selection criterion of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
	/// A string filter such as `(&(objectClass=person)(uid=alice))`.
	Expression(String),
	/// Entries carrying every listed attribute value. An empty value only
	/// requires the attribute to be present.
	Matching(Vec<(String, String)>),
}

impl fmt::Display for SearchFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Expression(expr) => f.write_str(expr),
			Self::Matching(attrs) => {
				f.write_str("{")?;
				for (i, (name, value)) in attrs.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{name}={value}")?;
				}
				f.write_str("}")
			}
		}
	}
}

/// One search as handed to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
	pub base_dn: String,
	pub filter: SearchFilter,
	pub scope: SearchScope,
	/// Attributes to return; `None` returns all of them.
	pub attributes: Option<Vec<String>>,
	pub deref_aliases: bool,
	/// `None` leaves the limit to the server.
	pub time_limit: Option<Duration>,
}

/// An entry returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
	pub dn: String,
	pub attributes: BTreeMap<String, Vec<String>>,
}

impl SearchEntry {
	pub fn new(dn: impl Into<String>) -> Self {
		Self {
			dn: dn.into(),
			attributes: BTreeMap::new(),
		}
	}

	/// Appends one value to an attribute.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.entry(name.into()).or_default().push(value.into());
		self
	}

	/// Values of an attribute. Attribute names compare case-insensitively.
	pub fn get(&self, name: &str) -> Option<&[String]> {
		self.attributes
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, values)| values.as_slice())
	}

	/// Copy restricted to the named attributes.
	pub fn project(&self, names: &[String]) -> Self {
		Self {
			dn: self.dn.clone(),
			attributes: self
				.attributes
				.iter()
				.filter(|(key, _)| names.iter().any(|n| n.eq_ignore_ascii_case(key)))
				.map(|(key, values)| (key.clone(), values.clone()))
				.collect(),
		}
	}
}
