//! String search filters.
//!
//! Supports the subset used by management lookups: `&`, `|`, `!`, presence
//! (`attr=*`), equality and `*` substring assertions. Values compare
//! ASCII case-insensitively. Escaped parentheses in values are not supported.

use crate::error::ProtocolError;
use crate::request::SearchEntry;

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
	And(Vec<Filter>),
	Or(Vec<Filter>),
	Not(Box<Filter>),
	Present(String),
	Equal { attr: String, value: String },
	/// Value pattern split on `*`; at least two parts.
	Substring { attr: String, parts: Vec<String> },
}

impl Filter {
	/// Parses a filter. A bare `attr=value` without parentheses is accepted.
	pub fn parse(input: &str) -> Result<Self, ProtocolError> {
		let invalid = |reason: String| ProtocolError::InvalidFilter {
			filter: input.to_string(),
			reason,
		};

		let trimmed = input.trim();
		let wrapped;
		let src = if trimmed.starts_with('(') {
			trimmed
		} else {
			wrapped = format!("({trimmed})");
			wrapped.as_str()
		};

		let mut parser = Parser { src, pos: 0 };
		let filter = parser.filter().map_err(invalid)?;
		if parser.pos != src.len() {
			return Err(invalid(format!("unexpected input at offset {}", parser.pos)));
		}
		Ok(filter)
	}

	pub fn matches(&self, entry: &SearchEntry) -> bool {
		match self {
			Self::And(filters) => filters.iter().all(|f| f.matches(entry)),
			Self::Or(filters) => filters.iter().any(|f| f.matches(entry)),
			Self::Not(filter) => !filter.matches(entry),
			Self::Present(attr) => entry.get(attr).is_some_and(|values| !values.is_empty()),
			Self::Equal { attr, value } => entry
				.get(attr)
				.is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value))),
			Self::Substring { attr, parts } => entry
				.get(attr)
				.is_some_and(|values| values.iter().any(|v| glob(parts, v))),
		}
	}
}

struct Parser<'a> {
	src: &'a str,
	pos: usize,
}

impl Parser<'_> {
	fn peek(&self) -> Option<u8> {
		self.src.as_bytes().get(self.pos).copied()
	}

	fn expect(&mut self, byte: u8) -> Result<(), String> {
		if self.peek() == Some(byte) {
			self.pos += 1;
			Ok(())
		} else {
			Err(format!("expected '{}' at offset {}", byte as char, self.pos))
		}
	}

	fn filter(&mut self) -> Result<Filter, String> {
		self.expect(b'(')?;
		let filter = match self.peek() {
			Some(b'&') => {
				self.pos += 1;
				Filter::And(self.list()?)
			}
			Some(b'|') => {
				self.pos += 1;
				Filter::Or(self.list()?)
			}
			Some(b'!') => {
				self.pos += 1;
				Filter::Not(Box::new(self.filter()?))
			}
			Some(_) => self.item()?,
			None => return Err("unterminated filter".to_string()),
		};
		self.expect(b')')?;
		Ok(filter)
	}

	fn list(&mut self) -> Result<Vec<Filter>, String> {
		let mut filters = Vec::new();
		while self.peek() == Some(b'(') {
			filters.push(self.filter()?);
		}
		if filters.is_empty() {
			return Err(format!("empty filter list at offset {}", self.pos));
		}
		Ok(filters)
	}

	fn item(&mut self) -> Result<Filter, String> {
		let start = self.pos;
		let len = self.src[start..]
			.find([')', '('])
			.ok_or_else(|| "unterminated filter".to_string())?;
		self.pos += len;

		let text = &self.src[start..self.pos];
		let Some((attr, value)) = text.split_once('=') else {
			return Err(format!("missing '=' in {text:?}"));
		};
		let attr = attr.trim();
		if attr.is_empty() {
			return Err(format!("missing attribute in {text:?}"));
		}

		Ok(if value == "*" {
			Filter::Present(attr.to_string())
		} else if value.contains('*') {
			Filter::Substring {
				attr: attr.to_string(),
				parts: value.split('*').map(str::to_string).collect(),
			}
		} else {
			Filter::Equal {
				attr: attr.to_string(),
				value: value.to_string(),
			}
		})
	}
}

fn glob(parts: &[String], value: &str) -> bool {
	let value = value.to_ascii_lowercase();
	let Some((first, rest)) = parts.split_first() else {
		return false;
	};
	let Some((last, middle)) = rest.split_last() else {
		return value == first.to_ascii_lowercase();
	};

	let first = first.to_ascii_lowercase();
	if !value.starts_with(&first) {
		return false;
	}
	let mut pos = first.len();
	for part in middle {
		let part = part.to_ascii_lowercase();
		match value[pos..].find(&part) {
			Some(i) => pos += i + part.len(),
			None => return false,
		}
	}
	let last = last.to_ascii_lowercase();
	value.len() - pos >= last.len() && value.ends_with(&last)
}
