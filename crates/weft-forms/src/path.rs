//! Property path syntax
//!
//! A path is a dot-separated list of segments. Each segment is a name,
//! optionally followed by an index (`list[2]`) or a key (`map(home)`).

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static INDEX_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

/// Errors raised for malformed property paths
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
	#[error("Invalid property path '{path}': {reason}")]
	Malformed { path: String, reason: String },
}

impl PathError {
	fn malformed(path: &str, reason: impl Into<String>) -> Self {
		PathError::Malformed {
			path: path.to_string(),
			reason: reason.into(),
		}
	}
}

/// How a segment selects into its property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
	/// The property itself
	Whole,
	/// `name[index]`
	Index(usize),
	/// `name(key)`
	Key(String),
}

/// One step of a property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	pub name: String,
	pub selector: Selector,
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.selector {
			Selector::Whole => write!(f, "{}", self.name),
			Selector::Index(i) => write!(f, "{}[{}]", self.name, i),
			Selector::Key(k) => write!(f, "{}({})", self.name, k),
		}
	}
}

/// A parsed property path
///
/// # Examples
///
/// ```
/// use weft_forms::path::{PropertyPath, Selector};
///
/// let path = PropertyPath::parse("orders[1].lines(gift).qty").unwrap();
/// assert_eq!(path.segments().len(), 3);
/// assert_eq!(path.segments()[0].selector, Selector::Index(1));
/// assert_eq!(path.segments()[1].selector, Selector::Key("gift".to_string()));
/// assert_eq!(path.to_string(), "orders[1].lines(gift).qty");
///
/// assert!(PropertyPath::parse("orders[x]").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
	segments: Vec<Segment>,
}

impl PropertyPath {
	pub fn parse(path: &str) -> Result<Self, PathError> {
		if path.is_empty() {
			return Err(PathError::malformed(path, "path is empty"));
		}

		let mut segments = Vec::new();
		let mut chars = path.chars().peekable();
		loop {
			let mut name = String::new();
			while let Some(&c) = chars.peek() {
				if c == '.' || c == '[' || c == '(' {
					break;
				}
				if c == ']' || c == ')' {
					return Err(PathError::malformed(path, format!("unexpected '{c}'")));
				}
				name.push(c);
				chars.next();
			}
			if name.is_empty() {
				return Err(PathError::malformed(path, "empty segment name"));
			}

			let selector = match chars.peek() {
				Some('[') => {
					chars.next();
					let mut digits = String::new();
					loop {
						match chars.next() {
							Some(']') => break,
							Some(c) => digits.push(c),
							None => return Err(PathError::malformed(path, "unclosed '['")),
						}
					}
					let index = digits.parse::<usize>().map_err(|_| {
						PathError::malformed(path, format!("'{digits}' is not a valid index"))
					})?;
					Selector::Index(index)
				}
				Some('(') => {
					chars.next();
					let mut key = String::new();
					loop {
						match chars.next() {
							Some(')') => break,
							Some(c) => key.push(c),
							None => return Err(PathError::malformed(path, "unclosed '('")),
						}
					}
					Selector::Key(key)
				}
				_ => Selector::Whole,
			};
			segments.push(Segment { name, selector });

			match chars.next() {
				None => break,
				Some('.') => continue,
				Some(c) => {
					return Err(PathError::malformed(
						path,
						format!("expected '.' but found '{c}'"),
					));
				}
			}
		}

		Ok(Self { segments })
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// The final segment
	pub fn terminal(&self) -> &Segment {
		// parse() never produces an empty path
		&self.segments[self.segments.len() - 1]
	}
}

impl fmt::Display for PropertyPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let rendered: Vec<String> = self.segments.iter().map(ToString::to_string).collect();
		f.write_str(&rendered.join("."))
	}
}

/// Strip every `[n]` index reference from a parameter key
///
/// # Examples
///
/// ```
/// use weft_forms::path::canonical_field_path;
///
/// assert_eq!(canonical_field_path("list[0].indexed"), "list.indexed");
/// assert_eq!(canonical_field_path("map(a).b"), "map(a).b");
/// ```
pub fn canonical_field_path(key: &str) -> String {
	INDEX_REFERENCE.replace_all(key, "").into_owned()
}
