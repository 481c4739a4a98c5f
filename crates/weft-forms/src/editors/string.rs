use super::{EditorError, PropertyEditor};
use crate::value::FieldValue;
use regex::Regex;
use std::sync::LazyLock;

static COMMA_SPLITTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());
static SPACE_SPLITTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

fn text_items(value: &FieldValue) -> Vec<String> {
	match value {
		FieldValue::Null => Vec::new(),
		FieldValue::List(items) => items.iter().map(ToString::to_string).collect(),
		other => vec![other.to_string()],
	}
}

/// Splits text into a list on a pattern and joins a list back with a fixed string
#[derive(Debug, Clone)]
pub struct StringArrayEditor {
	splitter: Regex,
	joiner: String,
}

impl StringArrayEditor {
	pub fn new(splitter: Regex, joiner: impl Into<String>) -> Self {
		Self {
			splitter,
			joiner: joiner.into(),
		}
	}

	/// Comma separated values, surrounding whitespace ignored
	///
	/// # Examples
	///
	/// ```
	/// use weft_forms::FieldValue;
	/// use weft_forms::editors::{PropertyEditor, StringArrayEditor};
	///
	/// let editor = StringArrayEditor::comma_delimited();
	/// let value = editor.decode(" red , green,blue ").unwrap();
	/// assert_eq!(
	///     value,
	///     FieldValue::List(vec!["red".into(), "green".into(), "blue".into()])
	/// );
	/// assert_eq!(editor.encode(&value), "red,green,blue");
	/// ```
	pub fn comma_delimited() -> Self {
		Self::new(COMMA_SPLITTER.clone(), ",")
	}

	pub fn space_delimited() -> Self {
		Self::new(SPACE_SPLITTER.clone(), " ")
	}
}

impl PropertyEditor for StringArrayEditor {
	fn encode(&self, value: &FieldValue) -> String {
		text_items(value).join(&self.joiner)
	}

	fn decode(&self, text: &str) -> Result<FieldValue, EditorError> {
		let trimmed = text.trim();
		if trimmed.is_empty() {
			return Ok(FieldValue::List(Vec::new()));
		}
		Ok(FieldValue::List(
			self.splitter.split(trimmed).map(FieldValue::from).collect(),
		))
	}
}

/// Comma separated list with empty tokens dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct StringListEditor;

impl PropertyEditor for StringListEditor {
	fn encode(&self, value: &FieldValue) -> String {
		text_items(value).join(",")
	}

	fn decode(&self, text: &str) -> Result<FieldValue, EditorError> {
		Ok(FieldValue::List(
			text.split(',')
				.map(str::trim)
				.filter(|token| !token.is_empty())
				.map(FieldValue::from)
				.collect(),
		))
	}
}

/// Trims surrounding whitespace; blank text decodes to null
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTrimmerEditor;

impl PropertyEditor for StringTrimmerEditor {
	fn encode(&self, value: &FieldValue) -> String {
		value.to_string()
	}

	fn decode(&self, text: &str) -> Result<FieldValue, EditorError> {
		let trimmed = text.trim();
		if trimmed.is_empty() {
			Ok(FieldValue::Null)
		} else {
			Ok(FieldValue::from(trimmed))
		}
	}
}
