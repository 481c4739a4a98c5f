use super::{EditorError, PropertyEditor};
use crate::value::FieldValue;
use chrono::NaiveDate;

const OUTPUT_PATTERN: &str = "%m/%d/%Y";

/// Parses dates against an ordered list of patterns; the first match wins
///
/// Patterns without a day of month are completed with the first of the month.
#[derive(Debug, Clone)]
pub struct DateEditor {
	patterns: Vec<String>,
	allow_empty: bool,
}

impl Default for DateEditor {
	fn default() -> Self {
		Self {
			patterns: vec![
				"%m/%y".to_string(), // 03/24
				"%m/%Y".to_string(), // 03/2024
				"%m/%d/%Y".to_string(),
			],
			allow_empty: true,
		}
	}
}

impl DateEditor {
	/// Editor with the default month/year and month/day/year patterns
	///
	/// # Examples
	///
	/// ```
	/// use chrono::NaiveDate;
	/// use weft_forms::FieldValue;
	/// use weft_forms::editors::{DateEditor, PropertyEditor};
	///
	/// let editor = DateEditor::new();
	/// let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
	/// assert_eq!(editor.decode("03/24").unwrap(), FieldValue::Date(expected));
	/// assert_eq!(editor.encode(&FieldValue::Date(expected)), "03/01/2024");
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.patterns = patterns.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
		self.allow_empty = allow_empty;
		self
	}

	fn parse_with(pattern: &str, text: &str) -> Option<NaiveDate> {
		if pattern.contains("%d") || pattern.contains("%e") {
			NaiveDate::parse_from_str(text, pattern).ok()
		} else {
			NaiveDate::parse_from_str(&format!("{text} 1"), &format!("{pattern} %d")).ok()
		}
	}
}

impl PropertyEditor for DateEditor {
	fn encode(&self, value: &FieldValue) -> String {
		match value {
			FieldValue::Date(date) => date.format(OUTPUT_PATTERN).to_string(),
			other => other.to_string(),
		}
	}

	fn decode(&self, text: &str) -> Result<FieldValue, EditorError> {
		let trimmed = text.trim();
		if trimmed.is_empty() && self.allow_empty {
			return Ok(FieldValue::Null);
		}
		self.patterns
			.iter()
			.find_map(|pattern| Self::parse_with(pattern, trimmed))
			.map(FieldValue::Date)
			.ok_or_else(|| EditorError::InvalidFormat(format!("Invalid format: {text}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn date(y: i32, m: u32, d: u32) -> FieldValue {
		FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
	}

	#[rstest]
	#[case("12/24", date(2024, 12, 1))]
	#[case("12/2024", date(2024, 12, 1))]
	#[case("07/04/1976", date(1976, 7, 4))]
	#[case(" 1/5/2020 ", date(2020, 1, 5))]
	fn test_decode(#[case] input: &str, #[case] expected: FieldValue) {
		assert_eq!(DateEditor::new().decode(input).unwrap(), expected);
	}

	#[test]
	fn test_invalid_format_message() {
		let err = DateEditor::new().decode("yesterday").unwrap_err();
		assert_eq!(err.to_string(), "Invalid format: yesterday");
	}

	#[test]
	fn test_empty_input() {
		assert_eq!(DateEditor::new().decode("").unwrap(), FieldValue::Null);
		let strict = DateEditor::new().with_allow_empty(false);
		assert!(strict.decode("").is_err());
	}

	#[test]
	fn test_custom_patterns() {
		let editor = DateEditor::new().with_patterns(["%Y-%m-%d"]);
		assert_eq!(editor.decode("2020-02-29").unwrap(), date(2020, 2, 29));
		assert!(editor.decode("02/29/2020").is_err());
	}
}
