use super::currency::RoundingMode;
use super::number::{grouped, to_decimal};
use super::{EditorError, PropertyEditor};
use crate::value::FieldValue;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Percentages such as `27.04%`, stored as a fraction (`0.2704`)
#[derive(Debug, Clone, Copy)]
pub struct PercentEditor {
	scale: u32,
	allow_empty: bool,
}

impl Default for PercentEditor {
	fn default() -> Self {
		Self::new(0, true)
	}
}

impl PercentEditor {
	/// `scale` is the number of fraction digits shown on the percentage
	///
	/// # Examples
	///
	/// ```
	/// use rust_decimal::Decimal;
	/// use weft_forms::FieldValue;
	/// use weft_forms::editors::{PercentEditor, PropertyEditor};
	///
	/// let editor = PercentEditor::new(2, false);
	/// let value = editor.decode("27.0358426%").unwrap();
	/// assert_eq!(value, FieldValue::Decimal(Decimal::new(2704, 4)));
	/// assert_eq!(editor.encode(&value), "27.04%");
	/// ```
	pub fn new(scale: u32, allow_empty: bool) -> Self {
		Self { scale, allow_empty }
	}

	fn format(&self, fraction: Decimal) -> String {
		let percent = RoundingMode::HalfEven.round(fraction * Decimal::ONE_HUNDRED, self.scale);
		let sign = if percent.is_sign_negative() && !percent.is_zero() {
			"-"
		} else {
			""
		};
		format!("{sign}{}%", grouped(percent, self.scale, ','))
	}
}

impl PropertyEditor for PercentEditor {
	fn encode(&self, value: &FieldValue) -> String {
		match to_decimal(value) {
			Some(fraction) => self.format(fraction),
			None => String::new(),
		}
	}

	fn decode(&self, text: &str) -> Result<FieldValue, EditorError> {
		if text.is_empty() {
			return if self.allow_empty {
				Ok(FieldValue::Null)
			} else {
				Err(EditorError::InvalidFormat("Text cannot be empty".to_string()))
			};
		}
		let cleaned: String = text.chars().filter(|c| *c != '%' && *c != ',').collect();
		let percent = Decimal::from_str(cleaned.trim()).map_err(|_| {
			let example = self.format(Decimal::new(999_999, 6));
			EditorError::InvalidFormat(format!("Please enter a number in the format '{example}'"))
		})?;
		Ok(FieldValue::Decimal(
			RoundingMode::HalfUp.round(percent / Decimal::ONE_HUNDRED, self.scale + 2),
		))
	}
}
