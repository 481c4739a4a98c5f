use super::number::{grouped, to_decimal};
use super::{EditorError, PropertyEditor};
use crate::value::FieldValue;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// How a value is rounded to the editor's scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
	/// Away from zero
	Up,
	/// Towards zero
	Down,
	Ceiling,
	Floor,
	HalfUp,
	HalfDown,
	#[default]
	HalfEven,
}

impl RoundingMode {
	fn strategy(self) -> RoundingStrategy {
		match self {
			RoundingMode::Up => RoundingStrategy::AwayFromZero,
			RoundingMode::Down => RoundingStrategy::ToZero,
			RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
			RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
			RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
			RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
			RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
		}
	}

	pub(super) fn round(self, value: Decimal, scale: u32) -> Decimal {
		value.round_dp_with_strategy(scale, self.strategy())
	}
}

/// Currency symbol and its customary number of fraction digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
	pub code: &'static str,
	pub symbol: &'static str,
	pub fraction_digits: u32,
}

impl Currency {
	pub const USD: Currency = Currency {
		code: "USD",
		symbol: "$",
		fraction_digits: 2,
	};
	pub const EUR: Currency = Currency {
		code: "EUR",
		symbol: "€",
		fraction_digits: 2,
	};
	pub const GBP: Currency = Currency {
		code: "GBP",
		symbol: "£",
		fraction_digits: 2,
	};
	pub const JPY: Currency = Currency {
		code: "JPY",
		symbol: "¥",
		fraction_digits: 0,
	};
}

/// Monetary amounts such as `$1,000.00`
#[derive(Debug, Clone)]
pub struct CurrencyEditor {
	currency: Currency,
	scale: u32,
	rounding: RoundingMode,
	allow_empty: bool,
}

impl Default for CurrencyEditor {
	fn default() -> Self {
		Self::for_currency(Currency::USD)
	}
}

impl CurrencyEditor {
	/// US dollars, two decimal places, half-even rounding, empty input rejected
	///
	/// # Examples
	///
	/// ```
	/// use weft_forms::editors::{CurrencyEditor, PropertyEditor};
	///
	/// let editor = CurrencyEditor::new();
	/// let value = editor.decode("1,000,000").unwrap();
	/// assert_eq!(editor.encode(&value), "$1,000,000.00");
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn for_currency(currency: Currency) -> Self {
		Self {
			scale: currency.fraction_digits,
			currency,
			rounding: RoundingMode::default(),
			allow_empty: false,
		}
	}

	pub fn with_scale(mut self, scale: u32) -> Self {
		self.scale = scale;
		self
	}

	pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
		self.rounding = rounding;
		self
	}

	pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
		self.allow_empty = allow_empty;
		self
	}

	pub fn currency(&self) -> &Currency {
		&self.currency
	}

	fn format(&self, value: Decimal) -> String {
		let rounded = self.rounding.round(value, self.scale);
		let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
			"-"
		} else {
			""
		};
		format!("{sign}{}{}", self.currency.symbol, grouped(rounded, self.scale, ','))
	}

	fn format_error(&self) -> EditorError {
		let example = self.format(Decimal::new(99999, 2));
		EditorError::InvalidFormat(format!("Please enter a number in the format '{example}'"))
	}
}

impl PropertyEditor for CurrencyEditor {
	fn encode(&self, value: &FieldValue) -> String {
		match to_decimal(value) {
			Some(amount) => self.format(amount),
			None => String::new(),
		}
	}

	fn decode(&self, text: &str) -> Result<FieldValue, EditorError> {
		if self.allow_empty && text.is_empty() {
			return Ok(FieldValue::Null);
		}
		let cleaned: String = text
			.replace(self.currency.symbol, "")
			.chars()
			.filter(|c| *c != ',')
			.collect();
		let amount = Decimal::from_str(cleaned.trim()).map_err(|_| self.format_error())?;
		Ok(FieldValue::Decimal(self.rounding.round(amount, self.scale)))
	}
}
