use crate::value::FieldValue;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

/// Numeric view of a field value, if it has one
pub(super) fn to_decimal(value: &FieldValue) -> Option<Decimal> {
	match value {
		FieldValue::Decimal(d) => Some(*d),
		FieldValue::Integer(i) => Some(Decimal::from(*i)),
		FieldValue::Float(x) => Decimal::from_f64(*x),
		FieldValue::Text(s) => Decimal::from_str(s.trim()).ok(),
		_ => None,
	}
}

/// Render the magnitude of `value` with exactly `scale` fraction digits and
/// the integer part grouped by thousands
pub(super) fn grouped(value: Decimal, scale: u32, separator: char) -> String {
	let mut magnitude = value.abs();
	magnitude.rescale(scale);
	let text = magnitude.to_string();
	let (integer, fraction) = match text.split_once('.') {
		Some((integer, fraction)) => (integer, Some(fraction)),
		None => (text.as_str(), None),
	};

	let mut out = String::with_capacity(text.len() + integer.len() / 3);
	for (i, digit) in integer.chars().enumerate() {
		if i > 0 && (integer.len() - i) % 3 == 0 {
			out.push(separator);
		}
		out.push(digit);
	}
	if let Some(fraction) = fraction {
		out.push('.');
		out.push_str(fraction);
	}
	out
}
