//! Dynamically typed field values and their conversions
//!
//! Editors decode request text into a [`FieldValue`]; field slots convert a
//! [`FieldValue`] into the concrete Rust type of the field.

use crate::editors::EditorError;
use bytes::Bytes;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	Null,
	Text(String),
	Integer(i64),
	Float(f64),
	Boolean(bool),
	Decimal(Decimal),
	Date(NaiveDate),
	Bytes(Bytes),
	List(Vec<FieldValue>),
}

impl FieldValue {
	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Null)
	}

	/// Flatten one level of lists into `out`
	pub fn flatten_into(self, out: &mut Vec<FieldValue>) {
		match self {
			FieldValue::List(items) => out.extend(items),
			other => out.push(other),
		}
	}

	fn type_label(&self) -> &'static str {
		match self {
			FieldValue::Null => "null",
			FieldValue::Text(_) => "text",
			FieldValue::Integer(_) => "integer",
			FieldValue::Float(_) => "float",
			FieldValue::Boolean(_) => "boolean",
			FieldValue::Decimal(_) => "decimal",
			FieldValue::Date(_) => "date",
			FieldValue::Bytes(_) => "bytes",
			FieldValue::List(_) => "list",
		}
	}
}

/// Text form used for hidden parameters and redirects
///
/// Dates render as ISO-8601 so they coerce back without an editor.
impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Null | FieldValue::Bytes(_) => Ok(()),
			FieldValue::Text(s) => f.write_str(s),
			FieldValue::Integer(i) => write!(f, "{i}"),
			FieldValue::Float(x) => write!(f, "{x}"),
			FieldValue::Boolean(b) => write!(f, "{b}"),
			FieldValue::Decimal(d) => write!(f, "{d}"),
			FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
			FieldValue::List(items) => {
				let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
				f.write_str(&parts.join(","))
			}
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		FieldValue::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		FieldValue::Text(value)
	}
}

/// The kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	Text,
	Integer,
	Float,
	Boolean,
	Decimal,
	Date,
	Enum,
	Bytes,
	/// A nested bindable object, list of objects, or map of objects
	Object,
}

/// Type tag of a declared field
///
/// `primitive` fields are reset to their zero value on blank input;
/// non-primitive (optional) fields are reset to absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
	pub kind: ValueKind,
	pub array: bool,
	pub primitive: bool,
}

impl FieldType {
	pub const fn scalar(kind: ValueKind) -> Self {
		Self {
			kind,
			array: false,
			primitive: true,
		}
	}

	pub const fn optional(kind: ValueKind) -> Self {
		Self {
			kind,
			array: false,
			primitive: false,
		}
	}

	pub const fn array(kind: ValueKind) -> Self {
		Self {
			kind,
			array: true,
			primitive: false,
		}
	}

	pub const fn object() -> Self {
		Self {
			kind: ValueKind::Object,
			array: false,
			primitive: false,
		}
	}

	/// The type of one element of an array field
	pub const fn element(self) -> Self {
		Self {
			kind: self.kind,
			array: false,
			primitive: false,
		}
	}
}

/// Whether an assignment may convert between value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
	/// Text is parsed into the field's type, numbers are widened
	Convert,
	/// The value must already be of the field's kind
	Exact,
}

/// Errors raised while assigning a value to a field
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
	#[error("'{value}' is not a valid {expected}")]
	InvalidValue { value: String, expected: &'static str },
	#[error("No enum constant {type_name}.{name}")]
	UnknownVariant { type_name: &'static str, name: String },
	#[error("Cannot assign a {found} value to a {expected} field")]
	TypeMismatch {
		expected: &'static str,
		found: &'static str,
	},
	#[error("Value {value} is out of range for {expected}")]
	OutOfRange { value: String, expected: &'static str },
	#[error("Property '{0}' cannot be set by index or key")]
	NotIndexed(String),
	#[error("Property '{0}' is not assignable")]
	NotAssignable(String),
	#[error("{0}")]
	Editor(#[from] EditorError),
}

/// A single-valued Rust type that can live in a field
pub trait ScalarValue: Sized {
	const KIND: ValueKind;
	const LABEL: &'static str;

	/// Value used when a primitive field is reset
	fn zero() -> Self;

	/// Convert a non-null value
	fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError>;

	fn to_value(&self) -> FieldValue;

	fn mismatch(value: &FieldValue) -> ConversionError {
		ConversionError::TypeMismatch {
			expected: Self::LABEL,
			found: value.type_label(),
		}
	}

	fn invalid(text: &str) -> ConversionError {
		ConversionError::InvalidValue {
			value: text.to_string(),
			expected: Self::LABEL,
		}
	}
}

impl ScalarValue for String {
	const KIND: ValueKind = ValueKind::Text;
	const LABEL: &'static str = "text";

	fn zero() -> Self {
		String::new()
	}

	fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError> {
		match (value, coercion) {
			(FieldValue::Text(s), _) => Ok(s),
			(FieldValue::Bytes(b), Coercion::Convert) => Ok(String::from_utf8_lossy(&b).into_owned()),
			(other @ FieldValue::List(_), _) | (other @ FieldValue::Null, _) => Err(Self::mismatch(&other)),
			(other, Coercion::Convert) => Ok(other.to_string()),
			(other, Coercion::Exact) => Err(Self::mismatch(&other)),
		}
	}

	fn to_value(&self) -> FieldValue {
		FieldValue::Text(self.clone())
	}
}

impl ScalarValue for bool {
	const KIND: ValueKind = ValueKind::Boolean;
	const LABEL: &'static str = "boolean";

	fn zero() -> Self {
		false
	}

	fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError> {
		match (value, coercion) {
			(FieldValue::Boolean(b), _) => Ok(b),
			(FieldValue::Text(s), Coercion::Convert) => {
				match s.trim().to_ascii_lowercase().as_str() {
					"true" | "on" | "yes" | "y" | "1" => Ok(true),
					"false" | "off" | "no" | "n" | "0" => Ok(false),
					_ => Err(Self::invalid(&s)),
				}
			}
			(FieldValue::Integer(i), Coercion::Convert) => Ok(i != 0),
			(other, _) => Err(Self::mismatch(&other)),
		}
	}

	fn to_value(&self) -> FieldValue {
		FieldValue::Boolean(*self)
	}
}

macro_rules! integer_scalar {
	($($t:ty => $label:literal),* $(,)?) => {$(
		impl ScalarValue for $t {
			const KIND: ValueKind = ValueKind::Integer;
			const LABEL: &'static str = $label;

			fn zero() -> Self {
				0
			}

			fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError> {
				let wide: i128 = match (value, coercion) {
					(FieldValue::Integer(i), _) => i128::from(i),
					(FieldValue::Text(s), Coercion::Convert) => {
						s.trim().parse::<i128>().map_err(|_| Self::invalid(&s))?
					}
					(FieldValue::Decimal(d), Coercion::Convert) if d.fract().is_zero() => {
						d.to_i128().ok_or_else(|| Self::invalid(&d.to_string()))?
					}
					(other, _) => return Err(Self::mismatch(&other)),
				};
				<$t>::try_from(wide).map_err(|_| ConversionError::OutOfRange {
					value: wide.to_string(),
					expected: $label,
				})
			}

			fn to_value(&self) -> FieldValue {
				i64::try_from(*self)
					.map(FieldValue::Integer)
					.unwrap_or_else(|_| FieldValue::Text(self.to_string()))
			}
		}
	)*};
}

integer_scalar! {
	i16 => "short integer",
	i32 => "integer",
	i64 => "long integer",
	u16 => "unsigned short integer",
	u32 => "unsigned integer",
	u64 => "unsigned long integer",
	usize => "unsigned integer",
}

macro_rules! float_scalar {
	($($t:ty => $label:literal),* $(,)?) => {$(
		impl ScalarValue for $t {
			const KIND: ValueKind = ValueKind::Float;
			const LABEL: &'static str = $label;

			fn zero() -> Self {
				0.0
			}

			fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError> {
				match (value, coercion) {
					(FieldValue::Float(x), _) => Ok(x as $t),
					(FieldValue::Integer(i), Coercion::Convert) => Ok(i as $t),
					(FieldValue::Decimal(d), Coercion::Convert) => {
						d.to_f64().map(|x| x as $t).ok_or_else(|| Self::invalid(&d.to_string()))
					}
					(FieldValue::Text(s), Coercion::Convert) => {
						s.trim().parse::<$t>().map_err(|_| Self::invalid(&s))
					}
					(other, _) => Err(Self::mismatch(&other)),
				}
			}

			fn to_value(&self) -> FieldValue {
				FieldValue::Float(*self as f64)
			}
		}
	)*};
}

float_scalar! {
	f32 => "float",
	f64 => "double",
}

impl ScalarValue for Decimal {
	const KIND: ValueKind = ValueKind::Decimal;
	const LABEL: &'static str = "decimal";

	fn zero() -> Self {
		Decimal::ZERO
	}

	fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError> {
		match (value, coercion) {
			(FieldValue::Decimal(d), _) => Ok(d),
			(FieldValue::Integer(i), Coercion::Convert) => Ok(Decimal::from(i)),
			(FieldValue::Float(x), Coercion::Convert) => {
				Decimal::from_f64(x).ok_or_else(|| Self::invalid(&x.to_string()))
			}
			(FieldValue::Text(s), Coercion::Convert) => {
				Decimal::from_str(s.trim()).map_err(|_| Self::invalid(&s))
			}
			(other, _) => Err(Self::mismatch(&other)),
		}
	}

	fn to_value(&self) -> FieldValue {
		FieldValue::Decimal(*self)
	}
}

impl ScalarValue for NaiveDate {
	const KIND: ValueKind = ValueKind::Date;
	const LABEL: &'static str = "date";

	fn zero() -> Self {
		NaiveDate::default()
	}

	fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError> {
		match (value, coercion) {
			(FieldValue::Date(d), _) => Ok(d),
			(FieldValue::Text(s), Coercion::Convert) => {
				NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Self::invalid(&s))
			}
			(other, _) => Err(Self::mismatch(&other)),
		}
	}

	fn to_value(&self) -> FieldValue {
		FieldValue::Date(*self)
	}
}

impl ScalarValue for Bytes {
	const KIND: ValueKind = ValueKind::Bytes;
	const LABEL: &'static str = "byte array";

	fn zero() -> Self {
		Bytes::new()
	}

	fn from_value(value: FieldValue, coercion: Coercion) -> Result<Self, ConversionError> {
		match (value, coercion) {
			(FieldValue::Bytes(b), _) => Ok(b),
			(FieldValue::Text(s), Coercion::Convert) => Ok(Bytes::from(s)),
			(other, _) => Err(Self::mismatch(&other)),
		}
	}

	fn to_value(&self) -> FieldValue {
		FieldValue::Bytes(self.clone())
	}
}
