//! Typed storage behind a manifest entry
//!
//! A [`FieldSlot`] is the Rust field a property path ends at. Plain values are
//! reset to their zero value on null, optional values become `None`, and
//! vectors accept lists, single values, and element assignment by index.

use crate::path::Selector;
use crate::value::{Coercion, ConversionError, FieldType, FieldValue, ScalarValue, ValueKind};
use bytes::Bytes;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A field that accepts [`FieldValue`] assignments
pub trait FieldSlot {
	fn field_type() -> FieldType
	where
		Self: Sized;

	fn assign(&mut self, value: FieldValue, coercion: Coercion) -> Result<(), ConversionError>;

	/// Assign one element selected by `[index]` or `(key)`
	fn assign_at(
		&mut self,
		selector: &Selector,
		_value: FieldValue,
		_coercion: Coercion,
	) -> Result<(), ConversionError> {
		Err(ConversionError::NotIndexed(format!("{selector:?}")))
	}

	fn value(&self) -> FieldValue;
}

fn first_of(value: FieldValue) -> FieldValue {
	match value {
		FieldValue::List(items) => items.into_iter().next().unwrap_or(FieldValue::Null),
		other => other,
	}
}

fn grow_and_set<T, F>(items: &mut Vec<T>, index: usize, value: T, filler: F)
where
	F: Fn() -> T,
{
	while items.len() <= index {
		items.push(filler());
	}
	items[index] = value;
}

macro_rules! scalar_slots {
	($($t:ty),* $(,)?) => {$(
		impl FieldSlot for $t {
			fn field_type() -> FieldType {
				FieldType::scalar(<$t as ScalarValue>::KIND)
			}

			fn assign(&mut self, value: FieldValue, coercion: Coercion) -> Result<(), ConversionError> {
				*self = match first_of(value) {
					FieldValue::Null => <$t as ScalarValue>::zero(),
					other => <$t as ScalarValue>::from_value(other, coercion)?,
				};
				Ok(())
			}

			fn value(&self) -> FieldValue {
				self.to_value()
			}
		}

		impl FieldSlot for Option<$t> {
			fn field_type() -> FieldType {
				FieldType::optional(<$t as ScalarValue>::KIND)
			}

			fn assign(&mut self, value: FieldValue, coercion: Coercion) -> Result<(), ConversionError> {
				*self = match first_of(value) {
					FieldValue::Null => None,
					other => Some(<$t as ScalarValue>::from_value(other, coercion)?),
				};
				Ok(())
			}

			fn value(&self) -> FieldValue {
				self.as_ref().map(ScalarValue::to_value).unwrap_or(FieldValue::Null)
			}
		}

		impl FieldSlot for Vec<$t> {
			fn field_type() -> FieldType {
				FieldType::array(<$t as ScalarValue>::KIND)
			}

			fn assign(&mut self, value: FieldValue, coercion: Coercion) -> Result<(), ConversionError> {
				let mut items = Vec::new();
				value.flatten_into(&mut items);
				*self = items
					.into_iter()
					.filter(|item| !item.is_null())
					.map(|item| <$t as ScalarValue>::from_value(item, coercion))
					.collect::<Result<Vec<_>, _>>()?;
				Ok(())
			}

			fn assign_at(
				&mut self,
				selector: &Selector,
				value: FieldValue,
				coercion: Coercion,
			) -> Result<(), ConversionError> {
				let Selector::Index(index) = selector else {
					return Err(ConversionError::NotIndexed(format!("{selector:?}")));
				};
				let element = match first_of(value) {
					FieldValue::Null => <$t as ScalarValue>::zero(),
					other => <$t as ScalarValue>::from_value(other, coercion)?,
				};
				grow_and_set(self, *index, element, <$t as ScalarValue>::zero);
				Ok(())
			}

			fn value(&self) -> FieldValue {
				FieldValue::List(self.iter().map(ScalarValue::to_value).collect())
			}
		}
	)*};
}

scalar_slots!(
	String, bool, i16, i32, i64, u16, u32, u64, usize, f32, f64, Decimal, NaiveDate, Bytes,
);

/// An enum bound by variant name
///
/// # Examples
///
/// ```
/// use weft_forms::FormEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Color {
///     #[default]
///     Red,
///     Blue,
/// }
///
/// impl FormEnum for Color {
///     fn variants() -> &'static [Self] {
///         &[Color::Red, Color::Blue]
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Color::Red => "RED",
///             Color::Blue => "BLUE",
///         }
///     }
/// }
///
/// assert_eq!(Color::from_name("BLUE"), Some(Color::Blue));
/// assert_eq!(Color::from_name("blue"), None);
/// ```
pub trait FormEnum: Sized + Clone + 'static {
	fn variants() -> &'static [Self];

	fn name(&self) -> &'static str;

	/// Exact, case-sensitive lookup by name
	fn from_name(name: &str) -> Option<Self> {
		Self::variants().iter().find(|v| v.name() == name).cloned()
	}
}

pub(crate) fn parse_enum<E: FormEnum>(value: FieldValue) -> Result<E, ConversionError> {
	match first_of(value) {
		FieldValue::Text(name) => {
			E::from_name(name.trim()).ok_or_else(|| ConversionError::UnknownVariant {
				type_name: std::any::type_name::<E>(),
				name,
			})
		}
		other => Err(ConversionError::TypeMismatch {
			expected: "enum",
			found: match other {
				FieldValue::Null => "null",
				_ => "non-text",
			},
		}),
	}
}

pub(crate) fn enum_value<E: FormEnum>(value: &E) -> FieldValue {
	FieldValue::Text(value.name().to_string())
}

pub(crate) const ENUM_TYPE: FieldType = FieldType::scalar(ValueKind::Enum);
pub(crate) const OPTIONAL_ENUM_TYPE: FieldType = FieldType::optional(ValueKind::Enum);
pub(crate) const ENUM_ARRAY_TYPE: FieldType = FieldType::array(ValueKind::Enum);
