//! Two-way converters between request text and field values
//!
//! Editors are attached to binder rules rather than registered globally, so
//! the same field type can bind differently on different forms.

mod currency;
mod date;
mod number;
mod percent;
mod string;

pub use currency::{Currency, CurrencyEditor, RoundingMode};
pub use date::DateEditor;
pub use percent::PercentEditor;
pub use string::{StringArrayEditor, StringListEditor, StringTrimmerEditor};

use crate::value::FieldValue;
use thiserror::Error;

/// Decode failure carrying a message fit for the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
	#[error("{0}")]
	InvalidFormat(String),
}

/// A converter between request text and a typed value
pub trait PropertyEditor: Send + Sync {
	/// Render `value` as text suitable for a form field
	fn encode(&self, value: &FieldValue) -> String;

	/// Parse request text
	///
	/// # Errors
	///
	/// Returns [`EditorError::InvalidFormat`] when `text` is not in the
	/// editor's format.
	fn decode(&self, text: &str) -> Result<FieldValue, EditorError>;
}
