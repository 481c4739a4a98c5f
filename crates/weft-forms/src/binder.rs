//! Request parameter binding
//!
//! [`FormBinder`] copies a raw parameter multimap and uploaded file parts onto
//! a command object. Each parameter is bound on its own: a value that fails to
//! convert is recorded against its key and binding moves on to the next one.

use crate::declaration::BinderRule;
use crate::editors::EditorError;
use crate::errors::ErrorCollector;
use crate::manifest::Bindable;
use crate::path::{PathError, Selector, canonical_field_path};
use crate::resolver::resolve;
use crate::value::{Coercion, ConversionError, FieldType, FieldValue, ValueKind};
use thiserror::Error;
use weft_http::{FilePart, ParameterMap, Request};

/// Failure while binding a single parameter
#[derive(Debug, Error)]
pub enum BindError {
	#[error(transparent)]
	Path(#[from] PathError),
	#[error(transparent)]
	Conversion(#[from] ConversionError),
	#[error(transparent)]
	Editor(#[from] EditorError),
}

/// Binds request data onto command objects using a set of binder rules
#[derive(Debug, Clone, Copy)]
pub struct FormBinder<'r> {
	rules: &'r [BinderRule],
}

impl<'r> FormBinder<'r> {
	pub fn new(rules: &'r [BinderRule]) -> Self {
		Self { rules }
	}

	/// Bind and return the errors of this pass
	pub fn bind(&self, params: &ParameterMap, parts: &[FilePart], target: &mut dyn Bindable) -> ErrorCollector {
		let mut errors = ErrorCollector::new();
		self.bind_into(params, parts, target, &mut errors);
		errors
	}

	/// Bind the parameters and parts of `request`
	///
	/// Form fields of a multipart body are bound like any other parameter.
	pub fn bind_request(&self, request: &Request, target: &mut dyn Bindable, errors: &mut ErrorCollector) {
		self.bind_into(request.parameters(), request.parts(), target, errors);
	}

	/// Bind into an existing collector
	///
	/// Errors already present for a key are kept.
	pub fn bind_into(
		&self,
		params: &ParameterMap,
		parts: &[FilePart],
		target: &mut dyn Bindable,
		errors: &mut ErrorCollector,
	) {
		let mut folded;
		let params = if parts.iter().any(FilePart::is_form_field) {
			folded = params.clone();
			for part in parts.iter().filter(|part| part.is_form_field()) {
				folded.add(part.field_name(), part.string());
			}
			&folded
		} else {
			params
		};

		for part in parts.iter().filter(|part| !part.is_form_field()) {
			if let Err(err) = self.bind_file(part, target) {
				tracing::warn!(field = part.field_name(), error = %err, "failed to bind uploaded file");
				errors.put_if_absent(part.field_name(), err.to_string());
			}
		}

		// ParameterMap iterates in key order, so `list[0]` binds before `list[0].name`
		for (key, values) in params.iter() {
			match self.bind_parameter(key, values, target) {
				Ok(true) => {}
				Ok(false) => {
					tracing::debug!(field = key, "writable property not found on form object");
				}
				Err(err) => {
					tracing::warn!(field = key, error = %err, "failed to bind request parameter");
					errors.put_if_absent(key, err.to_string());
				}
			}
		}
	}

	fn bind_file(&self, part: &FilePart, target: &mut dyn Bindable) -> Result<(), BindError> {
		match resolve(target, part.field_name())? {
			Some(mut resolved) => {
				resolved.assign(FieldValue::Bytes(part.bytes().clone()), Coercion::Exact)?;
			}
			None => {
				tracing::debug!(field = part.field_name(), "no field for uploaded file");
			}
		}
		Ok(())
	}

	fn matching_rules(&self, field_path: &str, field_type: &FieldType) -> Vec<&'r BinderRule> {
		self.rules
			.iter()
			.filter(|rule| rule.matches(field_path, field_type))
			.collect()
	}

	/// Returns `Ok(false)` when `key` names no field
	fn bind_parameter(&self, key: &str, values: &[String], target: &mut dyn Bindable) -> Result<bool, BindError> {
		let Some(mut resolved) = resolve(target, key)? else {
			return Ok(false);
		};

		let mut field_type = resolved.descriptor().field_type;
		if field_type.kind == ValueKind::Object {
			return Ok(false);
		}
		if *resolved.selector() != Selector::Whole {
			field_type = field_type.element();
		}
		let rules = self.matching_rules(&canonical_field_path(key), &field_type);

		if field_type.array {
			let value = if field_type.kind == ValueKind::Enum {
				// Variant names match exactly once trimmed
				distinct(
					values
						.iter()
						.map(|value| value.trim())
						.filter(|value| !value.is_empty())
						.map(FieldValue::from),
				)
			} else {
				let mut decoded = Vec::new();
				for raw in values {
					let mut value = FieldValue::from(raw.as_str());
					for rule in &rules {
						value = rule.editor().decode(raw)?;
					}
					value.flatten_into(&mut decoded);
				}
				distinct(decoded)
			};
			resolved.assign(FieldValue::List(value), Coercion::Convert)?;
			return Ok(true);
		}

		let raw = values.first().map(String::as_str).unwrap_or_default();
		if !rules.is_empty() {
			let mut value = FieldValue::from(raw);
			for rule in &rules {
				value = rule.editor().decode(raw)?;
			}
			resolved.assign(value, Coercion::Exact)?;
		} else if !raw.trim().is_empty() {
			resolved.assign(FieldValue::from(raw), Coercion::Convert)?;
		} else {
			resolved.assign(FieldValue::Null, Coercion::Convert)?;
		}
		Ok(true)
	}
}

/// Drop repeated values, keeping the first occurrence of each
fn distinct(values: impl IntoIterator<Item = FieldValue>) -> Vec<FieldValue> {
	let mut unique: Vec<FieldValue> = Vec::new();
	for value in values {
		if !unique.contains(&value) {
			unique.push(value);
		}
	}
	unique
}

/// Bind `params` and `parts` onto `target` with `rules`
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use weft_forms::{FormObject, Manifest, bind};
/// use weft_http::ParameterMap;
///
/// #[derive(Default)]
/// struct Profile {
///     name: String,
///     age: u32,
/// }
///
/// impl FormObject for Profile {
///     fn manifest() -> &'static Manifest<Self> {
///         static MANIFEST: LazyLock<Manifest<Profile>> = LazyLock::new(|| {
///             Manifest::builder()
///                 .field("name", |p: &mut Profile| &mut p.name)
///                 .field("age", |p: &mut Profile| &mut p.age)
///                 .build()
///         });
///         &MANIFEST
///     }
/// }
///
/// let params: ParameterMap = [("age", "abc"), ("name", "Ada")].into_iter().collect();
/// let mut profile = Profile::default();
/// let errors = bind(&params, &[], &mut profile, &[]);
///
/// assert_eq!(profile.name, "Ada");
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.get("age"), Some("'abc' is not a valid unsigned integer"));
/// ```
pub fn bind(
	params: &ParameterMap,
	parts: &[FilePart],
	target: &mut dyn Bindable,
	rules: &[BinderRule],
) -> ErrorCollector {
	FormBinder::new(rules).bind(params, parts, target)
}
