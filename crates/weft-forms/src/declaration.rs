//! Form declarations and field-binder rules
//!
//! A [`FormDeclaration`] is the registration-time record attached to an
//! action: the form's name, an optional validator, the binder rules that pick
//! editors for particular fields, and whether the form lives in the session.

use crate::editors::PropertyEditor;
use crate::errors::ErrorCollector;
use crate::value::{FieldType, ValueKind};
use regex::Regex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Validation capability for one command type
pub trait Validator<F>: Send + Sync {
	fn validate(&self, form: &F, errors: &mut ErrorCollector);
}

impl<F, V> Validator<F> for V
where
	V: Fn(&F, &mut ErrorCollector) + Send + Sync,
{
	fn validate(&self, form: &F, errors: &mut ErrorCollector) {
		self(form, errors)
	}
}

#[derive(Debug, Error)]
pub enum DeclarationError {
	#[error("Invalid property pattern '{pattern}': {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},
}

/// Associates a property name or pattern with an editor
#[derive(Clone)]
pub struct BinderRule {
	property: String,
	pattern: Regex,
	kind: Option<ValueKind>,
	editor: Arc<dyn PropertyEditor>,
}

impl BinderRule {
	/// Rule for a literal property path, or a regular expression that must
	/// match the whole path
	///
	/// During binding a rule sees the path with list indexes removed, so a
	/// parameter named `items[3].name` is matched as `items.name`.
	///
	/// # Examples
	///
	/// ```
	/// use weft_forms::BinderRule;
	/// use weft_forms::editors::StringTrimmerEditor;
	///
	/// let rule = BinderRule::new("items\\.(name|label)", StringTrimmerEditor).unwrap();
	/// assert!(rule.applies_to("items.name"));
	/// assert!(rule.applies_to("items.label"));
	/// assert!(!rule.applies_to("items.name2"));
	/// ```
	pub fn new(property: impl Into<String>, editor: impl PropertyEditor + 'static) -> Result<Self, DeclarationError> {
		let property = property.into();
		let pattern = Regex::new(&format!("^(?:{property})$")).map_err(|source| {
			DeclarationError::InvalidPattern {
				pattern: property.clone(),
				source,
			}
		})?;
		Ok(Self {
			property,
			pattern,
			kind: None,
			editor: Arc::new(editor),
		})
	}

	/// Rule applying to every property of the given kind
	pub fn for_kind(kind: ValueKind, editor: impl PropertyEditor + 'static) -> Result<Self, DeclarationError> {
		Ok(Self::new(".*", editor)?.with_kind(kind))
	}

	/// Only apply where the field holds values of `kind`
	pub fn with_kind(mut self, kind: ValueKind) -> Self {
		self.kind = Some(kind);
		self
	}

	pub fn property(&self) -> &str {
		&self.property
	}

	pub fn editor(&self) -> &dyn PropertyEditor {
		self.editor.as_ref()
	}

	pub fn applies_to(&self, path: &str) -> bool {
		self.property == path || self.pattern.is_match(path)
	}

	/// Whether the rule applies to `path` holding a field of `field_type`
	pub fn matches(&self, path: &str, field_type: &FieldType) -> bool {
		self.applies_to(path) && self.kind.is_none_or(|kind| kind == field_type.kind)
	}
}

impl fmt::Debug for BinderRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BinderRule")
			.field("property", &self.property)
			.field("kind", &self.kind)
			.finish_non_exhaustive()
	}
}

/// Registration-time description of the form an action binds
pub struct FormDeclaration<F> {
	name: String,
	validator: Option<Arc<dyn Validator<F>>>,
	binders: Vec<BinderRule>,
	session_form: bool,
	_form: PhantomData<fn() -> F>,
}

impl<F> Clone for FormDeclaration<F> {
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			validator: self.validator.clone(),
			binders: self.binders.clone(),
			session_form: self.session_form,
			_form: PhantomData,
		}
	}
}

impl<F> fmt::Debug for FormDeclaration<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormDeclaration")
			.field("name", &self.name)
			.field("type_name", &self.type_name())
			.field("validator", &self.validator.is_some())
			.field("binders", &self.binders)
			.field("session_form", &self.session_form)
			.finish()
	}
}

impl<F> FormDeclaration<F> {
	/// # Examples
	///
	/// ```
	/// use weft_forms::FormDeclaration;
	///
	/// struct Checkout;
	///
	/// let declaration = FormDeclaration::<Checkout>::new("checkout").session_form(true);
	/// assert!(declaration.is_session_form());
	/// assert!(declaration.session_attribute_name().ends_with("Checkout.CHECKOUT"));
	/// assert!(declaration.token_attribute_name().ends_with("Checkout.TOKEN"));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			validator: None,
			binders: Vec::new(),
			session_form: false,
			_form: PhantomData,
		}
	}

	pub fn validator(mut self, validator: impl Validator<F> + 'static) -> Self {
		self.validator = Some(Arc::new(validator));
		self
	}

	pub fn binder(mut self, rule: BinderRule) -> Self {
		self.binders.push(rule);
		self
	}

	pub fn session_form(mut self, session_form: bool) -> Self {
		self.session_form = session_form;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_name(&self) -> &'static str {
		std::any::type_name::<F>()
	}

	pub fn binders(&self) -> &[BinderRule] {
		&self.binders
	}

	pub fn is_session_form(&self) -> bool {
		self.session_form
	}

	pub fn has_validator(&self) -> bool {
		self.validator.is_some()
	}

	/// Run the declared validator, if any
	pub fn validate(&self, form: &F, errors: &mut ErrorCollector) {
		if let Some(validator) = &self.validator {
			validator.validate(form, errors);
		}
	}

	/// Session key of a session-scoped form: `<type>.<NAME>`
	pub fn session_attribute_name(&self) -> String {
		format!("{}.{}", self.type_name(), self.name.to_uppercase())
	}

	/// Session key of the duplicate-submission token: `<type>.TOKEN`
	pub fn token_attribute_name(&self) -> String {
		format!("{}.TOKEN", self.type_name())
	}
}
