//! Property path resolution against a command object graph

use crate::manifest::{Bindable, FieldDescriptor};
use crate::path::{PathError, PropertyPath, Selector};
use crate::value::{Coercion, ConversionError, FieldValue};
use weft_http::ParameterMap;

/// A field reached by a property path, ready for assignment
pub struct Resolved<'a> {
	owner: &'a mut dyn Bindable,
	descriptor: FieldDescriptor,
	selector: Selector,
}

impl<'a> Resolved<'a> {
	pub fn descriptor(&self) -> FieldDescriptor {
		self.descriptor
	}

	/// Index or key of the terminal segment, if any
	pub fn selector(&self) -> &Selector {
		&self.selector
	}

	pub fn assign(&mut self, value: FieldValue, coercion: Coercion) -> Result<(), ConversionError> {
		self.owner
			.assign(self.descriptor.name, &self.selector, value, coercion)
	}

	pub fn value(&mut self) -> Option<FieldValue> {
		self.owner.value(self.descriptor.name, &self.selector)
	}
}

/// Walk `path` from `root` to its terminal field
///
/// Every segment but the last must step into a nested object, an existing
/// list element, or an existing map entry; otherwise the path does not
/// resolve and `Ok(None)` is returned. Each segment is looked up on the
/// current object and then on the objects it extends.
///
/// # Errors
///
/// Returns [`PathError`] when `path` is syntactically malformed.
pub fn resolve<'a>(root: &'a mut dyn Bindable, path: &str) -> Result<Option<Resolved<'a>>, PathError> {
	let parsed = PropertyPath::parse(path)?;
	let (terminal, intermediate) = match parsed.segments().split_last() {
		Some(split) => split,
		None => return Ok(None),
	};

	let mut current = root;
	for segment in intermediate {
		while !current.has_child(&segment.name) {
			current = match current.parent_mut() {
				Some(parent) => parent,
				None => {
					tracing::trace!(path, segment = %segment, "intermediate segment is not declared");
					return Ok(None);
				}
			};
		}
		current = match current.child_mut(&segment.name, &segment.selector) {
			Some(child) => child,
			None => {
				tracing::trace!(path, segment = %segment, "intermediate segment does not resolve");
				return Ok(None);
			}
		};
	}

	let mut owner = current;
	loop {
		if let Some(descriptor) = owner.descriptor(&terminal.name) {
			return Ok(Some(Resolved {
				owner,
				descriptor,
				selector: terminal.selector.clone(),
			}));
		}
		owner = match owner.parent_mut() {
			Some(parent) => parent,
			None => return Ok(None),
		};
	}
}

/// Descriptor of the field `path` ends at, if it resolves
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use weft_forms::{FormObject, Manifest, ValueKind, find_field};
///
/// #[derive(Default)]
/// struct Signup {
///     email: String,
///     age: Option<u32>,
/// }
///
/// impl FormObject for Signup {
///     fn manifest() -> &'static Manifest<Self> {
///         static MANIFEST: LazyLock<Manifest<Signup>> = LazyLock::new(|| {
///             Manifest::builder()
///                 .field("email", |s: &mut Signup| &mut s.email)
///                 .field("age", |s: &mut Signup| &mut s.age)
///                 .build()
///         });
///         &MANIFEST
///     }
/// }
///
/// let mut signup = Signup::default();
/// let age = find_field(&mut signup, "age").unwrap().unwrap();
/// assert_eq!(age.field_type.kind, ValueKind::Integer);
/// assert!(!age.field_type.primitive);
/// assert!(find_field(&mut signup, "missing").unwrap().is_none());
/// ```
pub fn find_field(root: &mut dyn Bindable, path: &str) -> Result<Option<FieldDescriptor>, PathError> {
	Ok(resolve(root, path)?.map(|resolved| resolved.descriptor()))
}

/// Current value of the field `path` ends at
pub fn read_value(root: &mut dyn Bindable, path: &str) -> Result<Option<FieldValue>, PathError> {
	Ok(resolve(root, path)?.and_then(|mut resolved| resolved.value()))
}

/// Encode the current values at `paths` as request parameters
///
/// Used to carry properties that are not shown on a page through that page's
/// form. Absent values are left out and list values become repeated
/// parameters.
pub fn hidden_parameters<S: AsRef<str>>(root: &mut dyn Bindable, paths: &[S]) -> Result<ParameterMap, PathError> {
	let mut params = ParameterMap::new();
	for path in paths {
		let path = path.as_ref();
		match read_value(root, path)? {
			Some(FieldValue::List(items)) => {
				for item in items.into_iter().filter(|item| !item.is_null()) {
					params.add(path, item.to_string());
				}
			}
			Some(FieldValue::Null | FieldValue::Bytes(_)) | None => {}
			Some(value) => params.add(path, value.to_string()),
		}
	}
	Ok(params)
}
