//! Field manifests: the explicit accessor table of a command object
//!
//! A command type implements [`FormObject`] by returning a static
//! [`Manifest`] that lists each bindable field together with a plain accessor
//! function. Every `FormObject` is usable as a type-erased [`Bindable`],
//! which is what the resolver and binder walk.
//!
//! ```
//! use std::sync::LazyLock;
//! use weft_forms::{FormObject, Manifest};
//!
//! #[derive(Default)]
//! struct Address {
//!     city: String,
//! }
//!
//! impl FormObject for Address {
//!     fn manifest() -> &'static Manifest<Self> {
//!         static MANIFEST: LazyLock<Manifest<Address>> = LazyLock::new(|| {
//!             Manifest::builder().field("city", |a: &mut Address| &mut a.city).build()
//!         });
//!         &MANIFEST
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//!     age: u32,
//!     address: Address,
//! }
//!
//! impl FormObject for Person {
//!     fn manifest() -> &'static Manifest<Self> {
//!         static MANIFEST: LazyLock<Manifest<Person>> = LazyLock::new(|| {
//!             Manifest::builder()
//!                 .field("name", |p: &mut Person| &mut p.name)
//!                 .field("age", |p: &mut Person| &mut p.age)
//!                 .nested("address", |p: &mut Person| &mut p.address)
//!                 .build()
//!         });
//!         &MANIFEST
//!     }
//! }
//!
//! assert!(Person::manifest().contains("address"));
//! assert_eq!(Person::manifest().names().count(), 3);
//! ```

use crate::path::Selector;
use crate::slot::{
	ENUM_ARRAY_TYPE, ENUM_TYPE, FieldSlot, FormEnum, OPTIONAL_ENUM_TYPE, enum_value, parse_enum,
};
use crate::value::{Coercion, ConversionError, FieldType, FieldValue};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// A command object with a static field manifest
pub trait FormObject: Sized + 'static {
	fn manifest() -> &'static Manifest<Self>;

	/// Duplicate-submission token carried by the form, if it has one
	fn token(&self) -> Option<&str> {
		None
	}

	/// Store a freshly issued duplicate-submission token
	fn set_token(&mut self, _token: String) {}
}

/// Describes one declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
	pub name: &'static str,
	pub field_type: FieldType,
	/// Type that declares the field
	pub declared_on: &'static str,
}

/// Type-erased view of a command object used by the resolver and binder
pub trait Bindable {
	fn type_name(&self) -> &'static str;

	/// Descriptor of a field declared directly on this object
	fn descriptor(&self, name: &str) -> Option<FieldDescriptor>;

	/// Whether `name` is a nested object, list, or map declared directly on this object
	fn has_child(&self, name: &str) -> bool;

	/// Step into a nested object, list element, or map value
	fn child_mut(&mut self, name: &str, selector: &Selector) -> Option<&mut dyn Bindable>;

	/// The embedded object this type extends, searched after its own fields
	fn parent_mut(&mut self) -> Option<&mut dyn Bindable>;

	fn assign(
		&mut self,
		name: &str,
		selector: &Selector,
		value: FieldValue,
		coercion: Coercion,
	) -> Result<(), ConversionError>;

	fn value(&mut self, name: &str, selector: &Selector) -> Option<FieldValue>;
}

trait SlotAccess<T>: Send + Sync {
	fn assign(
		&self,
		target: &mut T,
		selector: &Selector,
		value: FieldValue,
		coercion: Coercion,
	) -> Result<(), ConversionError>;

	fn value(&self, target: &mut T, selector: &Selector) -> Option<FieldValue>;
}

trait ChildAccess<T>: Send + Sync {
	fn child<'a>(&self, target: &'a mut T, selector: &Selector) -> Option<&'a mut dyn Bindable>;
}

struct ScalarAccess<T, V> {
	access: fn(&mut T) -> &mut V,
}

impl<T, V: FieldSlot + 'static> SlotAccess<T> for ScalarAccess<T, V> {
	fn assign(
		&self,
		target: &mut T,
		selector: &Selector,
		value: FieldValue,
		coercion: Coercion,
	) -> Result<(), ConversionError> {
		let slot = (self.access)(target);
		match selector {
			Selector::Whole => slot.assign(value, coercion),
			other => slot.assign_at(other, value, coercion),
		}
	}

	fn value(&self, target: &mut T, selector: &Selector) -> Option<FieldValue> {
		let whole = (self.access)(target).value();
		match (selector, whole) {
			(Selector::Whole, value) => Some(value),
			(Selector::Index(i), FieldValue::List(items)) => items.into_iter().nth(*i),
			_ => None,
		}
	}
}

struct EnumAccess<T, E> {
	access: fn(&mut T) -> &mut E,
}

impl<T, E: FormEnum + Default> SlotAccess<T> for EnumAccess<T, E> {
	fn assign(
		&self,
		target: &mut T,
		selector: &Selector,
		value: FieldValue,
		_coercion: Coercion,
	) -> Result<(), ConversionError> {
		if *selector != Selector::Whole {
			return Err(ConversionError::NotIndexed(format!("{selector:?}")));
		}
		*(self.access)(target) = match value {
			FieldValue::Null => E::default(),
			other => parse_enum(other)?,
		};
		Ok(())
	}

	fn value(&self, target: &mut T, _selector: &Selector) -> Option<FieldValue> {
		Some(enum_value((self.access)(target)))
	}
}

struct OptionalEnumAccess<T, E> {
	access: fn(&mut T) -> &mut Option<E>,
}

impl<T, E: FormEnum> SlotAccess<T> for OptionalEnumAccess<T, E> {
	fn assign(
		&self,
		target: &mut T,
		selector: &Selector,
		value: FieldValue,
		_coercion: Coercion,
	) -> Result<(), ConversionError> {
		if *selector != Selector::Whole {
			return Err(ConversionError::NotIndexed(format!("{selector:?}")));
		}
		*(self.access)(target) = match value {
			FieldValue::Null => None,
			other => Some(parse_enum(other)?),
		};
		Ok(())
	}

	fn value(&self, target: &mut T, _selector: &Selector) -> Option<FieldValue> {
		Some(
			(self.access)(target)
				.as_ref()
				.map(enum_value)
				.unwrap_or(FieldValue::Null),
		)
	}
}

struct EnumArrayAccess<T, E> {
	access: fn(&mut T) -> &mut Vec<E>,
}

impl<T, E: FormEnum> SlotAccess<T> for EnumArrayAccess<T, E> {
	fn assign(
		&self,
		target: &mut T,
		selector: &Selector,
		value: FieldValue,
		_coercion: Coercion,
	) -> Result<(), ConversionError> {
		if *selector != Selector::Whole {
			return Err(ConversionError::NotIndexed(format!("{selector:?}")));
		}
		let mut items = Vec::new();
		value.flatten_into(&mut items);
		let parsed = items
			.into_iter()
			.filter(|item| !item.is_null())
			.map(parse_enum)
			.collect::<Result<Vec<E>, _>>()?;
		*(self.access)(target) = parsed;
		Ok(())
	}

	fn value(&self, target: &mut T, _selector: &Selector) -> Option<FieldValue> {
		Some(FieldValue::List(
			(self.access)(target).iter().map(enum_value).collect(),
		))
	}
}

struct NestedAccess<T, C> {
	access: fn(&mut T) -> &mut C,
}

impl<T, C: Bindable + 'static> ChildAccess<T> for NestedAccess<T, C> {
	fn child<'a>(&self, target: &'a mut T, selector: &Selector) -> Option<&'a mut dyn Bindable> {
		match selector {
			Selector::Whole => Some((self.access)(target)),
			_ => None,
		}
	}
}

struct ListAccess<T, C> {
	access: fn(&mut T) -> &mut Vec<C>,
	grow: Option<fn() -> C>,
}

impl<T, C: Bindable + 'static> ChildAccess<T> for ListAccess<T, C> {
	fn child<'a>(&self, target: &'a mut T, selector: &Selector) -> Option<&'a mut dyn Bindable> {
		let Selector::Index(index) = selector else {
			return None;
		};
		let items = (self.access)(target);
		if let Some(filler) = self.grow {
			while items.len() <= *index {
				items.push(filler());
			}
		}
		items.get_mut(*index).map(|item| item as &mut dyn Bindable)
	}
}

/// Keyed collection of bindable values reachable through `name(key)`
pub trait ChildMap {
	type Child: Bindable + 'static;

	fn child_mut(&mut self, key: &str) -> Option<&mut Self::Child>;
}

impl<C: Bindable + 'static> ChildMap for HashMap<String, C> {
	type Child = C;

	fn child_mut(&mut self, key: &str) -> Option<&mut C> {
		self.get_mut(key)
	}
}

impl<C: Bindable + 'static> ChildMap for BTreeMap<String, C> {
	type Child = C;

	fn child_mut(&mut self, key: &str) -> Option<&mut C> {
		self.get_mut(key)
	}
}

struct MapAccess<T, M> {
	access: fn(&mut T) -> &mut M,
}

impl<T, M: ChildMap + 'static> ChildAccess<T> for MapAccess<T, M> {
	fn child<'a>(&self, target: &'a mut T, selector: &Selector) -> Option<&'a mut dyn Bindable> {
		let Selector::Key(key) = selector else {
			return None;
		};
		(self.access)(target)
			.child_mut(key)
			.map(|child| child as &mut dyn Bindable)
	}
}

enum Entry<T> {
	Field {
		field_type: FieldType,
		access: Box<dyn SlotAccess<T>>,
	},
	Child {
		access: Box<dyn ChildAccess<T>>,
	},
}

impl<T> Entry<T> {
	fn field_type(&self) -> FieldType {
		match self {
			Entry::Field { field_type, .. } => *field_type,
			Entry::Child { .. } => FieldType::object(),
		}
	}
}

/// Accessor table for a command type
pub struct Manifest<T> {
	type_name: &'static str,
	entries: IndexMap<&'static str, Entry<T>>,
	parent: Option<Box<dyn ChildAccess<T>>>,
}

impl<T: 'static> Manifest<T> {
	pub fn builder() -> ManifestBuilder<T> {
		ManifestBuilder {
			manifest: Manifest {
				type_name: std::any::type_name::<T>(),
				entries: IndexMap::new(),
				parent: None,
			},
		}
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Declared field names in registration order
	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.entries.keys().copied()
	}

	pub fn descriptor(&self, name: &str) -> Option<FieldDescriptor> {
		self.entries.get_key_value(name).map(|(key, entry)| FieldDescriptor {
			name: *key,
			field_type: entry.field_type(),
			declared_on: self.type_name,
		})
	}
}

/// Builder for [`Manifest`]
pub struct ManifestBuilder<T> {
	manifest: Manifest<T>,
}

impl<T: 'static> ManifestBuilder<T> {
	fn entry(mut self, name: &'static str, entry: Entry<T>) -> Self {
		self.manifest.entries.insert(name, entry);
		self
	}

	/// A scalar, optional, or array field of a built-in value type
	pub fn field<V: FieldSlot + 'static>(self, name: &'static str, access: fn(&mut T) -> &mut V) -> Self {
		self.entry(
			name,
			Entry::Field {
				field_type: V::field_type(),
				access: Box::new(ScalarAccess { access }),
			},
		)
	}

	/// A required enum field; blank input resets it to the default variant
	pub fn enumeration<E: FormEnum + Default>(self, name: &'static str, access: fn(&mut T) -> &mut E) -> Self {
		self.entry(
			name,
			Entry::Field {
				field_type: ENUM_TYPE,
				access: Box::new(EnumAccess { access }),
			},
		)
	}

	pub fn optional_enumeration<E: FormEnum>(
		self,
		name: &'static str,
		access: fn(&mut T) -> &mut Option<E>,
	) -> Self {
		self.entry(
			name,
			Entry::Field {
				field_type: OPTIONAL_ENUM_TYPE,
				access: Box::new(OptionalEnumAccess { access }),
			},
		)
	}

	pub fn enumeration_array<E: FormEnum>(self, name: &'static str, access: fn(&mut T) -> &mut Vec<E>) -> Self {
		self.entry(
			name,
			Entry::Field {
				field_type: ENUM_ARRAY_TYPE,
				access: Box::new(EnumArrayAccess { access }),
			},
		)
	}

	/// A nested command object reachable as `name.field`
	pub fn nested<C: Bindable + 'static>(self, name: &'static str, access: fn(&mut T) -> &mut C) -> Self {
		self.entry(
			name,
			Entry::Child {
				access: Box::new(NestedAccess { access }),
			},
		)
	}

	/// Objects reachable as `name[i].field`; out-of-range indexes do not resolve
	pub fn list<C: Bindable + 'static>(self, name: &'static str, access: fn(&mut T) -> &mut Vec<C>) -> Self {
		self.entry(
			name,
			Entry::Child {
				access: Box::new(ListAccess { access, grow: None }),
			},
		)
	}

	/// Like [`list`](Self::list), but pads with default elements up to the index
	pub fn growth_list<C: Bindable + Default + 'static>(
		self,
		name: &'static str,
		access: fn(&mut T) -> &mut Vec<C>,
	) -> Self {
		self.entry(
			name,
			Entry::Child {
				access: Box::new(ListAccess {
					access,
					grow: Some(C::default),
				}),
			},
		)
	}

	/// Objects reachable as `name(key).field`
	pub fn map<M: ChildMap + 'static>(self, name: &'static str, access: fn(&mut T) -> &mut M) -> Self {
		self.entry(
			name,
			Entry::Child {
				access: Box::new(MapAccess { access }),
			},
		)
	}

	/// Embedded object whose fields are found after this type's own fields
	pub fn extends<P: Bindable + 'static>(mut self, access: fn(&mut T) -> &mut P) -> Self {
		self.manifest.parent = Some(Box::new(NestedAccess { access }));
		self
	}

	pub fn build(self) -> Manifest<T> {
		self.manifest
	}
}

impl<T: FormObject> Bindable for T {
	fn type_name(&self) -> &'static str {
		T::manifest().type_name
	}

	fn descriptor(&self, name: &str) -> Option<FieldDescriptor> {
		T::manifest().descriptor(name)
	}

	fn has_child(&self, name: &str) -> bool {
		matches!(T::manifest().entries.get(name), Some(Entry::Child { .. }))
	}

	fn child_mut(&mut self, name: &str, selector: &Selector) -> Option<&mut dyn Bindable> {
		match T::manifest().entries.get(name)? {
			Entry::Child { access } => access.child(self, selector),
			Entry::Field { .. } => None,
		}
	}

	fn parent_mut(&mut self) -> Option<&mut dyn Bindable> {
		let parent = T::manifest().parent.as_ref()?;
		parent.child(self, &Selector::Whole)
	}

	fn assign(
		&mut self,
		name: &str,
		selector: &Selector,
		value: FieldValue,
		coercion: Coercion,
	) -> Result<(), ConversionError> {
		match T::manifest().entries.get(name) {
			Some(Entry::Field { access, .. }) => access.assign(self, selector, value, coercion),
			_ => Err(ConversionError::NotAssignable(name.to_string())),
		}
	}

	fn value(&mut self, name: &str, selector: &Selector) -> Option<FieldValue> {
		match T::manifest().entries.get(name)? {
			Entry::Field { access, .. } => access.value(self, selector),
			Entry::Child { .. } => None,
		}
	}
}
