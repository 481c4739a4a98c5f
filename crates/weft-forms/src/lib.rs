//! Form binding for weft
//!
//! This crate maps flat, string-keyed request parameters onto typed command
//! objects:
//! - Property paths with nesting (`a.b`), indexes (`a[2]`) and keys (`a(k)`)
//! - Explicit field manifests in place of runtime reflection
//! - Property editors for dates, currency, percentages and delimited strings
//! - An ordered error collector with nested validation scopes
//! - Form declarations, binder rules and the binder itself

pub mod binder;
pub mod declaration;
pub mod editors;
pub mod errors;
pub mod manifest;
pub mod path;
pub mod resolver;
pub mod slot;
pub mod value;

pub use binder::{BindError, FormBinder, bind};
pub use declaration::{BinderRule, DeclarationError, FormDeclaration, Validator};
pub use editors::{EditorError, PropertyEditor};
pub use errors::ErrorCollector;
pub use manifest::{Bindable, ChildMap, FieldDescriptor, FormObject, Manifest, ManifestBuilder};
pub use path::{PathError, PropertyPath, Segment, Selector, canonical_field_path};
pub use resolver::{Resolved, find_field, hidden_parameters, read_value, resolve};
pub use slot::{FieldSlot, FormEnum};
pub use value::{Coercion, ConversionError, FieldType, FieldValue, ScalarValue, ValueKind};
