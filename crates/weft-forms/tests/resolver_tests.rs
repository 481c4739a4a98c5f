//! Property resolution tests
//!
//! Resolution of simple, nested, indexed and mapped paths against a command
//! object graph, including fields found through `extends`.

mod fixtures;

use fixtures::{Component, Sample};
use rstest::rstest;
use weft_forms::{FieldValue, PathError, ValueKind, find_field, hidden_parameters, read_value, resolve};

#[rstest]
#[case("primitive", "primitive", ValueKind::Integer, false)]
#[case("array", "array", ValueKind::Text, true)]
#[case("component.simple", "simple", ValueKind::Text, false)]
#[case("colors", "colors", ValueKind::Enum, true)]
#[case("list[0]", "list", ValueKind::Object, false)]
fn test_resolves_declared_fields(
	#[case] path: &str,
	#[case] name: &str,
	#[case] kind: ValueKind,
	#[case] array: bool,
) {
	let mut sample = Sample::default();
	let descriptor = find_field(&mut sample, path).unwrap().unwrap();

	assert_eq!(descriptor.name, name);
	assert_eq!(descriptor.field_type.kind, kind);
	assert_eq!(descriptor.field_type.array, array);
}

#[rstest]
fn test_nested_field_reports_declaring_type() {
	let mut sample = Sample::default();
	let descriptor = find_field(&mut sample, "component.simple").unwrap().unwrap();

	assert_eq!(descriptor.declared_on, std::any::type_name::<Component>());
}

#[rstest]
fn test_indexed_path_needs_existing_element() {
	let mut sample = Sample::default();
	assert!(find_field(&mut sample, "list[0].indexed").unwrap().is_none());

	sample.list.push(Component::default());
	let descriptor = find_field(&mut sample, "list[0].indexed").unwrap().unwrap();
	assert_eq!(descriptor.name, "indexed");
	assert!(find_field(&mut sample, "list[1].indexed").unwrap().is_none());
}

#[rstest]
fn test_descriptor_independent_of_collection_contents() {
	let mut sparse = Sample::default();
	sparse.list.push(Component::default());

	let mut full = Sample::default();
	full.list = vec![Component::default(); 5];

	assert_eq!(
		find_field(&mut sparse, "list[0].indexed").unwrap(),
		find_field(&mut full, "list[0].indexed").unwrap()
	);
}

#[rstest]
fn test_growth_list_pads_to_index() {
	let mut sample = Sample::default();
	let descriptor = find_field(&mut sample, "rows[3].simple").unwrap().unwrap();

	assert_eq!(descriptor.name, "simple");
	assert_eq!(sample.rows.len(), 4);
}

#[rstest]
fn test_mapped_path_needs_existing_key() {
	let mut sample = Sample::default();
	assert!(find_field(&mut sample, "map(component).mapped").unwrap().is_none());

	sample.map.insert("component".to_string(), Component::default());
	let descriptor = find_field(&mut sample, "map(component).mapped").unwrap().unwrap();
	assert_eq!(descriptor.name, "mapped");
	assert!(!descriptor.field_type.primitive);
}

#[rstest]
fn test_terminal_lookup_walks_extended_type() {
	let mut sample = Sample::default();
	let descriptor = find_field(&mut sample, "inherited").unwrap().unwrap();

	assert_eq!(descriptor.declared_on, std::any::type_name::<fixtures::Audited>());
}

#[rstest]
fn test_intermediate_lookup_walks_extended_type() {
	let mut sample = Sample::default();
	let descriptor = find_field(&mut sample, "address.simple").unwrap().unwrap();
	assert_eq!(descriptor.declared_on, std::any::type_name::<Component>());

	assert!(find_field(&mut sample, "contacts[0].simple").unwrap().is_none());
	sample.audited.contacts.push(Component::default());
	assert_eq!(find_field(&mut sample, "contacts[0].simple").unwrap().unwrap().name, "simple");
}

#[rstest]
#[case("missing")]
#[case("component.missing")]
#[case("primitive.deeper")]
#[case("component[0].simple")]
fn test_unresolvable_paths_are_not_errors(#[case] path: &str) {
	let mut sample = Sample::default();
	assert!(find_field(&mut sample, path).unwrap().is_none());
}

#[rstest]
#[case("a..b")]
#[case("list[x]")]
#[case("map(open")]
fn test_malformed_paths_are_errors(#[case] path: &str) {
	let mut sample = Sample::default();
	let err = find_field(&mut sample, path).unwrap_err();
	assert!(matches!(err, PathError::Malformed { .. }));
}

#[rstest]
fn test_assign_through_resolved_field() {
	let mut sample = Sample::default();
	sample.list.push(Component::default());
	{
		let mut resolved = resolve(&mut sample, "list[0].simple").unwrap().unwrap();
		resolved
			.assign(FieldValue::from("first"), weft_forms::Coercion::Exact)
			.unwrap();
	}
	assert_eq!(sample.list[0].simple, "first");
	assert_eq!(
		read_value(&mut sample, "list[0].simple").unwrap(),
		Some(FieldValue::from("first"))
	);
}

#[rstest]
fn test_hidden_parameters_encode_current_values() {
	let mut sample = Sample::default();
	sample.name = "Ada".to_string();
	sample.scores = vec![3, 5];
	sample.boxed = None;

	let params = hidden_parameters(&mut sample, &["name", "scores", "boxed", "missing"]).unwrap();

	assert_eq!(params.get("name"), Some("Ada"));
	assert_eq!(params.get_all("scores"), ["3".to_string(), "5".to_string()]);
	assert!(!params.contains_key("boxed"));
	assert!(!params.contains_key("missing"));
}
