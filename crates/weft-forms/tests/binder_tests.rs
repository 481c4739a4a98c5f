//! Form binder tests
//!
//! Binding of scalar, optional, enum, array, nested and uploaded values,
//! binder rules with editors, and partial-failure error reporting.

mod fixtures;

use bytes::Bytes;
use chrono::NaiveDate;
use fixtures::{Color, Component, Sample};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use weft_forms::editors::{CurrencyEditor, DateEditor, StringArrayEditor, StringTrimmerEditor};
use weft_forms::{BinderRule, ErrorCollector, FormBinder, ValueKind, bind};
use weft_http::{FilePart, Method, ParameterMap, Request};

fn params(pairs: &[(&str, &str)]) -> ParameterMap {
	pairs.iter().copied().collect()
}

#[rstest]
fn test_bad_field_does_not_stop_siblings() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("primitive", "abc"), ("name", "Ada")]),
		&[],
		&mut sample,
		&[],
	);

	assert_eq!(sample.name, "Ada");
	assert_eq!(sample.primitive, 0);
	assert_eq!(errors.len(), 1);
	assert_eq!(errors.get("primitive"), Some("'abc' is not a valid integer"));
}

#[rstest]
fn test_scalar_conversions() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[
			("primitive", "42"),
			("boxed", "7"),
			("price", "19.99"),
			("born", "1976-07-04"),
			("active", "on"),
		]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty(), "{errors}");
	assert_eq!(sample.primitive, 42);
	assert_eq!(sample.boxed, Some(7));
	assert_eq!(sample.price, Decimal::new(1999, 2));
	assert_eq!(sample.born, NaiveDate::from_ymd_opt(1976, 7, 4));
	assert!(sample.active);
}

#[rstest]
fn test_blank_resets_primitive_and_clears_optional() {
	let mut sample = Sample {
		primitive: 9,
		boxed: Some(3),
		note: Some("kept".to_string()),
		..Default::default()
	};
	let errors = bind(
		&params(&[("primitive", ""), ("boxed", ""), ("note", "")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.primitive, 0);
	assert_eq!(sample.boxed, None);
	assert_eq!(sample.note, None);
}

#[rstest]
fn test_enum_fields() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("color", "BLUE"), ("favorite", "GREEN")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.color, Color::Blue);
	assert_eq!(sample.favorite, Some(Color::Green));
}

#[rstest]
fn test_unknown_enum_constant() {
	let mut sample = Sample::default();
	let errors = bind(&params(&[("color", "PURPLE")]), &[], &mut sample, &[]);

	let message = errors.get("color").unwrap();
	assert!(message.starts_with("No enum constant "));
	assert!(message.ends_with("Color.PURPLE"));
	assert_eq!(sample.color, Color::Red);
}

#[rstest]
fn test_enum_array_drops_blanks() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("colors", "RED"), ("colors", ""), ("colors", "BLUE")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.colors, vec![Color::Red, Color::Blue]);
}

#[rstest]
fn test_enum_array_deduplicates_by_variant() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("colors", "RED"), ("colors", " RED"), ("colors", "BLUE"), ("colors", "RED ")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.colors, vec![Color::Red, Color::Blue]);
}

#[rstest]
fn test_array_values_are_deduplicated() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("scores", "1"), ("scores", "2"), ("scores", "1")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.scores, vec![1, 2]);
}

#[rstest]
fn test_array_editor_output_is_flattened() {
	let rules = [BinderRule::new("array", StringArrayEditor::comma_delimited()).unwrap()];
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("array", "a, b"), ("array", "b,c")]),
		&[],
		&mut sample,
		&rules,
	);

	assert!(errors.is_empty());
	assert_eq!(sample.array, vec!["a", "b", "c"]);
}

#[rstest]
fn test_rules_match_paths_without_indexes() {
	let rules = [BinderRule::new("list\\.indexed", StringTrimmerEditor).unwrap()];
	let mut sample = Sample::default();
	sample.list.push(Component::default());
	let errors = bind(&params(&[("list[0].indexed", "  first  ")]), &[], &mut sample, &rules);

	assert!(errors.is_empty());
	assert_eq!(sample.list[0].indexed, "first");
}

#[rstest]
fn test_indexed_terminal_assigns_element() {
	let mut sample = Sample::default();
	let errors = bind(&params(&[("array[1]", "x")]), &[], &mut sample, &[]);

	assert!(errors.is_empty());
	assert_eq!(sample.array, vec!["", "x"]);
}

#[rstest]
fn test_nested_indexed_and_mapped_paths() {
	let mut sample = Sample::default();
	sample.list.push(Component::default());
	sample.map.insert("home".to_string(), Component::default());

	let errors = bind(
		&params(&[
			("component.simple", "top"),
			("list[0].indexed", "first"),
			("list[4].indexed", "ignored"),
			("map(home).mapped", "12"),
			("rows[1].simple", "grown"),
		]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.component.simple, "top");
	assert_eq!(sample.list.len(), 1);
	assert_eq!(sample.list[0].indexed, "first");
	assert_eq!(sample.map["home"].mapped, Some(12));
	assert_eq!(sample.rows.len(), 2);
	assert_eq!(sample.rows[1].simple, "grown");
}

#[rstest]
fn test_extended_fields_bind() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("inherited", "yes"), ("revision", "3")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.audited.inherited, "yes");
	assert_eq!(sample.audited.revision, 3);
}

#[rstest]
fn test_children_of_extended_type_bind() {
	let mut sample = Sample::default();
	sample.audited.contacts.push(Component::default());
	let errors = bind(
		&params(&[("address.simple", "Main St"), ("contacts[0].indexed", "office"), ("name", "x")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
	assert_eq!(sample.name, "x");
	assert_eq!(sample.audited.address.simple, "Main St");
	assert_eq!(sample.audited.contacts[0].indexed, "office");
}

#[rstest]
fn test_unknown_parameters_are_skipped() {
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[("_choice", "next"), ("component", "text")]),
		&[],
		&mut sample,
		&[],
	);

	assert!(errors.is_empty());
}

#[rstest]
fn test_malformed_key_is_a_field_error() {
	let mut sample = Sample::default();
	let errors = bind(&params(&[("a..b", "1"), ("name", "ok")]), &[], &mut sample, &[]);

	assert!(errors.is_set("a..b"));
	assert_eq!(sample.name, "ok");
}

#[rstest]
fn test_rules_decode_without_coercion() {
	let rules = [
		BinderRule::new("price", CurrencyEditor::new()).unwrap(),
		BinderRule::new("born", DateEditor::new()).unwrap(),
		BinderRule::for_kind(ValueKind::Text, StringTrimmerEditor).unwrap(),
	];
	let mut sample = Sample::default();
	let errors = bind(
		&params(&[
			("price", "$1,234.50"),
			("born", "07/04/1976"),
			("name", "  Ada  "),
			("note", "   "),
		]),
		&[],
		&mut sample,
		&rules,
	);

	assert!(errors.is_empty(), "{errors}");
	assert_eq!(sample.price, Decimal::new(123450, 2));
	assert_eq!(sample.born, NaiveDate::from_ymd_opt(1976, 7, 4));
	assert_eq!(sample.name, "Ada");
	assert_eq!(sample.note, None);
}

#[rstest]
fn test_editor_message_becomes_field_error() {
	let rules = [BinderRule::new("price", CurrencyEditor::new()).unwrap()];
	let mut sample = Sample::default();
	let errors = bind(&params(&[("price", "lots")]), &[], &mut sample, &rules);

	assert_eq!(
		errors.get("price"),
		Some("Please enter a number in the format '$999.99'")
	);
}

#[rstest]
fn test_existing_error_is_not_overwritten() {
	let mut sample = Sample::default();
	let mut errors = ErrorCollector::new();
	errors.put("primitive", "Set by the application");

	FormBinder::new(&[]).bind_into(&params(&[("primitive", "abc")]), &[], &mut sample, &mut errors);

	assert_eq!(errors.get("primitive"), Some("Set by the application"));
	assert_eq!(errors.len(), 1);
}

#[rstest]
fn test_multipart_parts() {
	let request = Request::builder()
		.method(Method::POST)
		.uri("/upload.act")
		.part(FilePart::field("name", "Ada"))
		.part(FilePart::field("scores", "4"))
		.part(FilePart::field("scores", "5"))
		.part(FilePart::file("avatar", "me.png", "image/png", vec![1u8, 2, 3]))
		.part(FilePart::file("unknown", "x.bin", "application/octet-stream", vec![0u8]))
		.build()
		.unwrap();
	assert!(request.is_multipart());

	let mut sample = Sample::default();
	let mut errors = ErrorCollector::new();
	FormBinder::new(&[]).bind_request(&request, &mut sample, &mut errors);

	assert!(errors.is_empty(), "{errors}");
	assert_eq!(sample.name, "Ada");
	assert_eq!(sample.scores, vec![4, 5]);
	assert_eq!(sample.avatar, Bytes::from_static(&[1, 2, 3]));
}

#[rstest]
fn test_file_part_for_text_field_is_recorded() {
	let mut sample = Sample::default();
	let parts = [FilePart::file("primitive", "n.txt", "text/plain", vec![b'1'])];
	let errors = bind(&ParameterMap::new(), &parts, &mut sample, &[]);

	assert!(errors.is_set("primitive"));
}

proptest! {
	#[test]
	fn test_blank_binding_is_idempotent(primitive in any::<i32>(), boxed in any::<Option<i32>>(), name in "[a-z]{0,8}") {
		let blank = params(&[("primitive", ""), ("boxed", ""), ("name", "")]);
		let mut once = Sample { primitive, boxed, name: name.clone(), ..Default::default() };
		let mut twice = Sample { primitive, boxed, name, ..Default::default() };

		bind(&blank, &[], &mut once, &[]);
		bind(&blank, &[], &mut twice, &[]);
		bind(&blank, &[], &mut twice, &[]);

		prop_assert_eq!(once.primitive, 0);
		prop_assert_eq!(once.boxed, None);
		prop_assert_eq!(once.primitive, twice.primitive);
		prop_assert_eq!(once.boxed, twice.boxed);
		prop_assert_eq!(once.name, twice.name);
	}

	#[test]
	fn test_integer_text_round_trips(value in any::<i32>()) {
		let text = value.to_string();
		let mut sample = Sample::default();
		let errors = bind(&params(&[("primitive", text.as_str())]), &[], &mut sample, &[]);
		prop_assert!(errors.is_empty());
		prop_assert_eq!(sample.primitive, value);
	}
}
