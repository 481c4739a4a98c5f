//! Command objects shared by the integration tests

#![allow(dead_code)]

use bytes::Bytes;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::LazyLock;
use weft_forms::{FormEnum, FormObject, Manifest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
	#[default]
	Red,
	Green,
	Blue,
}

impl FormEnum for Color {
	fn variants() -> &'static [Self] {
		&[Color::Red, Color::Green, Color::Blue]
	}

	fn name(&self) -> &'static str {
		match self {
			Color::Red => "RED",
			Color::Green => "GREEN",
			Color::Blue => "BLUE",
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
	pub simple: String,
	pub indexed: String,
	pub mapped: Option<i32>,
}

impl FormObject for Component {
	fn manifest() -> &'static Manifest<Self> {
		static MANIFEST: LazyLock<Manifest<Component>> = LazyLock::new(|| {
			Manifest::builder()
				.field("simple", |c: &mut Component| &mut c.simple)
				.field("indexed", |c: &mut Component| &mut c.indexed)
				.field("mapped", |c: &mut Component| &mut c.mapped)
				.build()
		});
		&MANIFEST
	}
}

#[derive(Debug, Default)]
pub struct Audited {
	pub inherited: String,
	pub revision: u32,
	pub address: Component,
	pub contacts: Vec<Component>,
}

impl FormObject for Audited {
	fn manifest() -> &'static Manifest<Self> {
		static MANIFEST: LazyLock<Manifest<Audited>> = LazyLock::new(|| {
			Manifest::builder()
				.field("inherited", |a: &mut Audited| &mut a.inherited)
				.field("revision", |a: &mut Audited| &mut a.revision)
				.nested("address", |a: &mut Audited| &mut a.address)
				.list("contacts", |a: &mut Audited| &mut a.contacts)
				.build()
		});
		&MANIFEST
	}
}

#[derive(Debug, Default)]
pub struct Sample {
	pub audited: Audited,
	pub primitive: i32,
	pub boxed: Option<i32>,
	pub name: String,
	pub note: Option<String>,
	pub array: Vec<String>,
	pub scores: Vec<i32>,
	pub component: Component,
	pub list: Vec<Component>,
	pub rows: Vec<Component>,
	pub map: HashMap<String, Component>,
	pub color: Color,
	pub favorite: Option<Color>,
	pub colors: Vec<Color>,
	pub price: Decimal,
	pub ratio: Option<Decimal>,
	pub born: Option<NaiveDate>,
	pub avatar: Bytes,
	pub active: bool,
}

impl FormObject for Sample {
	fn manifest() -> &'static Manifest<Self> {
		static MANIFEST: LazyLock<Manifest<Sample>> = LazyLock::new(|| {
			Manifest::builder()
				.field("primitive", |s: &mut Sample| &mut s.primitive)
				.field("boxed", |s: &mut Sample| &mut s.boxed)
				.field("name", |s: &mut Sample| &mut s.name)
				.field("note", |s: &mut Sample| &mut s.note)
				.field("array", |s: &mut Sample| &mut s.array)
				.field("scores", |s: &mut Sample| &mut s.scores)
				.nested("component", |s: &mut Sample| &mut s.component)
				.list("list", |s: &mut Sample| &mut s.list)
				.growth_list("rows", |s: &mut Sample| &mut s.rows)
				.map("map", |s: &mut Sample| &mut s.map)
				.enumeration("color", |s: &mut Sample| &mut s.color)
				.optional_enumeration("favorite", |s: &mut Sample| &mut s.favorite)
				.enumeration_array("colors", |s: &mut Sample| &mut s.colors)
				.field("price", |s: &mut Sample| &mut s.price)
				.field("ratio", |s: &mut Sample| &mut s.ratio)
				.field("born", |s: &mut Sample| &mut s.born)
				.field("avatar", |s: &mut Sample| &mut s.avatar)
				.field("active", |s: &mut Sample| &mut s.active)
				.extends(|s: &mut Sample| &mut s.audited)
				.build()
		});
		&MANIFEST
	}
}
