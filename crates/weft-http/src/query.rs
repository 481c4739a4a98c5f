//! Query strings and redirect URLs
//!
//! Parameters are always emitted alphabetically by name, and each name's
//! values in sorted order, so URLs built from the same data compare equal.

use crate::params::ParameterMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use url::form_urlencoded::byte_serialize;

/// Sorted, URL-encoded query string
///
/// # Examples
///
/// ```
/// use weft_http::QueryBuilder;
///
/// let mut query = QueryBuilder::new();
/// query.add("sid", "15");
/// query.add("ru", "a b");
/// assert_eq!(query.to_string(), "ru=a+b&sid=15");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
	// `None` marks a valueless attribute such as `?debug`
	parameters: BTreeMap<String, Option<BTreeSet<String>>>,
}

impl QueryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed from every value of a request parameter map
	pub fn from_parameters(params: &ParameterMap) -> Self {
		let mut builder = Self::new();
		for (key, values) in params.iter() {
			for value in values {
				builder.add(key, value.clone());
			}
		}
		builder
	}

	/// Replace every value of `attribute` with `value`
	pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<String>) -> &mut Self {
		let mut values = BTreeSet::new();
		values.insert(value.into());
		self.parameters.insert(attribute.into(), Some(values));
		self
	}

	/// Mark `attribute` as present without a value
	pub fn set_flag(&mut self, attribute: impl Into<String>) -> &mut Self {
		self.parameters.insert(attribute.into(), None);
		self
	}

	/// Add one more value to `attribute`
	pub fn add(&mut self, attribute: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.parameters
			.entry(attribute.into())
			.or_insert(None)
			.get_or_insert_with(BTreeSet::new)
			.insert(value.into());
		self
	}

	pub fn replace(&mut self, attribute: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.set(attribute, value)
	}

	pub fn remove(&mut self, attribute: &str) -> &mut Self {
		self.parameters.remove(attribute);
		self
	}

	/// The single value of `attribute`; `None` when absent or multi-valued
	pub fn get(&self, attribute: &str) -> Option<&str> {
		match self.parameters.get(attribute) {
			Some(Some(values)) if values.len() == 1 => values.first().map(String::as_str),
			_ => None,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.parameters.is_empty()
	}

	/// Render with a custom delimiter between attributes
	pub fn to_string_with(&self, delimiter: &str) -> String {
		let mut pairs = Vec::new();
		for (key, values) in &self.parameters {
			match values {
				None => pairs.push(key.clone()),
				Some(values) => {
					for value in values {
						let encoded: String = byte_serialize(value.as_bytes()).collect();
						pairs.push(format!("{key}={encoded}"));
					}
				}
			}
		}
		pairs.join(delimiter)
	}

	/// Render for embedding in HTML attributes
	pub fn to_href(&self) -> String {
		self.to_string_with("&amp;")
	}
}

impl fmt::Display for QueryBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_string_with("&"))
	}
}

/// A base path plus a [`QueryBuilder`]
///
/// # Examples
///
/// ```
/// use weft_http::UrlBuilder;
///
/// let mut url = UrlBuilder::new("foo.html");
/// assert_eq!(url.to_string(), "foo.html");
///
/// url.add("color", "blue");
/// url.add("color", "red");
/// assert_eq!(url.to_string(), "foo.html?color=blue&color=red");
/// assert_eq!(url.to_href(), "foo.html?color=blue&amp;color=red");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
	base: String,
	query: QueryBuilder,
}

impl UrlBuilder {
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			base: base.into(),
			query: QueryBuilder::new(),
		}
	}

	/// Rebuild a request's URL from its path and every parameter it carried
	pub fn from_request(request: &crate::Request) -> Self {
		Self {
			base: request.path().to_string(),
			query: QueryBuilder::from_parameters(request.parameters()),
		}
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	pub fn query(&self) -> &QueryBuilder {
		&self.query
	}

	pub fn query_mut(&mut self) -> &mut QueryBuilder {
		&mut self.query
	}

	pub fn add(&mut self, attribute: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.query.add(attribute, value);
		self
	}

	pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.query.set(attribute, value);
		self
	}

	pub fn set_flag(&mut self, attribute: impl Into<String>) -> &mut Self {
		self.query.set_flag(attribute);
		self
	}

	pub fn remove(&mut self, attribute: &str) -> &mut Self {
		self.query.remove(attribute);
		self
	}

	pub fn get(&self, attribute: &str) -> Option<&str> {
		self.query.get(attribute)
	}

	fn render(&self, delimiter: &str) -> String {
		if self.query.is_empty() {
			return self.base.clone();
		}
		let joiner = if self.base.contains('?') { delimiter } else { "?" };
		format!("{}{}{}", self.base, joiner, self.query.to_string_with(delimiter))
	}

	pub fn to_href(&self) -> String {
		self.render("&amp;")
	}

	pub fn to_anchor_link(&self, text: &str) -> String {
		self.to_anchor_link_with_target(text, "_self")
	}

	pub fn to_anchor_link_with_target(&self, text: &str, target: &str) -> String {
		format!("<a href=\"{}\" target=\"{}\">{}</a>", self.to_href(), target, text)
	}
}

impl fmt::Display for UrlBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render("&"))
	}
}
