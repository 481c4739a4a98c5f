//! Raw request parameter multimap

use crate::{HttpError, Result};
use std::collections::BTreeMap;

/// Multi-valued request parameters keyed by name
///
/// Keys iterate in lexical order, so nested paths such as `list[0]` are
/// always visited before `list[0].sub`. Values keep their submission order.
///
/// # Examples
///
/// ```
/// use weft_http::ParameterMap;
///
/// let mut params = ParameterMap::new();
/// params.add("b", "2");
/// params.add("a", "1");
/// params.add("a", "3");
///
/// let keys: Vec<&str> = params.keys().collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// assert_eq!(params.get("a"), Some("1"));
/// assert_eq!(params.get_all("a"), &["1".to_string(), "3".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
	entries: BTreeMap<String, Vec<String>>,
}

impl ParameterMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse an `application/x-www-form-urlencoded` string
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::ParameterMap;
	///
	/// let params = ParameterMap::from_urlencoded("name=Ada+Lovelace&tag=a&tag=b").unwrap();
	/// assert_eq!(params.get("name"), Some("Ada Lovelace"));
	/// assert_eq!(params.get_all("tag").len(), 2);
	/// ```
	pub fn from_urlencoded(input: &str) -> Result<Self> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)
			.map_err(|e| HttpError::InvalidBody(e.to_string()))?;
		Ok(pairs.into_iter().collect())
	}

	/// Append a value to `key`
	pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.entries
			.entry(key.into())
			.or_default()
			.push(value.into());
	}

	/// Merge all values of `other` into this map
	pub fn extend_from(&mut self, other: &ParameterMap) {
		for (key, values) in &other.entries {
			self.entries
				.entry(key.clone())
				.or_default()
				.extend(values.iter().cloned());
		}
	}

	/// First value submitted for `key`
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.get(key)
			.and_then(|values| values.first())
			.map(String::as_str)
	}

	/// Every value submitted for `key`, empty when absent
	pub fn get_all(&self, key: &str) -> &[String] {
		self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.entries
			.iter()
			.map(|(key, values)| (key.as_str(), values.as_slice()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for ParameterMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = ParameterMap::new();
		for (key, value) in iter {
			params.add(key, value);
		}
		params
	}
}
