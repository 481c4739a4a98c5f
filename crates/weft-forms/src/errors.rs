//! Per-request error collection
//!
//! [`ErrorCollector`] maps error codes (usually field paths) to messages in
//! insertion order. Validators working on nested objects push path segments
//! so that plain codes such as `zip` land under `address.zip`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use weft_http::ParameterMap;

/// Ordered error codes and messages for one processing pass
///
/// # Examples
///
/// ```
/// use weft_forms::ErrorCollector;
///
/// let mut errors = ErrorCollector::new();
/// errors.push("address");
/// errors.put("zip", "Zip code is required");
/// errors.pop();
///
/// assert_eq!(errors.get("address.zip"), Some("Zip code is required"));
/// assert_eq!(errors.to_string(), "1 error {address.zip=Zip code is required}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCollector {
	errors: IndexMap<String, String>,
	#[serde(skip)]
	nesting: Vec<String>,
}

impl ErrorCollector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Enter a nested path segment
	pub fn push(&mut self, segment: impl Into<String>) {
		self.nesting.push(segment.into());
	}

	/// Leave the innermost nested path segment
	pub fn pop(&mut self) -> Option<String> {
		self.nesting.pop()
	}

	/// Run `f` with every dot-separated segment of `path` pushed
	///
	/// # Examples
	///
	/// ```
	/// use weft_forms::ErrorCollector;
	///
	/// let mut errors = ErrorCollector::new();
	/// errors.scoped("billing.address", |errors| {
	///     errors.put("city", "City is required");
	/// });
	///
	/// assert!(errors.is_set("billing.address.city"));
	/// errors.put("name", "Name is required");
	/// assert!(errors.is_set("name"));
	/// ```
	pub fn scoped<R>(&mut self, path: &str, f: impl FnOnce(&mut Self) -> R) -> R {
		let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
		for segment in &segments {
			self.push(*segment);
		}
		let result = f(self);
		for _ in &segments {
			self.pop();
		}
		result
	}

	fn qualify(&self, code: &str) -> String {
		if self.nesting.is_empty() {
			code.to_string()
		} else {
			let mut path = self.nesting.join(".");
			path.push('.');
			path.push_str(code);
			path
		}
	}

	/// Record an error, replacing any message already stored for the code
	pub fn put(&mut self, code: &str, message: impl Into<String>) {
		let key = self.qualify(code);
		self.errors.insert(key, message.into());
	}

	/// Record an error only when the code has no message yet
	///
	/// Returns whether the message was stored.
	pub fn put_if_absent(&mut self, code: &str, message: impl Into<String>) -> bool {
		let key = self.qualify(code);
		if self.errors.contains_key(&key) {
			return false;
		}
		self.errors.insert(key, message.into());
		true
	}

	pub fn get(&self, code: &str) -> Option<&str> {
		self.errors.get(code).map(String::as_str)
	}

	pub fn remove(&mut self, code: &str) -> Option<String> {
		self.errors.shift_remove(code)
	}

	pub fn is_set(&self, code: &str) -> bool {
		self.errors.contains_key(code)
	}

	/// Whether any of `codes` has an error
	pub fn is_set_any(&self, codes: &[&str]) -> bool {
		codes.iter().any(|code| self.is_set(code))
	}

	pub fn is_not_set(&self, code: &str) -> bool {
		!self.is_set(code)
	}

	/// Whether none of `codes` has an error
	pub fn is_not_set_any(&self, codes: &[&str]) -> bool {
		!self.is_set_any(codes)
	}

	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.errors.keys().map(String::as_str)
	}

	pub fn descriptions(&self) -> impl Iterator<Item = &str> {
		self.errors.values().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.errors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	/// Copy every entry of `other`, overwriting codes already present
	pub fn extend(&mut self, other: &ErrorCollector) {
		for (code, message) in &other.errors {
			self.errors.insert(code.clone(), message.clone());
		}
	}

	/// Entries as `[{"key": .., "value": ..}]`
	///
	/// # Examples
	///
	/// ```
	/// use weft_forms::ErrorCollector;
	/// use serde_json::json;
	///
	/// let mut errors = ErrorCollector::new();
	/// errors.put("email", "Email is invalid");
	/// assert_eq!(errors.to_json(), json!([{"key": "email", "value": "Email is invalid"}]));
	/// ```
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Array(
			self.errors
				.iter()
				.map(|(key, value)| serde_json::json!({ "key": key, "value": value }))
				.collect(),
		)
	}

	/// Return the trimmed parameter, or record `message` under its name when blank
	///
	/// # Examples
	///
	/// ```
	/// use weft_forms::ErrorCollector;
	/// use weft_http::ParameterMap;
	///
	/// let params: ParameterMap = vec![("name", "  Ada "), ("email", " ")].into_iter().collect();
	/// let mut errors = ErrorCollector::new();
	///
	/// assert_eq!(errors.check_required_value(&params, "name", "Name is required"), Some("Ada".to_string()));
	/// assert_eq!(errors.check_required_value(&params, "email", "Email is required"), None);
	/// assert_eq!(errors.get("email"), Some("Email is required"));
	/// ```
	pub fn check_required_value(
		&mut self,
		params: &ParameterMap,
		parameter: &str,
		message: &str,
	) -> Option<String> {
		let value = params.get(parameter).map(str::trim).unwrap_or_default();
		if value.is_empty() {
			self.put(parameter, message);
			None
		} else {
			Some(value.to_string())
		}
	}
}

impl fmt::Display for ErrorCollector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let count = self.errors.len();
		write!(f, "{} error{}", count, if count == 1 { "" } else { "s" })?;
		if count > 0 {
			let entries: Vec<String> = self
				.errors
				.iter()
				.map(|(code, message)| format!("{code}={message}"))
				.collect();
			write!(f, " {{{}}}", entries.join(", "))?;
		}
		Ok(())
	}
}
