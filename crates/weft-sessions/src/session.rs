use crate::{Result, SessionError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key under which an error collector is handed across a redirect
pub const ERRORS_KEY: &str = "errors";

/// Key under which user-facing messages wait to be displayed
pub const MESSAGES_KEY: &str = "message_list";

/// Session data as JSON values keyed by name
///
/// # Examples
///
/// ```
/// use weft_sessions::Session;
///
/// let mut session = Session::new();
/// session.set_as("visits", &3u32).unwrap();
///
/// let visits: Option<u32> = session.get_as("visits").unwrap();
/// assert_eq!(visits, Some(3));
/// assert!(session.is_modified());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
	data: HashMap<String, serde_json::Value>,
	#[serde(skip)]
	modified: bool,
}

impl Session {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store a raw JSON value
	pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
		self.data.insert(key.into(), value);
		self.modified = true;
	}

	pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
		self.data.get(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.data.contains_key(key)
	}

	/// Remove a value, returning it when present
	///
	/// # Examples
	///
	/// ```
	/// use weft_sessions::Session;
	/// use serde_json::json;
	///
	/// let mut session = Session::new();
	/// session.set("token", json!("abc"));
	/// assert_eq!(session.remove("token"), Some(json!("abc")));
	/// assert_eq!(session.get("token"), None);
	/// ```
	pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
		let removed = self.data.remove(key);
		if removed.is_some() {
			self.modified = true;
		}
		removed
	}

	/// Serialize `value` and store it under `key`
	pub fn set_as<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
		let key = key.into();
		let json = serde_json::to_value(value).map_err(|source| SessionError::Conversion {
			key: key.clone(),
			source,
		})?;
		self.set(key, json);
		Ok(())
	}

	/// Deserialize the value stored under `key`
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
		match self.data.get(key) {
			None => Ok(None),
			Some(value) => serde_json::from_value(value.clone())
				.map(Some)
				.map_err(|source| SessionError::Conversion {
					key: key.to_string(),
					source,
				}),
		}
	}

	/// Deserialize and remove the value stored under `key`
	///
	/// # Examples
	///
	/// ```
	/// use weft_sessions::Session;
	///
	/// let mut session = Session::new();
	/// session.set_as("notice", "saved").unwrap();
	///
	/// let notice: Option<String> = session.take_as("notice").unwrap();
	/// assert_eq!(notice.as_deref(), Some("saved"));
	/// assert!(!session.contains("notice"));
	/// ```
	pub fn take_as<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
		match self.remove(key) {
			None => Ok(None),
			Some(value) => serde_json::from_value(value)
				.map(Some)
				.map_err(|source| SessionError::Conversion {
					key: key.to_string(),
					source,
				}),
		}
	}

	/// Fetch the value under `key`, storing `init()` first when it is missing
	pub fn get_or_insert_with<T, F>(&mut self, key: &str, init: F) -> Result<T>
	where
		T: Serialize + DeserializeOwned,
		F: FnOnce() -> T,
	{
		if let Some(existing) = self.get_as(key)? {
			return Ok(existing);
		}
		let value = init();
		self.set_as(key, &value)?;
		Ok(value)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.data.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn clear(&mut self) {
		if !self.data.is_empty() {
			self.modified = true;
		}
		self.data.clear();
	}

	/// Whether anything was written or removed since loading
	pub fn is_modified(&self) -> bool {
		self.modified
	}

	/// Reset the modification flag after the session has been persisted
	pub fn mark_saved(&mut self) {
		self.modified = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Draft {
		title: String,
		page: usize,
	}

	#[rstest]
	fn test_typed_round_trip() {
		let mut session = Session::new();
		let draft = Draft {
			title: "Intro".into(),
			page: 2,
		};

		session.set_as("draft", &draft).unwrap();

		assert_eq!(session.get_as::<Draft>("draft").unwrap(), Some(draft));
	}

	#[rstest]
	fn test_get_as_wrong_type_is_conversion_error() {
		let mut session = Session::new();
		session.set("draft", json!("not a draft"));

		let result = session.get_as::<Draft>("draft");

		assert!(matches!(result, Err(SessionError::Conversion { ref key, .. }) if key == "draft"));
	}

	#[rstest]
	fn test_get_or_insert_with_creates_once() {
		let mut session = Session::new();

		let first: Vec<String> = session.get_or_insert_with("list", Vec::new).unwrap();
		assert!(first.is_empty());
		session.set_as("list", &vec!["a"]).unwrap();

		let second: Vec<String> = session
			.get_or_insert_with("list", || vec!["ignored".to_string()])
			.unwrap();
		assert_eq!(second, vec!["a".to_string()]);
	}

	#[rstest]
	#[case(json!("text"))]
	#[case(json!(42))]
	#[case(json!(["a", "b"]))]
	#[case(json!({"page": 1}))]
	fn test_take_removes_value(#[case] value: serde_json::Value) {
		let mut session = Session::new();
		session.set("k", value.clone());

		assert_eq!(session.take_as::<serde_json::Value>("k").unwrap(), Some(value));
		assert!(!session.contains("k"));
	}

	#[rstest]
	fn test_remove_missing_does_not_mark_modified() {
		let mut session = Session::new();
		assert_eq!(session.remove("missing"), None);
		assert!(!session.is_modified());
	}

	#[rstest]
	fn test_mark_saved_resets_flag() {
		let mut session = Session::new();
		session.set("k", json!(1));
		session.mark_saved();
		assert!(!session.is_modified());
		assert_eq!(session.len(), 1);
	}
}
