//! Action settings
//!
//! Settings are plain serde structs, so they can be built in code or read from
//! TOML. Every field has a default and a settings file only needs to name the
//! values it changes.
//!
//! ```toml
//! access_denied_view = "/denied.html"
//! template_suffixes = [".html", ".jsp"]
//! session_cookie = "sid"
//! ```

use crate::{ActionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// View forwarded to when an actor fails the privilege check
	pub access_denied_view: String,
	/// Suffixes of views rendered by forwarding, with session messages
	pub template_suffixes: Vec<String>,
	/// Suffixes of partial views rendered without session messages
	pub fragment_suffixes: Vec<String>,
	/// Suffix identifying action URLs, which are redirected to and never forwarded to
	pub action_suffix: String,
	pub session_cookie: String,
	/// Body of the response sent when an action fails unexpectedly
	pub server_error_message: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			access_denied_view: "access-denied.html".to_string(),
			template_suffixes: vec![".html".to_string()],
			fragment_suffixes: vec![".part".to_string()],
			action_suffix: ".act".to_string(),
			session_cookie: "weft_session".to_string(),
			server_error_message: "An internal server error occurred".to_string(),
		}
	}
}

impl Settings {
	/// Parse settings from TOML text
	///
	/// # Examples
	///
	/// ```
	/// use weft_actions::Settings;
	///
	/// let settings = Settings::from_toml_str("action_suffix = \".do\"").unwrap();
	/// assert_eq!(settings.action_suffix, ".do");
	/// assert_eq!(settings.session_cookie, "weft_session");
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self> {
		toml::from_str(content).map_err(|e| ActionError::Settings(e.to_string()))
	}

	/// Read settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)
			.map_err(|e| ActionError::Settings(format!("{}: {}", path.display(), e)))?;
		Self::from_toml_str(&content)
	}

	pub fn is_template(&self, view: &str) -> bool {
		has_suffix(view, &self.template_suffixes)
	}

	pub fn is_fragment(&self, view: &str) -> bool {
		has_suffix(view, &self.fragment_suffixes)
	}

	/// Whether `view` names an action rather than a page
	pub fn is_action(&self, view: &str) -> bool {
		view_path(view).ends_with(self.action_suffix.as_str())
	}
}

/// The part of a view reference before any query string
pub(crate) fn view_path(view: &str) -> &str {
	view.split_once('?').map_or(view, |(path, _)| path)
}

fn has_suffix(view: &str, suffixes: &[String]) -> bool {
	let path = view_path(view);
	suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
}
