//! Sessions for weft actions
//!
//! A [`Session`] is a plain key-value map of JSON values with typed
//! accessors. It is loaded from a [`SessionStore`] before an action runs and
//! written back afterwards; actions only ever see the loaded map.

pub mod session;
pub mod store;

pub use session::{ERRORS_KEY, MESSAGES_KEY, Session};
pub use store::{InMemorySessionStore, SessionId, SessionStore};

use thiserror::Error;

/// Errors raised by session access
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SessionError {
	/// A stored value could not be converted to or from the requested type
	#[error("Session value at '{key}' could not be converted: {source}")]
	Conversion {
		key: String,
		#[source]
		source: serde_json::Error,
	},
	/// The backing store failed
	#[error("Session store error: {0}")]
	Store(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
