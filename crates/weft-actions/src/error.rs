//! Errors raised while running an action

use thiserror::Error;
use weft_forms::PathError;
use weft_http::HttpError;
use weft_sessions::SessionError;

/// Failures that escape an action's hooks
///
/// Anything that reaches the lifecycle driver is logged and turned into a
/// server error response; nothing here is shown to the user verbatim.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ActionError {
	#[error(transparent)]
	Session(#[from] SessionError),
	#[error(transparent)]
	Http(#[from] HttpError),
	#[error(transparent)]
	Path(#[from] PathError),
	/// A request attribute could not be converted to JSON
	#[error("Attribute '{name}' could not be serialized: {source}")]
	Attribute {
		name: String,
		#[source]
		source: serde_json::Error,
	},
	#[error("Failed to render view '{view}': {reason}")]
	Render { view: String, reason: String },
	#[error("Attempt to forward to {0} is illegal because it is an action. Use redirect instead.")]
	IllegalForward(String),
	#[error("{action} failed to redirect to view [{view}]")]
	UnresolvableView { action: String, view: String },
	#[error("Invalid settings: {0}")]
	Settings(String),
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, ActionError>;
