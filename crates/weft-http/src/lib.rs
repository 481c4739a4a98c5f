//! HTTP plumbing for weft actions
//!
//! This crate provides the narrow request/response surface the binding and
//! action-lifecycle engine consumes:
//!
//! - [`Request`]: method, URI, headers, the raw parameter multimap and any
//!   multipart parts
//! - [`ParameterMap`]: key-sorted multimap of textual request parameters
//! - [`FilePart`]: in-memory multipart part (field name, content type,
//!   form-field flag, bytes)
//! - [`Response`]: status, headers and body, with a committed flag that guards
//!   against writing twice
//! - [`QueryBuilder`] / [`UrlBuilder`]: redirect URLs with sorted, encoded
//!   query parameters

pub mod params;
pub mod query;
pub mod request;
pub mod response;
pub mod upload;

pub use params::ParameterMap;
pub use query::{QueryBuilder, UrlBuilder};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use upload::FilePart;

pub use http::{HeaderMap, Method, StatusCode, Uri};

use thiserror::Error;

/// Errors raised while assembling requests or responses
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HttpError {
	#[error("Invalid URI: {0}")]
	InvalidUri(String),
	#[error("Invalid header: {0}")]
	InvalidHeader(String),
	#[error("Invalid request body: {0}")]
	InvalidBody(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, HttpError>;
