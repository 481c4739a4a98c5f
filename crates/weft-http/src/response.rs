use crate::{HttpError, Result};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, LOCATION};
use http::{HeaderMap, StatusCode};
use serde::Serialize;

/// HTTP response produced by an action
///
/// A response becomes *committed* once a body, an error status, or a redirect
/// has been sent. Later attempts to send an error are refused so a response is
/// never written twice.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
	committed: bool,
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::{Response, StatusCode};
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// assert!(!response.is_committed());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			committed: false,
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Create a 302 Found redirect
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::{Response, StatusCode};
	///
	/// let response = Response::temporary_redirect("/done.html");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(response.location(), Some("/done.html"));
	/// ```
	pub fn temporary_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a custom header; invalid names or values are ignored
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) {
			if let Ok(header_value) = HeaderValue::from_str(value) {
				self.headers.insert(header_name, header_value);
			}
		}
		self
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(LOCATION, value);
		}
		self
	}

	/// Set the body to JSON and add the matching Content-Type header
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"ok": true})).unwrap();
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| HttpError::Serialization(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	pub fn location(&self) -> Option<&str> {
		self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
	}

	pub fn is_committed(&self) -> bool {
		self.committed
	}

	/// Write a body with the given status and content type, committing the response
	pub fn write(&mut self, status: StatusCode, content_type: &str, body: impl Into<Bytes>) {
		self.status = status;
		if let Ok(value) = HeaderValue::from_str(content_type) {
			self.headers.insert(CONTENT_TYPE, value);
		}
		self.body = body.into();
		self.committed = true;
	}

	/// Send a redirect with the given status
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::{Response, StatusCode};
	///
	/// let mut response = Response::ok();
	/// response.send_redirect("/next.act", StatusCode::SEE_OTHER);
	/// assert_eq!(response.status, StatusCode::SEE_OTHER);
	/// assert_eq!(response.location(), Some("/next.act"));
	/// assert!(response.is_committed());
	/// ```
	pub fn send_redirect(&mut self, location: &str, status: StatusCode) {
		self.status = status;
		self.body = Bytes::new();
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(LOCATION, value);
		}
		self.committed = true;
	}

	/// Send an error status with an empty body
	///
	/// Returns `false` without touching the response when it is already committed.
	pub fn send_error(&mut self, status: StatusCode) -> bool {
		if self.committed {
			return false;
		}
		self.status = status;
		self.body = Bytes::new();
		self.committed = true;
		true
	}
}
