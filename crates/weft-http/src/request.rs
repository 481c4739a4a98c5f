use crate::params::ParameterMap;
use crate::upload::FilePart;
use crate::{HttpError, Result};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};

/// An incoming HTTP request as seen by actions
///
/// Parameters are assembled once at construction time from the query string
/// and, for `application/x-www-form-urlencoded` bodies, from the body.
/// Multipart parts are kept separately and folded by the binder.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub body: Bytes,
	parameters: ParameterMap,
	parts: Vec<FilePart>,
}

impl Request {
	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::{Method, Request};
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/people/edit.act?id=7")
	///     .param("name", "Ada")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/people/edit.act");
	/// assert_eq!(request.parameter("id"), Some("7"));
	/// assert_eq!(request.parameter("name"), Some("Ada"));
	/// assert!(request.is_post());
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Raw query string, if any
	pub fn query_string(&self) -> Option<&str> {
		self.uri.query().filter(|q| !q.is_empty())
	}

	pub fn parameters(&self) -> &ParameterMap {
		&self.parameters
	}

	pub fn parameter(&self, name: &str) -> Option<&str> {
		self.parameters.get(name)
	}

	pub fn parts(&self) -> &[FilePart] {
		&self.parts
	}

	pub fn is_post(&self) -> bool {
		self.method == Method::POST
	}

	pub fn content_type(&self) -> Option<&str> {
		self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
	}

	/// Whether the body was sent as `multipart/*`
	pub fn is_multipart(&self) -> bool {
		self.content_type()
			.map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/"))
			.unwrap_or(false)
	}

	/// Look up a cookie value by name
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/")
	///     .header("cookie", "theme=dark; weft_session=abc123")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.cookie("weft_session"), Some("abc123"));
	/// assert_eq!(request.cookie("missing"), None);
	/// ```
	pub fn cookie(&self, name: &str) -> Option<&str> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(|header| header.split(';'))
			.filter_map(|pair| pair.trim().split_once('='))
			.find(|(key, _)| *key == name)
			.map(|(_, value)| value)
	}
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	headers: Vec<(String, String)>,
	body: Bytes,
	params: ParameterMap,
	parts: Vec<FilePart>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a parameter as if it had been decoded from the request
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.add(name, value);
		self
	}

	/// Attach a multipart part; marks the request as multipart
	pub fn part(mut self, part: FilePart) -> Self {
		self.parts.push(part);
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri_text = self.uri.unwrap_or_else(|| "/".to_string());
		let uri: Uri = uri_text
			.parse()
			.map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri(e.to_string()))?;

		let mut headers = HeaderMap::new();
		for (name, value) in &self.headers {
			let header_name = HeaderName::from_bytes(name.as_bytes())
				.map_err(|e| HttpError::InvalidHeader(e.to_string()))?;
			let header_value =
				HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader(e.to_string()))?;
			headers.append(header_name, header_value);
		}
		if !self.parts.is_empty() && !headers.contains_key(CONTENT_TYPE) {
			headers.insert(
				CONTENT_TYPE,
				HeaderValue::from_static("multipart/form-data; boundary=weft"),
			);
		}

		let mut parameters = match uri.query() {
			Some(query) => ParameterMap::from_urlencoded(query)?,
			None => ParameterMap::new(),
		};
		let is_urlencoded = headers
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
			.unwrap_or(false);
		if is_urlencoded && !self.body.is_empty() {
			let text = std::str::from_utf8(&self.body)
				.map_err(|e| HttpError::InvalidBody(e.to_string()))?;
			parameters.extend_from(&ParameterMap::from_urlencoded(text)?);
		}
		parameters.extend_from(&self.params);

		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			uri,
			headers,
			body: self.body,
			parameters,
			parts: self.parts,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn test_urlencoded_body_is_parsed() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/save.act?page=1")
			.header("content-type", "application/x-www-form-urlencoded")
			.body("name=Ada&tags=a&tags=b")
			.build()
			.unwrap();

		assert_eq!(request.parameter("page"), Some("1"));
		assert_eq!(request.parameter("name"), Some("Ada"));
		assert_eq!(request.parameters().get_all("tags").len(), 2);
	}

	#[test]
	fn test_parts_make_request_multipart() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/upload.act")
			.part(FilePart::field("title", "hello"))
			.build()
			.unwrap();

		assert!(request.is_multipart());
		assert_eq!(request.parts().len(), 1);
	}

	#[rstest]
	#[case("/a?x=1", Some("x=1"))]
	#[case("/a?", None)]
	#[case("/a", None)]
	fn test_query_string(#[case] uri: &str, #[case] expected: Option<&str>) {
		let request = Request::builder().uri(uri).build().unwrap();
		assert_eq!(request.query_string(), expected);
	}

	#[test]
	fn test_invalid_header_is_rejected() {
		let result = Request::builder()
			.uri("/")
			.header("bad header", "x")
			.build();
		assert!(matches!(result, Err(HttpError::InvalidHeader(_))));
	}
}
