//! Multipart parts held in memory
//!
//! The container that parses multipart bodies hands each part over as a
//! [`FilePart`]; ordinary form fields carry their text as bytes and are
//! flagged with `form_field`.

use bytes::Bytes;

/// A single multipart part kept entirely in memory
///
/// # Examples
///
/// ```
/// use weft_http::FilePart;
///
/// let avatar = FilePart::file("avatar", "me.png", "image/png", vec![0x89, 0x50]);
/// assert!(!avatar.is_form_field());
/// assert_eq!(avatar.size(), 2);
///
/// let name = FilePart::field("name", "Ada");
/// assert!(name.is_form_field());
/// assert_eq!(name.string(), "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
	field_name: String,
	file_name: Option<String>,
	content_type: Option<String>,
	form_field: bool,
	content: Bytes,
}

impl FilePart {
	/// Create a plain form field part
	pub fn field(field_name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			field_name: field_name.into(),
			file_name: None,
			content_type: None,
			form_field: true,
			content: Bytes::from(value.into()),
		}
	}

	/// Create an uploaded file part
	pub fn file(
		field_name: impl Into<String>,
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		content: impl Into<Bytes>,
	) -> Self {
		Self {
			field_name: field_name.into(),
			file_name: Some(file_name.into()),
			content_type: Some(content_type.into()),
			form_field: false,
			content: content.into(),
		}
	}

	pub fn field_name(&self) -> &str {
		&self.field_name
	}

	pub fn file_name(&self) -> Option<&str> {
		self.file_name.as_deref()
	}

	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	pub fn is_form_field(&self) -> bool {
		self.form_field
	}

	pub fn is_in_memory(&self) -> bool {
		true
	}

	pub fn size(&self) -> usize {
		self.content.len()
	}

	pub fn bytes(&self) -> &Bytes {
		&self.content
	}

	/// Content decoded as UTF-8, replacing invalid sequences
	pub fn string(&self) -> String {
		String::from_utf8_lossy(&self.content).into_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_file_part_keeps_metadata() {
		let part = FilePart::file("doc", "report.pdf", "application/pdf", b"%PDF".to_vec());

		assert_eq!(part.field_name(), "doc");
		assert_eq!(part.file_name(), Some("report.pdf"));
		assert_eq!(part.content_type(), Some("application/pdf"));
		assert_eq!(part.bytes().as_ref(), b"%PDF");
		assert!(part.is_in_memory());
	}

	#[test]
	fn test_invalid_utf8_is_replaced() {
		let part = FilePart::file("blob", "x.bin", "application/octet-stream", vec![0xff, b'a']);
		assert_eq!(part.string(), "\u{fffd}a");
	}
}
