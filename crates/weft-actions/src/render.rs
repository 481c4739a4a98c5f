//! The seam between actions and the view layer

use crate::{ActionError, Result};
use indexmap::IndexMap;

/// Named request-scoped values handed to a view
pub type Attributes = IndexMap<String, serde_json::Value>;

/// Output of rendering one view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
	pub content_type: String,
	pub body: Vec<u8>,
}

/// Turns a view identifier and its attributes into a response body
///
/// Templating is the host application's concern; weft only decides which
/// view runs and what it receives.
pub trait ViewRenderer: Send + Sync {
	fn render(&self, view: &str, attributes: &Attributes) -> Result<RenderedView>;
}

impl<F> ViewRenderer for F
where
	F: Fn(&str, &Attributes) -> Result<RenderedView> + Send + Sync,
{
	fn render(&self, view: &str, attributes: &Attributes) -> Result<RenderedView> {
		self(view, attributes)
	}
}

/// Renders every view as a JSON document of the view name and its attributes
///
/// # Examples
///
/// ```
/// use weft_actions::{Attributes, JsonViewRenderer, ViewRenderer};
///
/// let mut attributes = Attributes::new();
/// attributes.insert("user".to_string(), serde_json::json!("ada"));
///
/// let rendered = JsonViewRenderer.render("/home.html", &attributes).unwrap();
/// let document: serde_json::Value = serde_json::from_slice(&rendered.body).unwrap();
/// assert_eq!(document["view"], "/home.html");
/// assert_eq!(document["attributes"]["user"], "ada");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViewRenderer;

impl ViewRenderer for JsonViewRenderer {
	fn render(&self, view: &str, attributes: &Attributes) -> Result<RenderedView> {
		let document = serde_json::json!({ "view": view, "attributes": attributes });
		let body = serde_json::to_vec(&document).map_err(|e| ActionError::Render {
			view: view.to_string(),
			reason: e.to_string(),
		})?;
		Ok(RenderedView {
			content_type: "application/json".to_string(),
			body,
		})
	}
}
