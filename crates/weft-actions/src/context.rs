//! Per-request state shared by an action and the lifecycle driver

use crate::render::{Attributes, ViewRenderer};
use crate::settings::Settings;
use crate::{ActionError, Result};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use weft_forms::ErrorCollector;
use weft_http::{Request, Response, StatusCode, UrlBuilder};
use weft_sessions::{ERRORS_KEY, MESSAGES_KEY, Session};

/// Prefix marking a view as a URL to redirect to
pub const REDIRECT_PREFIX: &str = "redirect:";

/// Attribute holding an error collector for the view
pub const ERRORS_ATTRIBUTE: &str = "errors";

/// Attribute holding the message of a server error
pub const MESSAGE_ATTRIBUTE: &str = "message";

/// Attribute holding session messages moved into request scope
pub const MESSAGES_ATTRIBUTE: &str = "message_list";

/// How a view was reached during one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
	Forward(String),
	Include(String),
	Redirect(String),
}

/// Everything an action may read or change while handling one request
///
/// The context owns the response being built and the request attributes
/// passed to views. The session is borrowed from the caller, which loads it
/// before the action runs and saves it afterwards.
pub struct ActionContext<'a> {
	request: &'a Request,
	session: &'a mut Session,
	settings: &'a Settings,
	renderer: &'a dyn ViewRenderer,
	response: Response,
	attributes: Attributes,
	dispatched: Vec<Dispatch>,
}

impl<'a> ActionContext<'a> {
	pub fn new(
		request: &'a Request,
		session: &'a mut Session,
		settings: &'a Settings,
		renderer: &'a dyn ViewRenderer,
	) -> Self {
		Self {
			request,
			session,
			settings,
			renderer,
			response: Response::ok(),
			attributes: Attributes::new(),
			dispatched: Vec::new(),
		}
	}

	pub fn request(&self) -> &Request {
		self.request
	}

	pub fn session(&self) -> &Session {
		self.session
	}

	pub fn session_mut(&mut self) -> &mut Session {
		self.session
	}

	pub fn settings(&self) -> &Settings {
		self.settings
	}

	pub fn response(&self) -> &Response {
		&self.response
	}

	pub fn response_mut(&mut self) -> &mut Response {
		&mut self.response
	}

	pub fn into_response(self) -> Response {
		self.response
	}

	/// Views forwarded to, included or redirected to so far, in order
	pub fn dispatched(&self) -> &[Dispatch] {
		&self.dispatched
	}

	pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
		self.attributes.get(name)
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Set a request attribute from any serializable value
	pub fn set_attribute<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
		let value = serde_json::to_value(value).map_err(|source| ActionError::Attribute {
			name: name.to_string(),
			source,
		})?;
		self.attributes.insert(name.to_string(), value);
		Ok(())
	}

	pub fn set_attribute_value(&mut self, name: impl Into<String>, value: serde_json::Value) {
		self.attributes.insert(name.into(), value);
	}

	pub fn remove_attribute(&mut self, name: &str) -> Option<serde_json::Value> {
		self.attributes.shift_remove(name)
	}

	/// Render `view`, including it when the response is already committed
	pub fn render(&mut self, view: &str) -> Result<()> {
		if self.response.is_committed() {
			self.include(view)
		} else {
			self.forward(view)
		}
	}

	/// Forward to a page
	///
	/// # Errors
	///
	/// Returns [`ActionError::IllegalForward`] when `view` is an action URL;
	/// actions are reached by redirecting.
	pub fn forward_to(&mut self, view: &str) -> Result<()> {
		if self.settings.is_action(view) {
			return Err(ActionError::IllegalForward(view.to_string()));
		}
		self.forward(view)
	}

	/// Render `view` with `errors` attached and the original query string kept
	pub fn render_with_errors(&mut self, view: &str, errors: &ErrorCollector) -> Result<()> {
		let target = self.prepare_error_view(view, errors);
		self.render(&target)
	}

	/// Forward to `view` with `errors` attached and the original query string kept
	pub fn forward_to_with_errors(&mut self, view: &str, errors: &ErrorCollector) -> Result<()> {
		let target = self.prepare_error_view(view, errors);
		self.forward_to(&target)
	}

	fn prepare_error_view(&mut self, view: &str, errors: &ErrorCollector) -> String {
		self.set_attribute_value(ERRORS_ATTRIBUTE, errors.to_json());
		let target = match self.request.query_string().filter(|q| !q.trim().is_empty()) {
			Some(query) if view.contains('?') => format!("{view}&{query}"),
			Some(query) => format!("{view}?{query}"),
			None => view.to_string(),
		};
		info!(view = %target, errors = %errors, "forwarding to page because of errors");
		target
	}

	fn forward(&mut self, view: &str) -> Result<()> {
		debug!(view, "forwarding");
		let rendered = self.renderer.render(view, &self.attributes)?;
		self.response.write(StatusCode::OK, &rendered.content_type, rendered.body);
		self.dispatched.push(Dispatch::Forward(view.to_string()));
		Ok(())
	}

	fn include(&mut self, view: &str) -> Result<()> {
		debug!(view, "including");
		let rendered = self.renderer.render(view, &self.attributes)?;
		let mut body = self.response.body.to_vec();
		body.extend_from_slice(&rendered.body);
		self.response.body = body.into();
		self.dispatched.push(Dispatch::Include(view.to_string()));
		Ok(())
	}

	/// Redirect to `location` unless the response is already committed
	pub fn redirect_to(&mut self, location: &str, status: StatusCode) {
		if self.response.is_committed() {
			warn!(location, "redirect ignored, response is already committed");
			return;
		}
		debug!(location, status = status.as_u16(), "redirecting");
		self.response.send_redirect(location, status);
		self.dispatched.push(Dispatch::Redirect(location.to_string()));
	}

	/// Redirect to `target` carrying `data` as query parameters
	///
	/// `errors` are stashed in the session so the page behind `target` can
	/// show them after the redirect.
	pub fn redirect_with_data(&mut self, target: &str, data: &Attributes, errors: &ErrorCollector) -> Result<()> {
		self.stash_errors(errors)?;
		let mut url = UrlBuilder::new(target);
		for (name, value) in data {
			match value {
				serde_json::Value::Null => {}
				serde_json::Value::String(text) => {
					url.add(name.as_str(), text.as_str());
				}
				serde_json::Value::Array(items) => {
					for item in items {
						url.add(name.as_str(), parameter_text(item));
					}
				}
				other => {
					url.add(name.as_str(), parameter_text(other));
				}
			}
		}
		self.redirect_to(&url.to_string(), StatusCode::FOUND);
		Ok(())
	}

	/// Answer with a generic server error
	///
	/// `message` is logged and exposed to the error view as the `message`
	/// attribute. A committed response is left untouched.
	pub fn raise_server_error(&mut self, message: &str) {
		error!(path = self.request.path(), message, "server error raised");
		self.set_attribute_value(MESSAGE_ATTRIBUTE, serde_json::Value::String(message.to_string()));
		if self.response.is_committed() {
			warn!("attempting to raise server error, but response is already committed");
			return;
		}
		let body = self.settings.server_error_message.clone();
		self.response
			.write(StatusCode::INTERNAL_SERVER_ERROR, "text/plain; charset=utf-8", body);
	}

	/// Queue a message for the next rendered page
	///
	/// Messages are kept in the session in insertion order; adding the same
	/// message twice keeps one copy.
	pub fn add_message(&mut self, message: impl Into<String>) -> Result<()> {
		let message = message.into();
		let mut messages: Vec<String> = self.session.get_as(MESSAGES_KEY)?.unwrap_or_default();
		if !messages.contains(&message) {
			messages.push(message);
		}
		self.session.set_as(MESSAGES_KEY, &messages)?;
		Ok(())
	}

	/// Move queued session messages into the `message_list` attribute
	pub fn dump_messages_to_request(&mut self) -> Result<()> {
		let messages: Vec<String> = self.session.take_as(MESSAGES_KEY)?.unwrap_or_default();
		if !messages.is_empty() {
			self.set_attribute(MESSAGES_ATTRIBUTE, &messages)?;
		}
		Ok(())
	}

	/// Keep `errors` in the session for the request after a redirect
	pub fn stash_errors(&mut self, errors: &ErrorCollector) -> Result<()> {
		if !errors.is_empty() {
			self.session.set_as(ERRORS_KEY, errors)?;
		}
		Ok(())
	}

	/// Take errors stashed by a previous request, removing them from the session
	pub fn take_stashed_errors(&mut self) -> Result<Option<ErrorCollector>> {
		Ok(self.session.take_as(ERRORS_KEY)?)
	}
}

fn parameter_text(value: &serde_json::Value) -> String {
	match value {
		serde_json::Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
