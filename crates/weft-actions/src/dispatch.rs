//! Routing requests to actions
//!
//! A [`Dispatcher`] holds a table of path patterns built once at startup.
//! Patterns follow servlet mapping rules:
//!
//! - `/a/b` matches exactly that path
//! - `/a/*` matches `/a` and everything below it, longest prefix first
//! - `*.act` matches any path with that extension
//! - `/` matches anything no other pattern matched
//!
//! Each route holds a factory; the action is created on first use and shared
//! afterwards. GET and POST are handled the same way.

use crate::action::Action;
use crate::context::ActionContext;
use crate::render::{JsonViewRenderer, ViewRenderer};
use crate::settings::Settings;
use crate::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};
use weft_http::{Request, Response};
use weft_sessions::{InMemorySessionStore, Session, SessionId, SessionStore};

/// Handles an HTTP request and produces a response
#[async_trait]
pub trait Handler: Send + Sync {
	/// # Errors
	///
	/// Returns an error when the session store fails.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// A servlet-style path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
	Exact(String),
	Prefix(String),
	Extension(String),
	Default,
}

impl PathPattern {
	/// # Examples
	///
	/// ```
	/// use weft_actions::PathPattern;
	///
	/// assert_eq!(PathPattern::parse("*.act"), PathPattern::Extension(".act".to_string()));
	/// assert!(PathPattern::parse("/admin/*").matches("/admin/users"));
	/// assert!(!PathPattern::parse("/admin/*").matches("/administrator"));
	/// ```
	pub fn parse(pattern: &str) -> Self {
		if pattern.is_empty() || pattern == "/" || pattern == "/*" {
			PathPattern::Default
		} else if let Some(prefix) = pattern.strip_suffix("/*") {
			PathPattern::Prefix(prefix.to_string())
		} else if let Some(extension) = pattern.strip_prefix("*.") {
			PathPattern::Extension(format!(".{extension}"))
		} else {
			PathPattern::Exact(pattern.to_string())
		}
	}

	pub fn matches(&self, path: &str) -> bool {
		match self {
			PathPattern::Exact(exact) => path == exact,
			PathPattern::Prefix(prefix) => path
				.strip_prefix(prefix.as_str())
				.is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
			PathPattern::Extension(extension) => path.ends_with(extension.as_str()),
			PathPattern::Default => true,
		}
	}

	/// Precedence when several patterns match; higher wins
	fn rank(&self) -> (u8, usize) {
		match self {
			PathPattern::Exact(_) => (3, 0),
			PathPattern::Prefix(prefix) => (2, prefix.len()),
			PathPattern::Extension(_) => (1, 0),
			PathPattern::Default => (0, 0),
		}
	}
}

type ActionFactory = Box<dyn Fn() -> Arc<dyn Action> + Send + Sync>;

struct Route {
	pattern: PathPattern,
	factory: ActionFactory,
	instance: RwLock<Option<Arc<dyn Action>>>,
}

impl Route {
	fn action(&self) -> Arc<dyn Action> {
		if let Some(action) = self.instance.read().as_ref() {
			return Arc::clone(action);
		}
		let mut instance = self.instance.write();
		Arc::clone(instance.get_or_insert_with(|| (self.factory)()))
	}
}

/// Routes requests to actions and manages their sessions
pub struct Dispatcher {
	routes: Vec<Route>,
	store: Arc<dyn SessionStore>,
	settings: Arc<Settings>,
	renderer: Arc<dyn ViewRenderer>,
}

impl Dispatcher {
	pub fn builder() -> DispatcherBuilder {
		DispatcherBuilder::default()
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// The action mapped to `path`, created on first use
	pub fn resolve(&self, path: &str) -> Option<Arc<dyn Action>> {
		let mut best: Option<&Route> = None;
		for route in self.routes.iter().filter(|route| route.pattern.matches(path)) {
			// Earlier registrations win ties
			if best.is_none_or(|current| route.pattern.rank() > current.pattern.rank()) {
				best = Some(route);
			}
		}
		best.map(Route::action)
	}

	async fn load_session(&self, request: &Request) -> Result<(SessionId, Session, bool)> {
		if let Some(id) = request.cookie(&self.settings.session_cookie) {
			let id = id.to_string();
			if let Some(session) = self.store.load(&id).await? {
				return Ok((id, session, false));
			}
			trace!(session_id = %id, "session cookie names an unknown session");
		}
		Ok((self.store.create_session_id(), Session::new(), true))
	}
}

#[async_trait]
impl Handler for Dispatcher {
	async fn handle(&self, request: Request) -> Result<Response> {
		let Some(action) = self.resolve(request.path()) else {
			debug!(path = request.path(), "no action mapped to path");
			return Ok(Response::not_found());
		};

		let (session_id, mut session, created) = self.load_session(&request).await?;
		let mut response = {
			let mut ctx = ActionContext::new(&request, &mut session, &self.settings, self.renderer.as_ref());
			debug!(action = %action.name(), path = request.path(), "executing action");
			action.execute(&mut ctx);
			ctx.into_response()
		};

		if session.is_modified() {
			self.store.save(&session_id, &session).await?;
			session.mark_saved();
			if created {
				let cookie = format!("{}={}; Path=/; HttpOnly", self.settings.session_cookie, session_id);
				response = response.with_header("set-cookie", &cookie);
			}
		}
		Ok(response)
	}
}

/// Builder for [`Dispatcher`]
///
/// # Examples
///
/// ```
/// use weft_actions::{Action, ActionContext, Dispatcher, Handler};
/// use weft_http::{Request, StatusCode};
///
/// struct Ping;
///
/// impl Action for Ping {
///     fn execute(&self, ctx: &mut ActionContext<'_>) {
///         ctx.response_mut().write(StatusCode::OK, "text/plain", "pong");
///     }
/// }
///
/// let dispatcher = Dispatcher::builder().route("/ping", || Ping).build();
///
/// # tokio_test::block_on(async {
/// let request = Request::builder().uri("/ping").build().unwrap();
/// let response = dispatcher.handle(request).await.unwrap();
/// assert_eq!(response.body, "pong");
///
/// let missing = Request::builder().uri("/pong").build().unwrap();
/// assert_eq!(dispatcher.handle(missing).await.unwrap().status, StatusCode::NOT_FOUND);
/// # });
/// ```
#[derive(Default)]
pub struct DispatcherBuilder {
	routes: Vec<Route>,
	store: Option<Arc<dyn SessionStore>>,
	settings: Option<Settings>,
	renderer: Option<Arc<dyn ViewRenderer>>,
}

impl DispatcherBuilder {
	/// Map `pattern` to the action built by `factory`
	pub fn route<A, F>(mut self, pattern: &str, factory: F) -> Self
	where
		A: Action + 'static,
		F: Fn() -> A + Send + Sync + 'static,
	{
		self.routes.push(Route {
			pattern: PathPattern::parse(pattern),
			factory: Box::new(move || Arc::new(factory()) as Arc<dyn Action>),
			instance: RwLock::new(None),
		});
		self
	}

	pub fn session_store(mut self, store: impl SessionStore + 'static) -> Self {
		self.store = Some(Arc::new(store));
		self
	}

	pub fn settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn renderer(mut self, renderer: impl ViewRenderer + 'static) -> Self {
		self.renderer = Some(Arc::new(renderer));
		self
	}

	/// Finish the table, defaulting to an in-memory session store and JSON views
	pub fn build(self) -> Dispatcher {
		Dispatcher {
			routes: self.routes,
			store: self
				.store
				.unwrap_or_else(|| Arc::new(InMemorySessionStore::new())),
			settings: Arc::new(self.settings.unwrap_or_default()),
			renderer: self.renderer.unwrap_or_else(|| Arc::new(JsonViewRenderer)),
		}
	}
}
