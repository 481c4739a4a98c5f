//! The request lifecycle shared by every form-backed action
//!
//! [`run`] drives one request through the same sequence of steps:
//!
//! 1. an optional redirect short-circuit
//! 2. obtaining the command object, fresh or from the session
//! 3. binding request parameters, unless suppressed
//! 4. the privilege check
//! 5. submission detection, validation and the success or error hand-off
//! 6. showing the form when nothing else answered the request
//!
//! Each step is a hook on [`FormAction`] with a default matching the common
//! case. Errors returned by any hook are logged and answered with a server
//! error; they never escape [`run`].

use crate::context::ActionContext;
use crate::render::Attributes;
use crate::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use weft_forms::{ErrorCollector, FormBinder, FormDeclaration, FormObject};

/// Bounds every command object handled by an action satisfies
///
/// Session-scoped forms are stored as JSON between requests.
pub trait ActionForm: FormObject + Serialize + DeserializeOwned + Default + Send {}

impl<T> ActionForm for T where T: FormObject + Serialize + DeserializeOwned + Default + Send {}

/// Capability hooks consulted by [`run`]
pub trait FormAction: Send + Sync {
	type Form: ActionForm;

	fn declaration(&self) -> &FormDeclaration<Self::Form>;

	/// Issue a redirect instead of processing; return `true` when one was sent
	fn redirect_request(&self, _ctx: &mut ActionContext<'_>) -> Result<bool> {
		Ok(false)
	}

	/// Bind request parameters into a freshly created form before anything else
	fn bind_on_new_form(&self, _ctx: &ActionContext<'_>) -> bool {
		false
	}

	fn on_bind_on_new_form(
		&self,
		_ctx: &mut ActionContext<'_>,
		_form: &mut Self::Form,
		_errors: &ErrorCollector,
	) -> Result<()> {
		Ok(())
	}

	fn suppress_binding(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> bool {
		false
	}

	fn bind(&self, ctx: &ActionContext<'_>, form: &mut Self::Form, errors: &mut ErrorCollector) {
		FormBinder::new(self.declaration().binders()).bind_request(ctx.request(), form, errors);
	}

	/// Runs after binding; return `true` when the request has been answered
	fn on_bind(&self, _ctx: &mut ActionContext<'_>, _form: &mut Self::Form, _errors: &mut ErrorCollector) -> Result<bool> {
		Ok(false)
	}

	fn meets_privilege_requirements(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> Result<bool> {
		Ok(true)
	}

	/// Answer an actor that failed the privilege check
	fn handle_unauthorized(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
		let view = ctx.settings().access_denied_view.clone();
		ctx.forward_to(&view)
	}

	fn is_form_submission(&self, ctx: &ActionContext<'_>, _form: &Self::Form) -> bool {
		ctx.request().is_post()
	}

	fn suppress_validation(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> bool {
		false
	}

	fn validate(&self, _ctx: &ActionContext<'_>, form: &Self::Form, errors: &mut ErrorCollector) -> Result<()> {
		self.declaration().validate(form, errors);
		Ok(())
	}

	fn on_bind_and_validate(
		&self,
		_ctx: &mut ActionContext<'_>,
		_form: &mut Self::Form,
		_errors: &mut ErrorCollector,
	) -> Result<()> {
		Ok(())
	}

	/// Answer binding and validation errors in place instead of re-showing the form
	fn handle_binding_and_validation_errors(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> bool {
		false
	}

	fn on_binding_and_validation_errors(
		&self,
		_ctx: &mut ActionContext<'_>,
		_form: &mut Self::Form,
		_errors: &ErrorCollector,
	) -> Result<()> {
		Ok(())
	}

	/// Extra attributes handed to the form view
	fn reference_data(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> Result<Attributes> {
		Ok(Attributes::new())
	}

	/// Handle a submission that bound and validated cleanly
	fn handle_form_submission(
		&self,
		ctx: &mut ActionContext<'_>,
		form: &mut Self::Form,
		errors: &mut ErrorCollector,
	) -> Result<()>;

	fn show_form(&self, ctx: &mut ActionContext<'_>, form: &mut Self::Form, errors: &mut ErrorCollector) -> Result<()>;
}

/// Process one request with `action`
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use std::sync::LazyLock;
/// use weft_actions::{ActionContext, FormAction, JsonViewRenderer, Result, Settings, run};
/// use weft_forms::{ErrorCollector, FormDeclaration, FormObject, Manifest};
/// use weft_http::{Method, Request};
/// use weft_sessions::Session;
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Search {
///     query: String,
/// }
///
/// impl FormObject for Search {
///     fn manifest() -> &'static Manifest<Self> {
///         static MANIFEST: LazyLock<Manifest<Search>> =
///             LazyLock::new(|| Manifest::builder().field("query", |s: &mut Search| &mut s.query).build());
///         &MANIFEST
///     }
/// }
///
/// struct SearchAction(FormDeclaration<Search>);
///
/// impl FormAction for SearchAction {
///     type Form = Search;
///
///     fn declaration(&self) -> &FormDeclaration<Search> {
///         &self.0
///     }
///
///     fn handle_form_submission(&self, ctx: &mut ActionContext<'_>, form: &mut Search, _: &mut ErrorCollector) -> Result<()> {
///         ctx.set_attribute("query", &form.query)?;
///         ctx.forward_to("/results.html")
///     }
///
///     fn show_form(&self, ctx: &mut ActionContext<'_>, _: &mut Search, _: &mut ErrorCollector) -> Result<()> {
///         ctx.forward_to("/search.html")
///     }
/// }
///
/// let action = SearchAction(FormDeclaration::new("search"));
/// let request = Request::builder().method(Method::POST).uri("/search.act").param("query", "rust").build().unwrap();
/// let mut session = Session::new();
/// let settings = Settings::default();
/// let mut ctx = ActionContext::new(&request, &mut session, &settings, &JsonViewRenderer);
///
/// run(&action, &mut ctx);
/// assert_eq!(ctx.attribute("query"), Some(&serde_json::json!("rust")));
/// ```
pub fn run<A: FormAction + ?Sized>(action: &A, ctx: &mut ActionContext<'_>) {
	if let Err(err) = drive(action, ctx) {
		ctx.raise_server_error(&err.to_string());
	}
}

fn drive<A: FormAction + ?Sized>(action: &A, ctx: &mut ActionContext<'_>) -> Result<()> {
	if action.redirect_request(ctx)? {
		return Ok(());
	}

	let declaration = action.declaration();
	let session_key = declaration.session_attribute_name();
	let mut form = obtain_form(action, ctx, &session_key)?;
	let mut errors = ErrorCollector::new();

	let outcome = process(action, ctx, &mut form, &mut errors);

	// Flows remove the session form when they are done with it
	if declaration.is_session_form() && ctx.session().contains(&session_key) {
		ctx.session_mut().set_as(session_key.as_str(), &form)?;
	}
	outcome
}

fn obtain_form<A: FormAction + ?Sized>(action: &A, ctx: &mut ActionContext<'_>, session_key: &str) -> Result<A::Form> {
	if action.declaration().is_session_form() {
		if let Some(form) = ctx.session().get_as::<A::Form>(session_key)? {
			return Ok(form);
		}
	}

	let mut form = A::Form::default();
	if action.bind_on_new_form(ctx) {
		let mut errors = ErrorCollector::new();
		action.bind(ctx, &mut form, &mut errors);
		if !errors.is_empty() {
			warn!(form = action.declaration().name(), errors = %errors, "errors binding new form object");
		}
		action.on_bind_on_new_form(ctx, &mut form, &errors)?;
	}
	if action.declaration().is_session_form() {
		ctx.session_mut().set_as(session_key, &form)?;
	}
	Ok(form)
}

fn process<A: FormAction + ?Sized>(
	action: &A,
	ctx: &mut ActionContext<'_>,
	form: &mut A::Form,
	errors: &mut ErrorCollector,
) -> Result<()> {
	if !action.suppress_binding(ctx, form) {
		action.bind(ctx, form, errors);
		if action.on_bind(ctx, form, errors)? {
			return Ok(());
		}
	}

	if !action.meets_privilege_requirements(ctx, form)? {
		return action.handle_unauthorized(ctx);
	}

	if action.is_form_submission(ctx, form) {
		if !action.suppress_validation(ctx, form) {
			action.validate(ctx, form, errors)?;
		}
		action.on_bind_and_validate(ctx, form, errors)?;

		if errors.is_empty() {
			action.handle_form_submission(ctx, form, errors)?;
			let declaration = action.declaration();
			if !declaration.is_session_form() {
				ctx.session_mut().remove(&declaration.session_attribute_name());
			}
			return Ok(());
		}
		if action.handle_binding_and_validation_errors(ctx, form) {
			return action.on_binding_and_validation_errors(ctx, form, errors);
		}
	}

	action.show_form(ctx, form, errors)
}
