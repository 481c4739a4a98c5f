//! Single-page form flow
//!
//! A [`SimpleFormHandler`] supplies the views and the submit step; wrapping
//! it in a [`SimpleFormAction`] runs it through the request lifecycle. The
//! form view is shown on GET and whenever a submission has errors; a clean
//! submission runs [`SimpleFormHandler::do_submit`] and moves on to the
//! success view.

use crate::action::{Action, default_action_name};
use crate::context::{ActionContext, REDIRECT_PREFIX};
use crate::lifecycle::{self, ActionForm, FormAction};
use crate::render::Attributes;
use crate::token::{self, DUPLICATE_SUBMISSION_KEY, DUPLICATE_SUBMISSION_MESSAGE};
use crate::{ActionError, Result};
use weft_forms::{ErrorCollector, FormDeclaration};
use weft_http::StatusCode;

pub trait SimpleFormHandler: Send + Sync {
	type Form: ActionForm;

	fn declaration(&self) -> &FormDeclaration<Self::Form>;

	/// View showing the form; a `redirect:` prefix redirects instead
	fn form_view(&self, ctx: &ActionContext<'_>, form: &Self::Form) -> String;

	/// View shown after a successful submission
	fn success_view(&self, ctx: &ActionContext<'_>, form: &Self::Form) -> String;

	/// Perform the submission; errors recorded here re-show the form
	fn do_submit(&self, ctx: &mut ActionContext<'_>, form: &mut Self::Form, errors: &mut ErrorCollector) -> Result<()>;

	fn prepare_success_view(&self, _ctx: &mut ActionContext<'_>, _form: &Self::Form) -> Result<()> {
		Ok(())
	}

	fn reference_data(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> Result<Attributes> {
		Ok(Attributes::new())
	}

	/// Guard submissions with a duplicate-submission token
	fn is_tokenized(&self) -> bool {
		false
	}

	fn meets_privilege_requirements(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> Result<bool> {
		Ok(true)
	}

	fn bind_on_new_form(&self, _ctx: &ActionContext<'_>) -> bool {
		false
	}

	fn is_form_submission(&self, ctx: &ActionContext<'_>, _form: &Self::Form) -> bool {
		ctx.request().is_post()
	}
}

/// Runs a [`SimpleFormHandler`] as an [`Action`]
#[derive(Debug, Clone)]
pub struct SimpleFormAction<H> {
	handler: H,
}

impl<H: SimpleFormHandler> SimpleFormAction<H> {
	pub fn new(handler: H) -> Self {
		Self { handler }
	}

	pub fn handler(&self) -> &H {
		&self.handler
	}
}

impl<H: SimpleFormHandler> Action for SimpleFormAction<H> {
	fn name(&self) -> String {
		default_action_name(std::any::type_name::<H>())
	}

	fn execute(&self, ctx: &mut ActionContext<'_>) {
		lifecycle::run(self, ctx);
	}
}

impl<H: SimpleFormHandler> FormAction for SimpleFormAction<H> {
	type Form = H::Form;

	fn declaration(&self) -> &FormDeclaration<H::Form> {
		self.handler.declaration()
	}

	fn bind_on_new_form(&self, ctx: &ActionContext<'_>) -> bool {
		self.handler.bind_on_new_form(ctx)
	}

	fn meets_privilege_requirements(&self, ctx: &ActionContext<'_>, form: &H::Form) -> Result<bool> {
		self.handler.meets_privilege_requirements(ctx, form)
	}

	fn is_form_submission(&self, ctx: &ActionContext<'_>, form: &H::Form) -> bool {
		self.handler.is_form_submission(ctx, form)
	}

	fn reference_data(&self, ctx: &ActionContext<'_>, form: &H::Form) -> Result<Attributes> {
		self.handler.reference_data(ctx, form)
	}

	fn handle_form_submission(
		&self,
		ctx: &mut ActionContext<'_>,
		form: &mut H::Form,
		errors: &mut ErrorCollector,
	) -> Result<()> {
		let declaration = self.handler.declaration();
		if self.handler.is_tokenized() && !token::is_token_valid(ctx, declaration, form)? {
			errors.put(DUPLICATE_SUBMISSION_KEY, DUPLICATE_SUBMISSION_MESSAGE);
			return self.show_form(ctx, form, errors);
		}

		self.handler.do_submit(ctx, form, errors)?;
		if !errors.is_empty() {
			return self.show_form(ctx, form, errors);
		}

		ctx.set_attribute(declaration.name(), form)?;
		self.handler.prepare_success_view(ctx, form)?;
		let view = self.handler.success_view(ctx, form);
		show_view(ctx, &self.name(), &view)?;
		if self.handler.is_tokenized() {
			token::reset_token(ctx, declaration);
		}
		Ok(())
	}

	fn show_form(&self, ctx: &mut ActionContext<'_>, form: &mut H::Form, errors: &mut ErrorCollector) -> Result<()> {
		if errors.is_empty() {
			if let Some(stashed) = ctx.take_stashed_errors()? {
				errors.extend(&stashed);
			}
		}

		let declaration = self.handler.declaration();
		if self.handler.is_tokenized() {
			token::save_token(ctx, declaration, form)?;
		}
		ctx.set_attribute(declaration.name(), form)?;
		let data = self.reference_data(ctx, form)?;
		for (name, value) in &data {
			ctx.set_attribute_value(name.clone(), value.clone());
		}

		let view = self.handler.form_view(ctx, form);
		if let Some(target) = view.strip_prefix(REDIRECT_PREFIX) {
			return ctx.redirect_with_data(target, &data, errors);
		}

		ctx.dump_messages_to_request()?;
		if errors.is_empty() {
			ctx.render(&view)
		} else {
			ctx.render_with_errors(&view, errors)
		}
	}
}

/// Move on to `view` after a successful submission
///
/// - `redirect:<url>` redirects with 303 after a POST and 302 otherwise
/// - template views render after moving session messages into the request
/// - fragment views render as they are
/// - action URLs are redirected to
///
/// # Errors
///
/// Returns [`ActionError::UnresolvableView`] for any other view.
pub fn show_view(ctx: &mut ActionContext<'_>, action_name: &str, view: &str) -> Result<()> {
	let status = if ctx.request().is_post() {
		StatusCode::SEE_OTHER
	} else {
		StatusCode::FOUND
	};

	if let Some(target) = view.strip_prefix(REDIRECT_PREFIX) {
		ctx.redirect_to(target, status);
		return Ok(());
	}

	let settings = ctx.settings();
	let (template, fragment, action) = (
		settings.is_template(view),
		settings.is_fragment(view),
		settings.is_action(view),
	);
	if template {
		ctx.dump_messages_to_request()?;
		ctx.render(view)
	} else if fragment {
		ctx.render(view)
	} else if action {
		ctx.redirect_to(view, status);
		Ok(())
	} else {
		Err(ActionError::UnresolvableView {
			action: action_name.to_string(),
			view: view.to_string(),
		})
	}
}
