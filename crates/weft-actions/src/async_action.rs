//! Form flow for script-driven submissions
//!
//! Every request is treated as a submission and nothing is rendered for the
//! form itself. Binding and validation errors are answered in place as JSON:
//!
//! ```json
//! {"errors": [{"key": "email", "value": "Email is required"}]}
//! ```

use crate::action::{Action, default_action_name};
use crate::context::ActionContext;
use crate::lifecycle::{self, ActionForm, FormAction};
use crate::Result;
use weft_forms::{ErrorCollector, FormDeclaration};
use weft_http::StatusCode;

pub const UNAUTHORIZED_MESSAGE: &str = "You are unauthorized to make that request.";

pub trait AsyncFormHandler: Send + Sync {
	type Form: ActionForm;

	fn declaration(&self) -> &FormDeclaration<Self::Form>;

	/// Handle a submission that bound and validated cleanly
	fn handle_submission(
		&self,
		ctx: &mut ActionContext<'_>,
		form: &mut Self::Form,
		errors: &mut ErrorCollector,
	) -> Result<()>;

	fn meets_privilege_requirements(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> Result<bool> {
		Ok(true)
	}
}

/// Runs an [`AsyncFormHandler`] as an [`Action`]
#[derive(Debug, Clone)]
pub struct AsyncFormAction<H> {
	handler: H,
}

impl<H: AsyncFormHandler> AsyncFormAction<H> {
	pub fn new(handler: H) -> Self {
		Self { handler }
	}

	pub fn handler(&self) -> &H {
		&self.handler
	}
}

impl<H: AsyncFormHandler> Action for AsyncFormAction<H> {
	fn name(&self) -> String {
		default_action_name(std::any::type_name::<H>())
	}

	fn execute(&self, ctx: &mut ActionContext<'_>) {
		lifecycle::run(self, ctx);
	}
}

impl<H: AsyncFormHandler> FormAction for AsyncFormAction<H> {
	type Form = H::Form;

	fn declaration(&self) -> &FormDeclaration<H::Form> {
		self.handler.declaration()
	}

	fn meets_privilege_requirements(&self, ctx: &ActionContext<'_>, form: &H::Form) -> Result<bool> {
		self.handler.meets_privilege_requirements(ctx, form)
	}

	fn handle_unauthorized(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
		ctx.response_mut()
			.write(StatusCode::FORBIDDEN, "text/plain; charset=utf-8", UNAUTHORIZED_MESSAGE);
		Ok(())
	}

	fn is_form_submission(&self, _ctx: &ActionContext<'_>, _form: &H::Form) -> bool {
		true
	}

	fn handle_binding_and_validation_errors(&self, _ctx: &ActionContext<'_>, _form: &H::Form) -> bool {
		true
	}

	fn on_binding_and_validation_errors(
		&self,
		ctx: &mut ActionContext<'_>,
		_form: &mut H::Form,
		errors: &ErrorCollector,
	) -> Result<()> {
		let body = serde_json::json!({ "errors": errors.to_json() });
		ctx.response_mut()
			.write(StatusCode::OK, "application/json", body.to_string());
		Ok(())
	}

	fn handle_form_submission(
		&self,
		ctx: &mut ActionContext<'_>,
		form: &mut H::Form,
		errors: &mut ErrorCollector,
	) -> Result<()> {
		self.handler.handle_submission(ctx, form, errors)
	}

	fn show_form(&self, _ctx: &mut ActionContext<'_>, _form: &mut H::Form, _errors: &mut ErrorCollector) -> Result<()> {
		Ok(())
	}
}
