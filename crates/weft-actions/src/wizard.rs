//! Multi-page wizard flow
//!
//! A wizard keeps one session-scoped command object across a linear run of
//! pages. Each submission carries a [`Choice`] and the current page number;
//! [`transition`] turns the pair into the next step:
//!
//! | choice | page | step |
//! |---|---|---|
//! | back | 0 | exit the wizard |
//! | back | n | show page n - 1, validation suppressed |
//! | jump | n | show page n |
//! | cancel | any | cancel the wizard |
//! | next | n | execute page n, then show page n + 1 |
//! | finish | any | validate every page, then finish or return to page 0 |

use crate::action::{Action, default_action_name};
use crate::context::{ActionContext, REDIRECT_PREFIX};
use crate::lifecycle::{self, ActionForm, FormAction};
use crate::render::Attributes;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;
use weft_forms::{ErrorCollector, FormBinder, FormDeclaration, FormEnum, hidden_parameters};
use weft_http::{ParameterMap, StatusCode, UrlBuilder};

/// Attribute listing the off-page parameters a page must carry as hidden inputs
pub const FORM_OBJECT_PARAMS_ATTRIBUTE: &str = "_form_object_params";

/// Navigation requested by a wizard submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
	Next,
	Back,
	Jump,
	Cancel,
	Finish,
}

impl FormEnum for Choice {
	fn variants() -> &'static [Self] {
		&[Choice::Next, Choice::Back, Choice::Jump, Choice::Cancel, Choice::Finish]
	}

	fn name(&self) -> &'static str {
		match self {
			Choice::Next => "next",
			Choice::Back => "back",
			Choice::Jump => "jump",
			Choice::Cancel => "cancel",
			Choice::Finish => "finish",
		}
	}
}

/// Page state carried by a wizard's command object
///
/// Forms usually expose these as a `page` field and an optional `choice`
/// enumeration in their manifest so both bind from the request.
pub trait WizardForm {
	fn page(&self) -> usize;

	fn set_page(&mut self, page: usize);

	fn choice(&self) -> Option<Choice>;

	fn set_choice(&mut self, choice: Option<Choice>);
}

/// The step a wizard takes for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	Exit,
	Show(usize),
	Back(usize),
	Cancel,
	Advance { from: usize, to: usize },
	Finish,
}

impl Transition {
	pub fn suppresses_validation(&self) -> bool {
		matches!(self, Transition::Exit | Transition::Back(_))
	}
}

/// The step taken for `choice` submitted from `page`
///
/// # Examples
///
/// ```
/// use weft_actions::wizard::{Choice, Transition, transition};
///
/// assert_eq!(transition(Choice::Back, 0), Transition::Exit);
/// assert_eq!(transition(Choice::Next, 1), Transition::Advance { from: 1, to: 2 });
/// ```
pub fn transition(choice: Choice, page: usize) -> Transition {
	match choice {
		Choice::Back if page == 0 => Transition::Exit,
		Choice::Back => Transition::Back(page - 1),
		Choice::Jump => Transition::Show(page),
		Choice::Cancel => Transition::Cancel,
		Choice::Next => Transition::Advance { from: page, to: page + 1 },
		Choice::Finish => Transition::Finish,
	}
}

/// Pages, views and terminal steps of one wizard
pub trait PageFlow: Send + Sync {
	type Form: ActionForm + WizardForm;

	fn declaration(&self) -> &FormDeclaration<Self::Form>;

	fn page_count(&self) -> usize;

	/// View of `page`; a `redirect:` prefix redirects instead
	fn view(&self, ctx: &ActionContext<'_>, page: usize) -> String;

	fn validate_page(
		&self,
		_ctx: &ActionContext<'_>,
		_form: &Self::Form,
		_errors: &mut ErrorCollector,
		_page: usize,
	) -> Result<()> {
		Ok(())
	}

	/// Work done when leaving `page` forwards
	fn execute_page(&self, _ctx: &mut ActionContext<'_>, _form: &mut Self::Form, _page: usize) -> Result<()> {
		Ok(())
	}

	fn on_bind_page(
		&self,
		_ctx: &mut ActionContext<'_>,
		_form: &mut Self::Form,
		_errors: &mut ErrorCollector,
		_page: usize,
	) -> Result<()> {
		Ok(())
	}

	fn reference_data(&self, _ctx: &ActionContext<'_>, _form: &Self::Form, _page: usize) -> Result<Attributes> {
		Ok(Attributes::new())
	}

	/// Property paths of values entered on other pages that `page` must carry
	fn off_page_parameters(&self, _page: usize) -> Vec<&'static str> {
		Vec::new()
	}

	fn meets_privilege_requirements(&self, _ctx: &ActionContext<'_>, _form: &Self::Form) -> Result<bool> {
		Ok(true)
	}

	/// Back from the first page
	fn exit(&self, ctx: &mut ActionContext<'_>, form: &mut Self::Form) -> Result<()>;

	fn cancel(&self, ctx: &mut ActionContext<'_>, form: &mut Self::Form) -> Result<()>;

	fn finish(&self, ctx: &mut ActionContext<'_>, form: &mut Self::Form) -> Result<()>;
}

/// Runs a [`PageFlow`] as an [`Action`]
///
/// The command object lives in the session while the wizard runs and is
/// removed when the wizard exits, is cancelled or finishes.
#[derive(Debug, Clone)]
pub struct WizardAction<P> {
	flow: P,
}

impl<P: PageFlow> WizardAction<P> {
	pub fn new(flow: P) -> Self {
		Self { flow }
	}

	pub fn flow(&self) -> &P {
		&self.flow
	}

	fn leave(&self, ctx: &mut ActionContext<'_>) {
		ctx.session_mut()
			.remove(&self.flow.declaration().session_attribute_name());
	}

	fn show_page(
		&self,
		ctx: &mut ActionContext<'_>,
		form: &mut P::Form,
		errors: &ErrorCollector,
		page: usize,
	) -> Result<()> {
		if ctx.response().is_committed() {
			return Ok(());
		}
		form.set_page(page);

		ctx.set_attribute(self.flow.declaration().name(), form)?;
		let data = self.flow.reference_data(ctx, form, page)?;
		for (name, value) in &data {
			ctx.set_attribute_value(name.clone(), value.clone());
		}

		let view = self.flow.view(ctx, page);
		if let Some(target) = view.strip_prefix(REDIRECT_PREFIX) {
			return ctx.redirect_with_data(target, &data, errors);
		}

		let off_page = self.flow.off_page_parameters(page);
		let hidden = hidden_parameters(form, off_page.as_slice())?;
		ctx.set_attribute_value(FORM_OBJECT_PARAMS_ATTRIBUTE, parameter_pairs(&hidden));

		if errors.is_empty() {
			ctx.forward_to(&view)
		} else {
			ctx.forward_to_with_errors(&view, errors)
		}
	}
}

fn parameter_pairs(params: &ParameterMap) -> serde_json::Value {
	params
		.iter()
		.flat_map(|(name, values)| {
			values
				.iter()
				.map(move |value| serde_json::json!({ "name": name, "value": value }))
		})
		.collect()
}

impl<P: PageFlow> Action for WizardAction<P> {
	fn name(&self) -> String {
		default_action_name(std::any::type_name::<P>())
	}

	fn execute(&self, ctx: &mut ActionContext<'_>) {
		lifecycle::run(self, ctx);
	}
}

impl<P: PageFlow> FormAction for WizardAction<P> {
	type Form = P::Form;

	fn declaration(&self) -> &FormDeclaration<P::Form> {
		self.flow.declaration()
	}

	/// Start a session-scoped wizard by storing a new form and reloading
	fn redirect_request(&self, ctx: &mut ActionContext<'_>) -> Result<bool> {
		let declaration = self.flow.declaration();
		let key = declaration.session_attribute_name();
		if !declaration.is_session_form() || ctx.session().contains(&key) {
			return Ok(false);
		}

		ctx.session_mut().set_as(key, &P::Form::default())?;
		let location = UrlBuilder::from_request(ctx.request()).to_string();
		ctx.redirect_to(&location, StatusCode::FOUND);
		Ok(true)
	}

	fn bind(&self, ctx: &ActionContext<'_>, form: &mut P::Form, errors: &mut ErrorCollector) {
		// A choice only ever comes from the current request
		form.set_choice(None);
		FormBinder::new(self.flow.declaration().binders()).bind_request(ctx.request(), form, errors);
	}

	fn on_bind(&self, ctx: &mut ActionContext<'_>, form: &mut P::Form, errors: &mut ErrorCollector) -> Result<bool> {
		let page = form.page();
		self.flow.on_bind_page(ctx, form, errors, page)?;
		Ok(false)
	}

	fn meets_privilege_requirements(&self, ctx: &ActionContext<'_>, form: &P::Form) -> Result<bool> {
		self.flow.meets_privilege_requirements(ctx, form)
	}

	fn is_form_submission(&self, _ctx: &ActionContext<'_>, form: &P::Form) -> bool {
		form.choice().is_some()
	}

	fn suppress_validation(&self, _ctx: &ActionContext<'_>, form: &P::Form) -> bool {
		form.choice()
			.is_some_and(|choice| transition(choice, form.page()).suppresses_validation())
	}

	fn validate(&self, ctx: &ActionContext<'_>, form: &P::Form, errors: &mut ErrorCollector) -> Result<()> {
		self.flow.validate_page(ctx, form, errors, form.page())
	}

	fn reference_data(&self, ctx: &ActionContext<'_>, form: &P::Form) -> Result<Attributes> {
		self.flow.reference_data(ctx, form, form.page())
	}

	fn handle_form_submission(
		&self,
		ctx: &mut ActionContext<'_>,
		form: &mut P::Form,
		errors: &mut ErrorCollector,
	) -> Result<()> {
		let Some(choice) = form.choice() else {
			return self.show_form(ctx, form, errors);
		};
		let step = transition(choice, form.page());
		debug!(wizard = %self.name(), ?step, "wizard transition");

		match step {
			Transition::Exit => {
				self.flow.exit(ctx, form)?;
				self.leave(ctx);
				Ok(())
			}
			Transition::Cancel => {
				self.flow.cancel(ctx, form)?;
				self.leave(ctx);
				Ok(())
			}
			Transition::Show(page) | Transition::Back(page) => self.show_page(ctx, form, errors, page),
			Transition::Advance { from, to } => {
				self.flow.execute_page(ctx, form, from)?;
				self.show_page(ctx, form, errors, to)
			}
			Transition::Finish => {
				self.flow.declaration().validate(form, errors);
				for page in 0..self.flow.page_count() {
					self.flow.validate_page(ctx, form, errors, page)?;
				}
				if errors.is_empty() {
					self.flow.finish(ctx, form)?;
					self.leave(ctx);
					Ok(())
				} else {
					self.show_page(ctx, form, errors, 0)
				}
			}
		}
	}

	fn show_form(&self, ctx: &mut ActionContext<'_>, form: &mut P::Form, errors: &mut ErrorCollector) -> Result<()> {
		if errors.is_empty() {
			if let Some(stashed) = ctx.take_stashed_errors()? {
				errors.extend(&stashed);
			}
		}
		let page = form.page();
		self.show_page(ctx, form, errors, page)
	}
}
