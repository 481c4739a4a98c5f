//! Duplicate-submission tokens
//!
//! A tokenized form gets a fresh random token each time it is shown. The
//! token is kept in the session and rendered into the form; a submission is
//! accepted only while both still agree, and the session copy is dropped once
//! the submission succeeds.

use crate::context::ActionContext;
use crate::lifecycle::ActionForm;
use crate::Result;
use rand::Rng;
use rand::distributions::Alphanumeric;
use weft_forms::FormDeclaration;

/// Error key recorded for a rejected duplicate submission
pub const DUPLICATE_SUBMISSION_KEY: &str = "error";

pub const DUPLICATE_SUBMISSION_MESSAGE: &str = "A duplicate form submission was detected";

const TOKEN_LENGTH: usize = 8;

/// Eight random alphanumeric characters
pub fn generate_token() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(TOKEN_LENGTH)
		.map(char::from)
		.collect()
}

/// Issue a new token to `form` and remember it in the session
pub fn save_token<F: ActionForm>(ctx: &mut ActionContext<'_>, declaration: &FormDeclaration<F>, form: &mut F) -> Result<()> {
	let token = generate_token();
	ctx.session_mut().set_as(declaration.token_attribute_name(), &token)?;
	form.set_token(token);
	Ok(())
}

/// Whether the token submitted with `form` is the one last issued
pub fn is_token_valid<F: ActionForm>(ctx: &ActionContext<'_>, declaration: &FormDeclaration<F>, form: &F) -> Result<bool> {
	let issued: Option<String> = ctx.session().get_as(&declaration.token_attribute_name())?;
	Ok(matches!((issued.as_deref(), form.token()), (Some(issued), Some(submitted)) if issued == submitted))
}

pub fn reset_token<F>(ctx: &mut ActionContext<'_>, declaration: &FormDeclaration<F>) {
	ctx.session_mut().remove(&declaration.token_attribute_name());
}
