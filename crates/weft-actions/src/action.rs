//! The action trait

use crate::context::ActionContext;

/// Handles the requests routed to it
///
/// Actions are shared between requests; per-request state lives in the
/// [`ActionContext`]. `execute` never fails: errors are answered inside the
/// action, usually with a server error response.
pub trait Action: Send + Sync {
	fn name(&self) -> String {
		default_action_name(std::any::type_name::<Self>())
	}

	fn execute(&self, ctx: &mut ActionContext<'_>);
}

impl<A: Action + ?Sized> Action for std::sync::Arc<A> {
	fn name(&self) -> String {
		(**self).name()
	}

	fn execute(&self, ctx: &mut ActionContext<'_>) {
		(**self).execute(ctx)
	}
}

/// Name derived from a type path
///
/// The simple type name with a trailing `Action` removed and the first
/// letter lower-cased. Generic arguments are ignored.
///
/// # Examples
///
/// ```
/// use weft_actions::default_action_name;
///
/// assert_eq!(default_action_name("shop::checkout::CheckoutAction"), "checkout");
/// assert_eq!(default_action_name("shop::SignupWizard<shop::Signup>"), "signupWizard");
/// ```
pub fn default_action_name(type_name: &str) -> String {
	let path = type_name.split('<').next().unwrap_or(type_name);
	let simple = path.rsplit("::").next().unwrap_or(path);
	let simple = simple.strip_suffix("Action").unwrap_or(simple);

	let mut chars = simple.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}
