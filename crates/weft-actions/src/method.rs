//! Actions dispatching on the HTTP method

use crate::action::{Action, default_action_name};
use crate::context::ActionContext;
use crate::Result;
use weft_http::{Method, StatusCode};

/// One handler per HTTP method; unimplemented methods answer 405
pub trait MethodHandler: Send + Sync {
	fn get(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
		method_not_allowed(ctx)
	}

	fn post(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
		method_not_allowed(ctx)
	}

	fn put(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
		method_not_allowed(ctx)
	}

	fn delete(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
		method_not_allowed(ctx)
	}
}

fn method_not_allowed(ctx: &mut ActionContext<'_>) -> Result<()> {
	ctx.response_mut().send_error(StatusCode::METHOD_NOT_ALLOWED);
	Ok(())
}

/// Runs a [`MethodHandler`] as an [`Action`]
#[derive(Debug, Clone)]
pub struct MethodAction<H> {
	handler: H,
}

impl<H: MethodHandler> MethodAction<H> {
	pub fn new(handler: H) -> Self {
		Self { handler }
	}
}

impl<H: MethodHandler> Action for MethodAction<H> {
	fn name(&self) -> String {
		default_action_name(std::any::type_name::<H>())
	}

	fn execute(&self, ctx: &mut ActionContext<'_>) {
		let method = ctx.request().method.clone();
		let outcome = match method {
			Method::GET => self.handler.get(ctx),
			Method::POST => self.handler.post(ctx),
			Method::PUT => self.handler.put(ctx),
			Method::DELETE => self.handler.delete(ctx),
			_ => method_not_allowed(ctx),
		};
		if let Err(err) = outcome {
			ctx.raise_server_error(&err.to_string());
		}
	}
}
