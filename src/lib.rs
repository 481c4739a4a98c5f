//! # Weft
//!
//! A form-binding and action-lifecycle web framework for Rust.
//!
//! Weft maps flat request parameters onto typed command objects, validates
//! them, and drives each request through a fixed lifecycle of bind,
//! authorize, validate, submit and render. Single-page forms, multi-page
//! wizards and JSON submissions are built on the same lifecycle.
//!
//! ## Feature Flags
//!
//! - `minimal` - the binding engine only (`forms`)
//! - `standard` - everything needed to serve actions
//! - `full` (default) - same as `standard`
//!
//! Individual crates can be enabled with `forms`, `http`, `sessions` and
//! `actions`.
//!
//! ## Quick Example
//!
//! ```rust
//! use weft::prelude::*;
//! use std::sync::LazyLock;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Newsletter {
//!     email: String,
//! }
//!
//! impl FormObject for Newsletter {
//!     fn manifest() -> &'static Manifest<Self> {
//!         static MANIFEST: LazyLock<Manifest<Newsletter>> = LazyLock::new(|| {
//!             Manifest::builder().field("email", |n: &mut Newsletter| &mut n.email).build()
//!         });
//!         &MANIFEST
//!     }
//! }
//!
//! struct Subscribe(FormDeclaration<Newsletter>);
//!
//! impl SimpleFormHandler for Subscribe {
//!     type Form = Newsletter;
//!
//!     fn declaration(&self) -> &FormDeclaration<Newsletter> {
//!         &self.0
//!     }
//!
//!     fn form_view(&self, _: &ActionContext<'_>, _: &Newsletter) -> String {
//!         "/subscribe.html".to_string()
//!     }
//!
//!     fn success_view(&self, _: &ActionContext<'_>, _: &Newsletter) -> String {
//!         "redirect:/thanks.html".to_string()
//!     }
//!
//!     fn do_submit(&self, _: &mut ActionContext<'_>, _: &mut Newsletter, _: &mut ErrorCollector) -> weft::actions::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let dispatcher = Dispatcher::builder()
//!     .route("/subscribe.act", || {
//!         SimpleFormAction::new(Subscribe(FormDeclaration::new("newsletter").validator(
//!             |form: &Newsletter, errors: &mut ErrorCollector| {
//!                 if form.email.is_empty() {
//!                     errors.put("email", "Email is required");
//!                 }
//!             },
//!         )))
//!     })
//!     .build();
//! # let _ = dispatcher;
//! ```

#[cfg(feature = "actions")]
pub use weft_actions as actions;
#[cfg(feature = "forms")]
pub use weft_forms as forms;
#[cfg(feature = "http")]
pub use weft_http as http;
#[cfg(feature = "sessions")]
pub use weft_sessions as sessions;

#[cfg(feature = "actions")]
pub use weft_actions::{
	Action, ActionContext, ActionError, AsyncFormAction, Dispatcher, FormAction, Handler, MethodAction,
	Settings, SimpleFormAction, WizardAction,
};
#[cfg(feature = "forms")]
pub use weft_forms::{ErrorCollector, FormBinder, FormDeclaration, FormObject, Manifest};
#[cfg(feature = "http")]
pub use weft_http::{Request, Response, StatusCode};
#[cfg(feature = "sessions")]
pub use weft_sessions::{InMemorySessionStore, Session, SessionStore};

/// Commonly used types
pub mod prelude {
	pub use serde::{Deserialize, Serialize};

	#[cfg(feature = "forms")]
	pub use weft_forms::{
		BinderRule, ErrorCollector, FormBinder, FormDeclaration, FormEnum, FormObject, Manifest, Validator,
		bind,
	};

	#[cfg(feature = "http")]
	pub use weft_http::{FilePart, Method, ParameterMap, Request, Response, StatusCode, UrlBuilder};

	#[cfg(feature = "sessions")]
	pub use weft_sessions::{InMemorySessionStore, Session, SessionStore};

	#[cfg(feature = "actions")]
	pub use weft_actions::wizard::{Choice, PageFlow, WizardForm};
	#[cfg(feature = "actions")]
	pub use weft_actions::{
		Action, ActionContext, AsyncFormAction, AsyncFormHandler, Attributes, Dispatcher, FormAction, Handler,
		JsonViewRenderer, MethodAction, MethodHandler, Settings, SimpleFormAction, SimpleFormHandler,
		ViewRenderer, WizardAction,
	};
}
