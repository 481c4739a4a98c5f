//! Action lifecycle for weft
//!
//! Actions answer requests routed to them by a [`Dispatcher`]. Form-backed
//! actions run through one shared lifecycle driver, [`run`], which binds the
//! request into a typed command object, checks privileges, validates and
//! hands off to success or error handling. The flows built on it are:
//!
//! - [`SimpleFormAction`]: one form page with an optional duplicate-submission token
//! - [`WizardAction`]: a linear run of pages over a session-scoped form
//! - [`AsyncFormAction`]: submissions answered with JSON errors
//! - [`MethodAction`]: plain dispatch on the HTTP method
//!
//! Views are rendered through the [`ViewRenderer`] seam; sessions are loaded
//! from and saved to an injected [`weft_sessions::SessionStore`].

pub mod action;
pub mod async_action;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod method;
pub mod render;
pub mod settings;
pub mod simple;
pub mod token;
pub mod wizard;

pub use action::{Action, default_action_name};
pub use async_action::{AsyncFormAction, AsyncFormHandler};
pub use context::{ActionContext, Dispatch, REDIRECT_PREFIX};
pub use dispatch::{Dispatcher, DispatcherBuilder, Handler, PathPattern};
pub use error::{ActionError, Result};
pub use lifecycle::{ActionForm, FormAction, run};
pub use method::{MethodAction, MethodHandler};
pub use render::{Attributes, JsonViewRenderer, RenderedView, ViewRenderer};
pub use settings::Settings;
pub use simple::{SimpleFormAction, SimpleFormHandler, show_view};
pub use wizard::{Choice, PageFlow, Transition, WizardAction, WizardForm, transition};
