//! Forms, handlers and helpers shared by the integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use weft_actions::wizard::{Choice, PageFlow, WizardForm};
use weft_actions::{
	Action, ActionContext, AsyncFormHandler, Attributes, Dispatch, JsonViewRenderer, Result, Settings,
	SimpleFormHandler,
};
use weft_forms::{ErrorCollector, FormDeclaration, FormObject, Manifest};
use weft_http::{Method, Request, Response, StatusCode};
use weft_sessions::Session;

/// What one action run produced
pub struct Outcome {
	pub response: Response,
	pub attributes: Attributes,
	pub dispatched: Vec<Dispatch>,
}

impl Outcome {
	pub fn attribute(&self, name: &str) -> &serde_json::Value {
		self.attributes.get(name).unwrap_or(&serde_json::Value::Null)
	}

	pub fn json_body(&self) -> serde_json::Value {
		serde_json::from_slice(&self.response.body).unwrap()
	}
}

pub fn execute(action: &dyn Action, request: &Request, session: &mut Session) -> Outcome {
	let settings = Settings::default();
	let mut ctx = ActionContext::new(request, session, &settings, &JsonViewRenderer);
	action.execute(&mut ctx);
	let attributes = ctx.attributes().clone();
	let dispatched = ctx.dispatched().to_vec();
	Outcome {
		response: ctx.into_response(),
		attributes,
		dispatched,
	}
}

pub fn get(uri: &str) -> Request {
	Request::builder().method(Method::GET).uri(uri).build().unwrap()
}

pub fn post(uri: &str, pairs: &[(&str, &str)]) -> Request {
	let mut builder = Request::builder().method(Method::POST).uri(uri);
	for (name, value) in pairs {
		builder = builder.param(*name, *value);
	}
	builder.build().unwrap()
}

pub fn forward(view: &str) -> Dispatch {
	Dispatch::Forward(view.to_string())
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Signup {
	pub email: String,
	pub age: Option<u32>,
	pub token: Option<String>,
}

impl FormObject for Signup {
	fn manifest() -> &'static Manifest<Self> {
		static MANIFEST: LazyLock<Manifest<Signup>> = LazyLock::new(|| {
			Manifest::builder()
				.field("email", |s: &mut Signup| &mut s.email)
				.field("age", |s: &mut Signup| &mut s.age)
				.field("token", |s: &mut Signup| &mut s.token)
				.build()
		});
		&MANIFEST
	}

	fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	fn set_token(&mut self, token: String) {
		self.token = Some(token);
	}
}

fn validate_signup(form: &Signup, errors: &mut ErrorCollector) {
	if form.email.is_empty() {
		errors.put("email", "Email is required");
	} else if !form.email.contains('@') {
		errors.put("email", "Email is invalid");
	}
}

pub struct SignupHandler {
	declaration: FormDeclaration<Signup>,
	pub tokenized: bool,
	pub form_view: &'static str,
	pub success_view: &'static str,
	pub submitted: Mutex<Vec<String>>,
}

impl SignupHandler {
	pub fn new() -> Self {
		Self {
			declaration: FormDeclaration::new("signup").validator(validate_signup),
			tokenized: false,
			form_view: "/signup.html",
			success_view: "redirect:/welcome.html",
			submitted: Mutex::new(Vec::new()),
		}
	}

	pub fn tokenized(mut self) -> Self {
		self.tokenized = true;
		self
	}

	pub fn with_form_view(mut self, view: &'static str) -> Self {
		self.form_view = view;
		self
	}

	pub fn with_success_view(mut self, view: &'static str) -> Self {
		self.success_view = view;
		self
	}

	pub fn submitted(&self) -> Vec<String> {
		self.submitted.lock().clone()
	}
}

impl SimpleFormHandler for SignupHandler {
	type Form = Signup;

	fn declaration(&self) -> &FormDeclaration<Signup> {
		&self.declaration
	}

	fn form_view(&self, _ctx: &ActionContext<'_>, _form: &Signup) -> String {
		self.form_view.to_string()
	}

	fn success_view(&self, _ctx: &ActionContext<'_>, _form: &Signup) -> String {
		self.success_view.to_string()
	}

	fn do_submit(&self, ctx: &mut ActionContext<'_>, form: &mut Signup, errors: &mut ErrorCollector) -> Result<()> {
		if form.email == "taken@example.com" {
			errors.put("email", "Email is taken");
			return Ok(());
		}
		self.submitted.lock().push(form.email.clone());
		ctx.add_message("Welcome aboard")?;
		Ok(())
	}

	fn reference_data(&self, _ctx: &ActionContext<'_>, _form: &Signup) -> Result<Attributes> {
		let mut data = Attributes::new();
		data.insert("plans".to_string(), serde_json::json!(["basic", "pro"]));
		Ok(data)
	}

	fn is_tokenized(&self) -> bool {
		self.tokenized
	}
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Order {
	pub page: usize,
	pub choice: Option<Choice>,
	pub name: String,
	pub street: String,
	pub city: String,
}

impl FormObject for Order {
	fn manifest() -> &'static Manifest<Self> {
		static MANIFEST: LazyLock<Manifest<Order>> = LazyLock::new(|| {
			Manifest::builder()
				.field("page", |o: &mut Order| &mut o.page)
				.optional_enumeration("choice", |o: &mut Order| &mut o.choice)
				.field("name", |o: &mut Order| &mut o.name)
				.field("street", |o: &mut Order| &mut o.street)
				.field("city", |o: &mut Order| &mut o.city)
				.build()
		});
		&MANIFEST
	}
}

impl WizardForm for Order {
	fn page(&self) -> usize {
		self.page
	}

	fn set_page(&mut self, page: usize) {
		self.page = page;
	}

	fn choice(&self) -> Option<Choice> {
		self.choice
	}

	fn set_choice(&mut self, choice: Option<Choice>) {
		self.choice = choice;
	}
}

pub struct OrderFlow {
	declaration: FormDeclaration<Order>,
	pub events: Mutex<Vec<String>>,
	pub post_redirect_get: bool,
}

impl OrderFlow {
	pub fn new() -> Self {
		Self {
			declaration: FormDeclaration::new("order").session_form(true),
			events: Mutex::new(Vec::new()),
			post_redirect_get: false,
		}
	}

	/// Answer every POST with a redirect back to the wizard
	pub fn post_redirect_get(mut self) -> Self {
		self.post_redirect_get = true;
		self
	}

	pub fn events(&self) -> Vec<String> {
		self.events.lock().clone()
	}

	fn record(&self, event: String) {
		self.events.lock().push(event);
	}
}

impl PageFlow for OrderFlow {
	type Form = Order;

	fn declaration(&self) -> &FormDeclaration<Order> {
		&self.declaration
	}

	fn page_count(&self) -> usize {
		3
	}

	fn view(&self, ctx: &ActionContext<'_>, page: usize) -> String {
		if self.post_redirect_get && ctx.request().is_post() {
			return "redirect:/order.act".to_string();
		}
		format!("/order/step{page}.html")
	}

	fn validate_page(&self, _ctx: &ActionContext<'_>, form: &Order, errors: &mut ErrorCollector, page: usize) -> Result<()> {
		match page {
			0 if form.name.is_empty() => errors.put("name", "Name is required"),
			1 if form.street.is_empty() => errors.put("street", "Street is required"),
			_ => {}
		}
		Ok(())
	}

	fn execute_page(&self, _ctx: &mut ActionContext<'_>, _form: &mut Order, page: usize) -> Result<()> {
		self.record(format!("execute {page}"));
		Ok(())
	}

	fn off_page_parameters(&self, page: usize) -> Vec<&'static str> {
		match page {
			0 => vec!["street", "city"],
			1 => vec!["name"],
			_ => Vec::new(),
		}
	}

	fn exit(&self, ctx: &mut ActionContext<'_>, _form: &mut Order) -> Result<()> {
		self.record("exit".to_string());
		ctx.redirect_to("/home.html", StatusCode::FOUND);
		Ok(())
	}

	fn cancel(&self, ctx: &mut ActionContext<'_>, _form: &mut Order) -> Result<()> {
		self.record("cancel".to_string());
		ctx.redirect_to("/cart.html", StatusCode::FOUND);
		Ok(())
	}

	fn finish(&self, ctx: &mut ActionContext<'_>, form: &mut Order) -> Result<()> {
		self.record(format!("finish {}", form.name));
		ctx.forward_to("/order/done.html")
	}
}

pub struct ContactHandler {
	declaration: FormDeclaration<Signup>,
	pub allowed: bool,
}

impl ContactHandler {
	pub fn new() -> Self {
		Self {
			declaration: FormDeclaration::new("contact").validator(validate_signup),
			allowed: true,
		}
	}
}

impl AsyncFormHandler for ContactHandler {
	type Form = Signup;

	fn declaration(&self) -> &FormDeclaration<Signup> {
		&self.declaration
	}

	fn handle_submission(&self, ctx: &mut ActionContext<'_>, form: &mut Signup, _errors: &mut ErrorCollector) -> Result<()> {
		let body = serde_json::json!({ "ok": true, "email": form.email });
		ctx.response_mut()
			.write(StatusCode::OK, "application/json", body.to_string());
		Ok(())
	}

	fn meets_privilege_requirements(&self, _ctx: &ActionContext<'_>, _form: &Signup) -> Result<bool> {
		Ok(self.allowed)
	}
}
