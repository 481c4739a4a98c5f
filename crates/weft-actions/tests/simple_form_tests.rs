//! Simple form flow tests
//!
//! Form display, validation failures, successful submission, redirects that
//! carry errors through the session, and duplicate-submission tokens.

mod common;

use common::{SignupHandler, execute, forward, get, post};
use rstest::rstest;
use serde_json::json;
use weft_actions::{Action, SimpleFormAction};
use weft_http::StatusCode;
use weft_sessions::{ERRORS_KEY, MESSAGES_KEY, Session};

#[rstest]
fn test_get_shows_form_with_reference_data() {
	let action = SimpleFormAction::new(SignupHandler::new());
	let outcome = execute(&action, &get("/signup.act"), &mut Session::new());

	assert_eq!(outcome.dispatched, [forward("/signup.html")]);
	assert_eq!(outcome.attribute("signup"), &json!({"email": "", "age": null, "token": null}));
	assert_eq!(outcome.attribute("plans"), &json!(["basic", "pro"]));
	assert!(outcome.attributes.get("errors").is_none());
}

#[rstest]
fn test_get_binds_query_parameters() {
	let action = SimpleFormAction::new(SignupHandler::new());
	let outcome = execute(&action, &get("/signup.act?email=ada%40example.com"), &mut Session::new());

	assert_eq!(outcome.attribute("signup")["email"], "ada@example.com");
	assert!(action.handler().submitted().is_empty());
}

#[rstest]
fn test_valid_post_redirects_to_success_view() {
	let action = SimpleFormAction::new(SignupHandler::new());
	let mut session = Session::new();
	let outcome = execute(
		&action,
		&post("/signup.act", &[("email", "ada@example.com"), ("age", "36")]),
		&mut session,
	);

	assert_eq!(action.handler().submitted(), ["ada@example.com"]);
	assert_eq!(outcome.response.status, StatusCode::SEE_OTHER);
	assert_eq!(outcome.response.location(), Some("/welcome.html"));
	assert_eq!(outcome.attribute("signup")["age"], 36);
	assert_eq!(
		session.get_as::<Vec<String>>(MESSAGES_KEY).unwrap(),
		Some(vec!["Welcome aboard".to_string()])
	);
}

#[rstest]
fn test_template_success_view_receives_messages() {
	let action = SimpleFormAction::new(SignupHandler::new().with_success_view("/welcome.html"));
	let mut session = Session::new();
	let outcome = execute(&action, &post("/signup.act", &[("email", "ada@example.com")]), &mut session);

	assert_eq!(outcome.dispatched, [forward("/welcome.html")]);
	assert_eq!(outcome.attribute("message_list"), &json!(["Welcome aboard"]));
	assert!(!session.contains(MESSAGES_KEY));
}

#[rstest]
fn test_invalid_post_reshows_form_with_all_errors() {
	let action = SimpleFormAction::new(SignupHandler::new());
	let outcome = execute(&action, &post("/signup.act", &[("age", "old")]), &mut Session::new());

	assert!(action.handler().submitted().is_empty());
	assert_eq!(outcome.dispatched, [forward("/signup.html")]);
	assert_eq!(
		outcome.attribute("errors"),
		&json!([
			{"key": "age", "value": "'old' is not a valid unsigned integer"},
			{"key": "email", "value": "Email is required"},
		])
	);
}

#[rstest]
fn test_submit_errors_reshow_form() {
	let action = SimpleFormAction::new(SignupHandler::new());
	let outcome = execute(
		&action,
		&post("/signup.act", &[("email", "taken@example.com")]),
		&mut Session::new(),
	);

	assert_eq!(outcome.dispatched, [forward("/signup.html")]);
	assert_eq!(outcome.attribute("errors"), &json!([{"key": "email", "value": "Email is taken"}]));
}

#[rstest]
fn test_redirecting_form_view_carries_errors_to_next_request() {
	let redirecting = SimpleFormAction::new(SignupHandler::new().with_form_view("redirect:/signup/form.act"));
	let mut session = Session::new();
	let outcome = execute(&redirecting, &post("/signup.act", &[("email", "nope")]), &mut session);

	assert_eq!(outcome.response.status, StatusCode::FOUND);
	assert_eq!(
		outcome.response.location(),
		Some("/signup/form.act?plans=basic&plans=pro")
	);
	assert!(session.contains(ERRORS_KEY));

	let plain = SimpleFormAction::new(SignupHandler::new());
	let outcome = execute(&plain, &get("/signup/form.act"), &mut session);

	assert_eq!(outcome.attribute("errors"), &json!([{"key": "email", "value": "Email is invalid"}]));
	assert!(!session.contains(ERRORS_KEY));
}

#[rstest]
fn test_unresolvable_success_view_is_a_server_error() {
	let action = SimpleFormAction::new(SignupHandler::new().with_success_view("/welcome"));
	let outcome = execute(&action, &post("/signup.act", &[("email", "ada@example.com")]), &mut Session::new());

	assert_eq!(outcome.response.status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		outcome.attribute("message"),
		&json!("signupHandler failed to redirect to view [/welcome]")
	);
}

#[rstest]
fn test_token_accepts_one_submission() {
	let action = SimpleFormAction::new(SignupHandler::new().tokenized());
	let mut session = Session::new();

	let shown = execute(&action, &get("/signup.act"), &mut session);
	let token = shown.attribute("signup")["token"].as_str().unwrap().to_string();
	assert_eq!(token.len(), 8);

	let submission = [("email", "ada@example.com"), ("token", token.as_str())];
	let first = execute(&action, &post("/signup.act", &submission), &mut session);
	assert_eq!(first.response.status, StatusCode::SEE_OTHER);

	let second = execute(&action, &post("/signup.act", &submission), &mut session);
	assert_eq!(second.dispatched, [forward("/signup.html")]);
	assert_eq!(
		second.attribute("errors"),
		&json!([{"key": "error", "value": "A duplicate form submission was detected"}])
	);
	assert_eq!(action.handler().submitted(), ["ada@example.com"]);
}

#[rstest]
fn test_token_mismatch_is_rejected() {
	let action = SimpleFormAction::new(SignupHandler::new().tokenized());
	let mut session = Session::new();
	execute(&action, &get("/signup.act"), &mut session);

	let outcome = execute(
		&action,
		&post("/signup.act", &[("email", "ada@example.com"), ("token", "forged00")]),
		&mut session,
	);

	assert!(outcome.attributes.get("errors").is_some());
	assert!(action.handler().submitted().is_empty());
}

#[rstest]
fn test_action_name_comes_from_handler() {
	assert_eq!(SimpleFormAction::new(SignupHandler::new()).name(), "signupHandler");
}
