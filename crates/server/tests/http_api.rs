// HTTP API tests
//
// Drive the axum router in-process with tower's `oneshot`; no socket is
// bound.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wd::{CommandHandler, Defaults};
use wd_server::router;

fn app() -> Router {
	router(Arc::new(CommandHandler::new(Defaults::default())))
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
	let request = Request::builder()
		.method(method)
		.uri(uri)
		.header("content-type", "application/json")
		.body(body)
		.unwrap();
	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
	let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
	(status, value)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	let body = match body {
		Some(json) => Body::from(json.to_string()),
		None => Body::empty(),
	};
	send_raw(app, method, uri, body).await
}

async fn new_session(app: &Router, url: &str) -> String {
	let (status, body) = send(app, "POST", "/session", Some(json!({ "capabilities": {} }))).await;
	assert_eq!(status, StatusCode::OK);
	let id = body["value"]["sessionId"].as_str().unwrap().to_string();
	let (status, _) = send(app, "POST", &format!("/session/{id}/url"), Some(json!({ "url": url }))).await;
	assert_eq!(status, StatusCode::OK);
	id
}

fn assert_error(status: StatusCode, body: &Value, expected_status: StatusCode, code: &str) {
	assert_eq!(status, expected_status, "body: {body}");
	assert_eq!(body["value"]["error"], code);
	assert!(body["value"]["message"].is_string());
	assert!(body["value"]["stacktrace"].is_string());
}

#[tokio::test]
async fn status_is_ready() {
	let app = app();
	let (status, body) = send(&app, "GET", "/status", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["value"]["ready"], true);
}

#[tokio::test]
async fn new_session_reports_capabilities() {
	let app = app();
	let (status, body) = send(&app, "POST", "/session", None).await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["value"]["sessionId"].is_string());
	assert_eq!(body["value"]["capabilities"]["browserName"], "wd");
}

#[tokio::test]
async fn get_named_cookie_over_http() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/common/blank.html").await;
	let (status, _) = send(
		&app,
		"POST",
		&format!("/session/{id}/execute/sync"),
		Some(json!({ "script": "document.cookie = 'foo=bar'", "args": [] })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = send(&app, "GET", &format!("/session/{id}/cookie/foo"), None).await;
	assert_eq!(status, StatusCode::OK);
	let cookie = &body["value"];
	assert_eq!(cookie["name"], "foo");
	assert_eq!(cookie["value"], "bar");
	assert_eq!(cookie["path"], "/common");
	assert_eq!(cookie["domain"], "web-platform.test");
	assert_eq!(cookie["secure"], false);
	assert_eq!(cookie["httpOnly"], false);
	assert_eq!(cookie["sameSite"], "Lax");
	assert!(cookie.get("expiry").is_none());
}

#[tokio::test]
async fn add_cookie_then_list() {
	let app = app();
	let id = new_session(&app, "https://web-platform.test/").await;
	let (status, body) = send(
		&app,
		"POST",
		&format!("/session/{id}/cookie"),
		Some(json!({ "cookie": { "name": "a", "value": "1", "secure": true, "sameSite": "None", "expiry": 4102444800u64 } })),
	)
	.await;
	assert_eq!(status, StatusCode::OK, "{body}");
	assert_eq!(body["value"], Value::Null);

	let (status, body) = send(&app, "GET", &format!("/session/{id}/cookie"), None).await;
	assert_eq!(status, StatusCode::OK);
	let cookies = body["value"].as_array().unwrap();
	assert_eq!(cookies.len(), 1);
	assert_eq!(cookies[0]["sameSite"], "None");
	assert_eq!(cookies[0]["expiry"], 4102444800u64);

	let (status, _) = send(&app, "DELETE", &format!("/session/{id}/cookie/a"), None).await;
	assert_eq!(status, StatusCode::OK);
	let (status, body) = send(&app, "GET", &format!("/session/{id}/cookie/a"), None).await;
	assert_error(status, &body, StatusCode::NOT_FOUND, "no such cookie");
}

#[tokio::test]
async fn add_cookie_for_foreign_domain() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, body) = send(
		&app,
		"POST",
		&format!("/session/{id}/cookie"),
		Some(json!({ "cookie": { "name": "a", "value": "1", "domain": "example.org" } })),
	)
	.await;
	assert_error(status, &body, StatusCode::BAD_REQUEST, "invalid cookie domain");
}

#[tokio::test]
async fn missing_cookie_is_404() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, body) = send(&app, "GET", &format!("/session/{id}/cookie/nope"), None).await;
	assert_error(status, &body, StatusCode::NOT_FOUND, "no such cookie");
}

#[tokio::test]
async fn undecodable_path_parameter_is_invalid_argument() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, body) = send(&app, "GET", &format!("/session/{id}/cookie/%FF"), None).await;
	assert_error(status, &body, StatusCode::BAD_REQUEST, "invalid argument");

	let (status, body) = send(&app, "DELETE", "/session/%FF", None).await;
	assert_error(status, &body, StatusCode::BAD_REQUEST, "invalid argument");
}

#[tokio::test]
async fn percent_encoded_cookie_name_is_decoded() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, _) = send(
		&app,
		"POST",
		&format!("/session/{id}/cookie"),
		Some(json!({ "cookie": { "name": "a b", "value": "1" } })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = send(&app, "GET", &format!("/session/{id}/cookie/a%20b"), None).await;
	assert_eq!(status, StatusCode::OK, "{body}");
	assert_eq!(body["value"]["name"], "a b");
}

#[tokio::test]
async fn unknown_session_is_invalid_session_id() {
	let app = app();
	let (status, body) = send(&app, "GET", "/session/does-not-exist/cookie/foo", None).await;
	assert_error(status, &body, StatusCode::NOT_FOUND, "invalid session id");
}

#[tokio::test]
async fn closed_window_is_no_such_window() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, _) = send(&app, "POST", &format!("/session/{id}/window/new"), Some(json!({}))).await;
	assert_eq!(status, StatusCode::OK);
	let (status, body) = send(&app, "DELETE", &format!("/session/{id}/window"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["value"].as_array().unwrap().len(), 1);

	let (status, body) = send(&app, "GET", &format!("/session/{id}/cookie/foo"), None).await;
	assert_error(status, &body, StatusCode::NOT_FOUND, "no such window");
}

#[tokio::test]
async fn frame_switching_errors() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let uri = format!("/session/{id}/frame");

	let (status, body) = send(&app, "POST", &uri, Some(json!({ "id": 3 }))).await;
	assert_error(status, &body, StatusCode::NOT_FOUND, "no such frame");

	let (status, body) = send(&app, "POST", &uri, Some(json!({ "id": "x" }))).await;
	assert_error(status, &body, StatusCode::BAD_REQUEST, "invalid argument");

	let (status, _) = send(&app, "POST", &uri, Some(json!({ "id": null }))).await;
	assert_eq!(status, StatusCode::OK);
	let (status, _) = send(&app, "POST", &format!("/session/{id}/frame/parent"), Some(json!({}))).await;
	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_invalid_argument() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, body) = send_raw(&app, "POST", &format!("/session/{id}/url"), Body::from("{nope")).await;
	assert_error(status, &body, StatusCode::BAD_REQUEST, "invalid argument");
}

#[tokio::test]
async fn unsupported_script() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, body) = send(
		&app,
		"POST",
		&format!("/session/{id}/execute/sync"),
		Some(json!({ "script": "return 1 + 1", "args": [] })),
	)
	.await;
	assert_error(status, &body, StatusCode::INTERNAL_SERVER_ERROR, "unsupported operation");
}

#[tokio::test]
async fn unknown_route_and_method() {
	let app = app();
	let (status, body) = send(&app, "GET", "/nowhere", None).await;
	assert_error(status, &body, StatusCode::NOT_FOUND, "unknown command");

	let (status, body) = send(&app, "PUT", "/status", None).await;
	assert_error(status, &body, StatusCode::METHOD_NOT_ALLOWED, "unknown method");
}

#[tokio::test]
async fn delete_session_ends_it() {
	let app = app();
	let id = new_session(&app, "http://web-platform.test/").await;
	let (status, _) = send(&app, "DELETE", &format!("/session/{id}"), None).await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = send(&app, "GET", &format!("/session/{id}/url"), None).await;
	assert_error(status, &body, StatusCode::NOT_FOUND, "invalid session id");
}
