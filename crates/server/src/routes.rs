//! WebDriver HTTP routes.
//!
//! Every route maps onto one [`Command`]. Request bodies are read as raw
//! bytes and decoded by [`parse_params`] so malformed JSON surfaces as
//! `invalid argument` rather than axum's own rejection.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, Request, State};
use axum::http::request::Parts;
use axum::http::{Method, Uri};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use wd::protocol::Envelope;
use wd::{Command, CommandHandler, parse_params};

use crate::error::ApiError;

type ApiResult = Result<Json<Envelope<Value>>, ApiError>;

#[derive(Clone)]
pub struct AppState {
	handler: Arc<CommandHandler>,
}

/// Builds the router over a shared handler.
pub fn router(handler: Arc<CommandHandler>) -> Router {
	let state = AppState { handler };
	Router::new()
		.route("/status", get(status))
		.route("/session", post(new_session))
		.route("/session/{session_id}", delete(delete_session))
		.route("/session/{session_id}/url", post(navigate_to).get(get_current_url))
		.route(
			"/session/{session_id}/window",
			get(get_window_handle).delete(close_window).post(switch_to_window),
		)
		.route("/session/{session_id}/window/handles", get(get_window_handles))
		.route("/session/{session_id}/window/new", post(new_window))
		.route("/session/{session_id}/frame", post(switch_to_frame))
		.route("/session/{session_id}/frame/parent", post(switch_to_parent_frame))
		.route("/session/{session_id}/execute/sync", post(execute_script))
		.route(
			"/session/{session_id}/cookie",
			get(get_all_cookies).post(add_cookie).delete(delete_all_cookies),
		)
		.route(
			"/session/{session_id}/cookie/{name}",
			get(get_named_cookie).delete(delete_cookie),
		)
		.fallback(unknown_command)
		.method_not_allowed_fallback(unknown_method)
		.layer(middleware::from_fn(log_request))
		.with_state(state)
}

/// Path parameters whose rejections surface as `invalid argument`.
pub struct PathParams<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParams<T>
where
	S: Send + Sync,
	T: DeserializeOwned + Send,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		match Path::<T>::from_request_parts(parts, state).await {
			Ok(Path(value)) => Ok(Self(value)),
			Err(rejection) => Err(ApiError(wd::Error::InvalidArgument(rejection.body_text()))),
		}
	}
}

async fn run(state: &AppState, session_id: Option<&str>, command: Command) -> ApiResult {
	let value = state.handler.dispatch(session_id, command).await?;
	Ok(Json(Envelope::new(value)))
}

async fn status(State(state): State<AppState>) -> ApiResult {
	run(&state, None, Command::Status).await
}

async fn new_session(State(state): State<AppState>, body: Bytes) -> ApiResult {
	let params = parse_params(&body)?;
	run(&state, None, Command::NewSession(params)).await
}

async fn delete_session(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::DeleteSession).await
}

async fn navigate_to(State(state): State<AppState>, PathParams(session_id): PathParams<String>, body: Bytes) -> ApiResult {
	let params = parse_params(&body)?;
	run(&state, Some(&session_id), Command::NavigateTo(params)).await
}

async fn get_current_url(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::GetCurrentUrl).await
}

async fn get_window_handle(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::GetWindowHandle).await
}

async fn close_window(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::CloseWindow).await
}

async fn switch_to_window(
	State(state): State<AppState>,
	PathParams(session_id): PathParams<String>,
	body: Bytes,
) -> ApiResult {
	let params = parse_params(&body)?;
	run(&state, Some(&session_id), Command::SwitchToWindow(params)).await
}

async fn get_window_handles(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::GetWindowHandles).await
}

async fn new_window(State(state): State<AppState>, PathParams(session_id): PathParams<String>, body: Bytes) -> ApiResult {
	let params = parse_params(&body)?;
	run(&state, Some(&session_id), Command::NewWindow(params)).await
}

async fn switch_to_frame(
	State(state): State<AppState>,
	PathParams(session_id): PathParams<String>,
	body: Bytes,
) -> ApiResult {
	let params = parse_params(&body)?;
	run(&state, Some(&session_id), Command::SwitchToFrame(params)).await
}

async fn switch_to_parent_frame(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::SwitchToParentFrame).await
}

async fn execute_script(
	State(state): State<AppState>,
	PathParams(session_id): PathParams<String>,
	body: Bytes,
) -> ApiResult {
	let params = parse_params(&body)?;
	run(&state, Some(&session_id), Command::ExecuteScript(params)).await
}

async fn get_all_cookies(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::GetAllCookies).await
}

async fn get_named_cookie(
	State(state): State<AppState>,
	PathParams((session_id, name)): PathParams<(String, String)>,
) -> ApiResult {
	run(&state, Some(&session_id), Command::GetNamedCookie { name }).await
}

async fn add_cookie(State(state): State<AppState>, PathParams(session_id): PathParams<String>, body: Bytes) -> ApiResult {
	let params = parse_params(&body)?;
	run(&state, Some(&session_id), Command::AddCookie(params)).await
}

async fn delete_cookie(
	State(state): State<AppState>,
	PathParams((session_id, name)): PathParams<(String, String)>,
) -> ApiResult {
	run(&state, Some(&session_id), Command::DeleteCookie { name }).await
}

async fn delete_all_cookies(State(state): State<AppState>, PathParams(session_id): PathParams<String>) -> ApiResult {
	run(&state, Some(&session_id), Command::DeleteAllCookies).await
}

async fn unknown_command(method: Method, uri: Uri) -> ApiError {
	ApiError(wd::Error::UnknownCommand {
		method: method.to_string(),
		path: uri.path().to_string(),
	})
}

async fn unknown_method(method: Method, uri: Uri) -> ApiError {
	ApiError(wd::Error::UnknownMethod {
		method: method.to_string(),
		path: uri.path().to_string(),
	})
}

async fn log_request(request: Request, next: Next) -> Response {
	let method = request.method().clone();
	let path = request.uri().path().to_string();
	let response = next.run(request).await;
	debug!(
		target: "wd.server",
		%method,
		path = %path,
		status = response.status().as_u16(),
		"request"
	);
	response
}
