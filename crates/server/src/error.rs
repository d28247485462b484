//! HTTP rendering of command errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wd::protocol::Envelope;

/// A command error on its way out as a WebDriver error response.
#[derive(Debug)]
pub struct ApiError(pub wd::Error);

impl From<wd::Error> for ApiError {
	fn from(err: wd::Error) -> Self {
		Self(err)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let code = self.0.code();
		let status = StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(Envelope::new(self.0.to_body()))).into_response()
	}
}
