//! Error types for session and cookie commands.

use thiserror::Error;
use wd_protocol::{ErrorBody, ErrorCode};

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a command can end with.
///
/// Every variant is terminal for the request that produced it. Use
/// [`Error::code`] to obtain the wire error code.
#[derive(Debug, Error)]
pub enum Error {
	/// Top-level or current browsing context is closed or was never opened.
	#[error("no such window: {0}")]
	NoSuchWindow(String),

	/// Frame index does not resolve to an open child frame.
	#[error("no such frame: {0}")]
	NoSuchFrame(String),

	/// No cookie with this name is visible to the current document.
	#[error("no cookie named '{name}' is visible to the current document")]
	NoSuchCookie { name: String },

	/// Session id is unknown or the session already ended.
	#[error("invalid session id: {0}")]
	InvalidSessionId(String),

	/// Missing, mistyped or out-of-range command argument.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// Cookie domain does not match the current document.
	#[error("invalid cookie domain: cookie domain '{domain}' does not match document host '{host}'")]
	InvalidCookieDomain { domain: String, host: String },

	/// Cookie store refused the cookie.
	#[error("unable to set cookie: {0}")]
	UnableToSetCookie(String),

	/// New session could not be created.
	#[error("session not created: {0}")]
	SessionNotCreated(String),

	/// Command understood but not supported by this implementation.
	#[error("unsupported operation: {0}")]
	UnsupportedOperation(String),

	/// Route does not map to a command.
	#[error("unknown command: {method} {path}")]
	UnknownCommand { method: String, path: String },

	/// Route exists but not for this HTTP method.
	#[error("unknown method: {method} {path}")]
	UnknownMethod { method: String, path: String },

	/// JSON serialization of a result failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns the wire error code for this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Error::NoSuchWindow(_) => ErrorCode::NoSuchWindow,
			Error::NoSuchFrame(_) => ErrorCode::NoSuchFrame,
			Error::NoSuchCookie { .. } => ErrorCode::NoSuchCookie,
			Error::InvalidSessionId(_) => ErrorCode::InvalidSessionId,
			Error::InvalidArgument(_) => ErrorCode::InvalidArgument,
			Error::InvalidCookieDomain { .. } => ErrorCode::InvalidCookieDomain,
			Error::UnableToSetCookie(_) => ErrorCode::UnableToSetCookie,
			Error::SessionNotCreated(_) => ErrorCode::SessionNotCreated,
			Error::UnsupportedOperation(_) => ErrorCode::UnsupportedOperation,
			Error::UnknownCommand { .. } => ErrorCode::UnknownCommand,
			Error::UnknownMethod { .. } => ErrorCode::UnknownMethod,
			Error::Json(_) => ErrorCode::UnknownError,
		}
	}

	/// Returns true if the error stems from a closed or missing browsing context.
	pub fn is_no_such_window(&self) -> bool {
		matches!(self, Error::NoSuchWindow(_))
	}

	/// Converts this error to the body sent under `value`.
	pub fn to_body(&self) -> ErrorBody {
		ErrorBody::new(self.code(), self.to_string())
	}
}

/// Maps a parameter decoding failure to [`Error::InvalidArgument`].
pub(crate) fn invalid_argument(err: serde_json::Error) -> Error {
	Error::InvalidArgument(err.to_string())
}
