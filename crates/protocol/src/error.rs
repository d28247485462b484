//! Error codes and the error body shape.

use serde::{Deserialize, Serialize};

/// WebDriver error codes handled by this server.
///
/// Serialized as the literal strings used in the `error` field of an error
/// body, e.g. `"no such window"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
	/// Argument was missing, of the wrong type, or out of range
	#[serde(rename = "invalid argument")]
	InvalidArgument,
	/// Cookie domain does not match the current document
	#[serde(rename = "invalid cookie domain")]
	InvalidCookieDomain,
	/// Session id is unknown or the session has ended
	#[serde(rename = "invalid session id")]
	InvalidSessionId,
	/// No visible cookie carries the requested name
	#[serde(rename = "no such cookie")]
	NoSuchCookie,
	/// Frame index or reference does not resolve
	#[serde(rename = "no such frame")]
	NoSuchFrame,
	/// Top-level or current browsing context is closed
	#[serde(rename = "no such window")]
	NoSuchWindow,
	/// New session could not be created
	#[serde(rename = "session not created")]
	SessionNotCreated,
	/// Cookie was rejected by the cookie store
	#[serde(rename = "unable to set cookie")]
	UnableToSetCookie,
	/// Route does not map to any command
	#[serde(rename = "unknown command")]
	UnknownCommand,
	/// Route exists but not for this HTTP method
	#[serde(rename = "unknown method")]
	UnknownMethod,
	/// Anything else
	#[serde(rename = "unknown error")]
	UnknownError,
	/// Command is understood but not supported here
	#[serde(rename = "unsupported operation")]
	UnsupportedOperation,
}

impl ErrorCode {
	/// Returns the wire literal for this code.
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorCode::InvalidArgument => "invalid argument",
			ErrorCode::InvalidCookieDomain => "invalid cookie domain",
			ErrorCode::InvalidSessionId => "invalid session id",
			ErrorCode::NoSuchCookie => "no such cookie",
			ErrorCode::NoSuchFrame => "no such frame",
			ErrorCode::NoSuchWindow => "no such window",
			ErrorCode::SessionNotCreated => "session not created",
			ErrorCode::UnableToSetCookie => "unable to set cookie",
			ErrorCode::UnknownCommand => "unknown command",
			ErrorCode::UnknownMethod => "unknown method",
			ErrorCode::UnknownError => "unknown error",
			ErrorCode::UnsupportedOperation => "unsupported operation",
		}
	}

	/// HTTP status code paired with this error.
	pub fn http_status(self) -> u16 {
		match self {
			ErrorCode::InvalidArgument | ErrorCode::InvalidCookieDomain => 400,
			ErrorCode::InvalidSessionId
			| ErrorCode::NoSuchCookie
			| ErrorCode::NoSuchFrame
			| ErrorCode::NoSuchWindow
			| ErrorCode::UnknownCommand => 404,
			ErrorCode::UnknownMethod => 405,
			ErrorCode::SessionNotCreated
			| ErrorCode::UnableToSetCookie
			| ErrorCode::UnknownError
			| ErrorCode::UnsupportedOperation => 500,
		}
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error payload nested under `value` in an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Error code literal
	pub error: ErrorCode,
	/// Human-readable description
	pub message: String,
	/// Implementation stack trace, empty when unavailable
	#[serde(default)]
	pub stacktrace: String,
}

impl ErrorBody {
	/// Creates an error body with an empty stack trace.
	pub fn new(error: ErrorCode, message: impl Into<String>) -> Self {
		Self {
			error,
			message: message.into(),
			stacktrace: String::new(),
		}
	}
}

/// Top-level response envelope: every body is `{"value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub value: T,
}

impl<T> Envelope<T> {
	pub fn new(value: T) -> Self {
		Self { value }
	}
}
