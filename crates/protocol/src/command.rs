//! Command parameter and result shapes.
//!
//! Parameters are deserialized from request bodies; results are nested under
//! `value` in the success envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cookie::CookieInput;

/// Parameters of New Session. Capabilities are accepted but only echoed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSessionParams {
	#[serde(default)]
	pub capabilities: Value,
}

/// Result of New Session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResult {
	pub session_id: String,
	pub capabilities: Capabilities,
}

/// Capabilities reported for a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	pub browser_name: String,
	pub browser_version: String,
	pub platform_name: String,
	pub accept_insecure_certs: bool,
	pub set_window_rect: bool,
}

/// Result of Status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult {
	pub ready: bool,
	pub message: String,
}

/// Parameters of Navigate To.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateParams {
	pub url: String,
}

/// Parameters of Switch To Window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchToWindowParams {
	pub handle: String,
}

/// Kind of top-level context requested by New Window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
	#[default]
	Tab,
	Window,
}

/// Parameters of New Window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWindowParams {
	/// Hint only; both kinds create an independent top-level context
	#[serde(rename = "type", default)]
	pub kind: Option<WindowKind>,
}

/// Result of New Window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWindowResult {
	pub handle: String,
	#[serde(rename = "type")]
	pub kind: WindowKind,
}

/// Parameters of Switch To Frame.
///
/// `id` is `null`, a frame index, or an element reference object; the raw
/// value is kept so each case can be reported with its own error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchToFrameParams {
	pub id: Value,
}

/// Parameters of Execute Script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteScriptParams {
	pub script: String,
	pub args: Value,
}

/// Parameters of Add Cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCookieParams {
	pub cookie: CookieInput,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_window_type_is_optional() {
		let params: NewWindowParams = serde_json::from_str("{}").unwrap();
		assert!(params.kind.is_none());
		let params: NewWindowParams = serde_json::from_str(r#"{"type":"window"}"#).unwrap();
		assert_eq!(params.kind, Some(WindowKind::Window));
	}

	#[test]
	fn new_session_result_is_camel_case() {
		let result = NewSessionResult {
			session_id: "abc".into(),
			capabilities: Capabilities {
				browser_name: "wd".into(),
				browser_version: "0.3.0".into(),
				platform_name: "linux".into(),
				accept_insecure_certs: false,
				set_window_rect: false,
			},
		};
		let json = serde_json::to_value(result).unwrap();
		assert_eq!(json["sessionId"], "abc");
		assert_eq!(json["capabilities"]["browserName"], "wd");
	}

	#[test]
	fn add_cookie_requires_cookie_object() {
		assert!(serde_json::from_str::<AddCookieParams>("{}").is_err());
		assert!(serde_json::from_str::<AddCookieParams>(r#"{"cookie":{"name":"a"}}"#).is_err());
	}
}
