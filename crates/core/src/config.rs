//! Session defaults shared by the registry and the cookie converter.

use serde::{Deserialize, Serialize};
use wd_protocol::SameSite;

/// Default `browserName` capability.
pub const DEFAULT_BROWSER_NAME: &str = "wd";
/// Default cap on concurrently open sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 64;

/// Settings applied to every new session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
	/// SameSite reported for cookies stored without the attribute.
	pub same_site: SameSite,
	pub browser_name: String,
	pub max_sessions: usize,
}

impl Default for Defaults {
	fn default() -> Self {
		Self {
			same_site: SameSite::default(),
			browser_name: DEFAULT_BROWSER_NAME.to_string(),
			max_sessions: DEFAULT_MAX_SESSIONS,
		}
	}
}
