//! Cookie types as they appear on the wire.
//!
//! [`WireCookie`] is the serialized form returned by the cookie retrieval
//! commands. [`CookieInput`] is the looser shape accepted by Add Cookie, where
//! everything except `name` and `value` may be omitted.

use serde::{Deserialize, Serialize};

/// SameSite cookie attribute.
///
/// Controls when cookies are sent with cross-site requests. The serialized
/// names are case-sensitive: `"lax"` is not a valid value.
///
/// See: https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Set-Cookie/SameSite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SameSite {
	/// Cookie is sent with same-site and cross-site requests
	#[serde(rename = "None")]
	None,
	/// Cookie is sent with same-site requests and cross-site top-level navigations
	#[default]
	#[serde(rename = "Lax")]
	Lax,
	/// Cookie is only sent with same-site requests
	#[serde(rename = "Strict")]
	Strict,
}

impl SameSite {
	/// Returns the wire literal for this value.
	pub fn as_str(self) -> &'static str {
		match self {
			SameSite::None => "None",
			SameSite::Lax => "Lax",
			SameSite::Strict => "Strict",
		}
	}
}

impl std::fmt::Display for SameSite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A cookie as returned by Get All Cookies and Get Named Cookie.
///
/// Every field except `expiry` is always present. Session cookies carry no
/// expiry at all: the key is omitted rather than serialized as `null` or `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCookie {
	/// Cookie name
	pub name: String,

	/// Cookie value
	pub value: String,

	/// Path the cookie is scoped to
	pub path: String,

	/// Domain the cookie belongs to (leading dot for domain cookies)
	pub domain: String,

	/// Whether the cookie requires HTTPS
	pub secure: bool,

	/// Whether the cookie is hidden from `document.cookie`
	pub http_only: bool,

	/// SameSite attribute, always resolved to one of the three literals
	pub same_site: SameSite,

	/// Whole seconds since the Unix epoch, absent for session cookies
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiry: Option<u64>,
}

/// Cookie payload of the Add Cookie command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieInput {
	/// Cookie name
	pub name: String,

	/// Cookie value
	pub value: String,

	/// Path for the cookie (default: "/")
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,

	/// Domain for the cookie (default: host of the current document)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,

	/// Whether the cookie requires HTTPS (default: false)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secure: Option<bool>,

	/// Whether the cookie is HTTP-only (default: false)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub http_only: Option<bool>,

	/// Unix timestamp in whole seconds
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiry: Option<u64>,

	/// SameSite attribute
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub same_site: Option<SameSite>,
}

impl CookieInput {
	/// Creates a new cookie input with required fields.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			path: None,
			domain: None,
			secure: None,
			http_only: None,
			expiry: None,
			same_site: None,
		}
	}

	/// Sets the path for the cookie.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Sets the domain for the cookie.
	pub fn domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = Some(domain.into());
		self
	}

	/// Sets whether the cookie requires HTTPS.
	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = Some(secure);
		self
	}

	/// Sets whether the cookie is HTTP-only.
	pub fn http_only(mut self, http_only: bool) -> Self {
		self.http_only = Some(http_only);
		self
	}

	/// Sets the expiry in seconds since the Unix epoch.
	pub fn expiry(mut self, expiry: u64) -> Self {
		self.expiry = Some(expiry);
		self
	}

	/// Sets the SameSite attribute.
	pub fn same_site(mut self, same_site: SameSite) -> Self {
		self.same_site = Some(same_site);
		self
	}
}
