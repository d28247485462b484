//! Internal cookie representation and RFC 6265 matching rules.
//!
//! [`Cookie`] is what the jar stores. It differs from the wire shape in that
//! the domain is kept without a leading dot (with a separate `host_only`
//! flag), the expiry is an absolute instant, and SameSite may be unset.

pub mod date;
pub mod parse;

use time::OffsetDateTime;
use url::{Host, Url};
use wd_protocol::SameSite;

pub use date::parse_cookie_date;
pub use parse::{ParsedCookie, parse_set_cookie};

/// Who is writing to the jar.
///
/// Script writes come through `document.cookie` and are subject to the
/// non-HTTP API restrictions; driver writes come from Add Cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSource {
	Script,
	Driver,
}

/// A stored cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
	pub name: String,
	pub value: String,
	/// Lower-case domain without a leading dot.
	pub domain: String,
	pub path: String,
	/// When true the cookie only matches `domain` exactly.
	pub host_only: bool,
	pub secure: bool,
	pub http_only: bool,
	pub same_site: Option<SameSite>,
	/// Absolute expiry, `None` for session cookies.
	pub expiry: Option<OffsetDateTime>,
	pub(crate) created_at: OffsetDateTime,
	pub(crate) creation_seq: u64,
}

impl Cookie {
	/// Creates a host-only session cookie scoped to `/`.
	pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			domain: domain.into(),
			path: "/".to_string(),
			host_only: true,
			secure: false,
			http_only: false,
			same_site: None,
			expiry: None,
			created_at: OffsetDateTime::UNIX_EPOCH,
			creation_seq: 0,
		}
	}

	/// Sets the path.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();
		self
	}

	/// Marks the cookie as a domain cookie (matches subdomains).
	pub fn with_host_only(mut self, host_only: bool) -> Self {
		self.host_only = host_only;
		self
	}

	pub fn with_secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	pub fn with_http_only(mut self, http_only: bool) -> Self {
		self.http_only = http_only;
		self
	}

	pub fn with_same_site(mut self, same_site: SameSite) -> Self {
		self.same_site = Some(same_site);
		self
	}

	pub fn with_expiry(mut self, expiry: OffsetDateTime) -> Self {
		self.expiry = Some(expiry);
		self
	}

	/// Returns true for cookies that carry an expiry.
	pub fn is_persistent(&self) -> bool {
		self.expiry.is_some()
	}

	/// Returns true when the cookie's expiry is at or before `now`.
	pub fn is_expired(&self, now: OffsetDateTime) -> bool {
		self.expiry.is_some_and(|expiry| expiry <= now)
	}

	/// Creation order tie-breaker, lower is older.
	pub fn creation_seq(&self) -> u64 {
		self.creation_seq
	}

	pub fn created_at(&self) -> OffsetDateTime {
		self.created_at
	}

	/// Storage identity: at most one cookie per (name, domain, path).
	pub fn same_identity(&self, other: &Cookie) -> bool {
		self.name == other.name && self.domain == other.domain && self.path == other.path
	}

	/// Domain-match against a request host (RFC 6265 section 5.1.3).
	pub fn domain_matches(&self, host: &str) -> bool {
		if self.host_only {
			host == self.domain
		} else {
			domain_match(host, &self.domain)
		}
	}

	/// Path-match against a request path (RFC 6265 section 5.1.4).
	pub fn path_matches(&self, request_path: &str) -> bool {
		path_match(request_path, &self.path)
	}

	/// Returns true when the cookie would be sent to `url`.
	pub fn visible_to(&self, url: &Url) -> bool {
		let Some(host) = cookie_host(url) else {
			return false;
		};
		if self.secure && url.scheme() != "https" {
			return false;
		}
		self.domain_matches(&host) && self.path_matches(url.path())
	}
}

/// Returns true when `host` domain-matches `domain`.
pub fn domain_match(host: &str, domain: &str) -> bool {
	if host == domain {
		return true;
	}
	if is_ip_literal(host) {
		return false;
	}
	host.len() > domain.len()
		&& host.ends_with(domain)
		&& host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

/// Returns true when `cookie_path` path-matches `request_path`.
pub fn path_match(request_path: &str, cookie_path: &str) -> bool {
	if request_path == cookie_path {
		return true;
	}
	if !request_path.starts_with(cookie_path) {
		return false;
	}
	cookie_path.ends_with('/') || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/')
}

/// Default path of a URL (RFC 6265 section 5.1.4).
pub fn default_path(url: &Url) -> String {
	let path = url.path();
	if !path.starts_with('/') {
		return "/".to_string();
	}
	match path.rfind('/') {
		Some(0) | None => "/".to_string(),
		Some(idx) => path[..idx].to_string(),
	}
}

/// Documents with these schemes can hold cookies; everything else is
/// cookie-averse (`about:blank`, `data:`, `file:` ...).
pub fn is_cookie_averse(url: &Url) -> bool {
	!matches!(url.scheme(), "http" | "https")
}

/// Lower-case host of a cookie-capable URL.
pub fn cookie_host(url: &Url) -> Option<String> {
	if is_cookie_averse(url) {
		return None;
	}
	url.host_str().map(str::to_ascii_lowercase)
}

fn is_ip_literal(host: &str) -> bool {
	Host::parse(host).is_ok_and(|h| !matches!(h, Host::Domain(_)))
}
