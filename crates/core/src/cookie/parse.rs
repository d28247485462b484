//! Set-cookie-string parsing (RFC 6265 section 5.2).
//!
//! This is the grammar `document.cookie = "..."` accepts. Parsing never
//! fails on unknown or malformed attributes; they are skipped. Whether the
//! resulting cookie may actually be stored depends on the document it is set
//! from, see [`ParsedCookie::resolve`].

use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use url::Url;
use wd_protocol::SameSite;

use super::{Cookie, cookie_host, date::parse_cookie_date, default_path, domain_match};
use crate::error::{Error, Result};

/// Name, value and attributes of a set-cookie-string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCookie {
	pub name: String,
	pub value: String,
	pub expires: Option<OffsetDateTime>,
	pub max_age: Option<i64>,
	pub domain: Option<String>,
	pub path: Option<String>,
	pub secure: bool,
	pub http_only: bool,
	pub same_site: Option<SameSite>,
}

/// Parses a set-cookie-string.
///
/// Returns `None` for strings the user agent ignores entirely: control
/// characters anywhere, or an empty name together with an empty value.
pub fn parse_set_cookie(input: &str) -> Option<ParsedCookie> {
	if input.chars().any(|c| c != '\t' && c.is_ascii_control()) {
		return None;
	}

	let (pair, attributes) = match input.split_once(';') {
		Some((pair, rest)) => (pair, Some(rest)),
		None => (input, None),
	};

	// rfc6265bis: a pair without '=' is a nameless cookie.
	let (name, value) = match pair.split_once('=') {
		Some((name, value)) => (trim_wsp(name), trim_wsp(value)),
		None => ("", trim_wsp(pair)),
	};
	if name.is_empty() && value.is_empty() {
		return None;
	}

	let mut parsed = ParsedCookie {
		name: name.to_string(),
		value: value.to_string(),
		..Default::default()
	};

	for attribute in attributes.into_iter().flat_map(|rest| rest.split(';')) {
		let (key, val) = match attribute.split_once('=') {
			Some((key, val)) => (trim_wsp(key), trim_wsp(val)),
			None => (trim_wsp(attribute), ""),
		};
		match key.to_ascii_lowercase().as_str() {
			"expires" => {
				if let Some(expires) = parse_cookie_date(val) {
					parsed.expires = Some(expires);
				}
			}
			"max-age" => {
				if let Some(delta) = parse_max_age(val) {
					parsed.max_age = Some(delta);
				}
			}
			"domain" if !val.is_empty() => {
				let domain = val.strip_prefix('.').unwrap_or(val);
				parsed.domain = Some(domain.to_ascii_lowercase());
			}
			"path" => {
				parsed.path = val.starts_with('/').then(|| val.to_string());
			}
			"secure" => parsed.secure = true,
			"httponly" => parsed.http_only = true,
			"samesite" => {
				parsed.same_site = match val.to_ascii_lowercase().as_str() {
					"none" => Some(SameSite::None),
					"lax" => Some(SameSite::Lax),
					"strict" => Some(SameSite::Strict),
					_ => None,
				};
			}
			_ => {}
		}
	}

	Some(parsed)
}

impl ParsedCookie {
	/// Applies the storage-model checks that depend on the setting document
	/// and produces a storable cookie.
	///
	/// `Max-Age` takes precedence over `Expires`.
	pub fn resolve(self, document: &Url, now: OffsetDateTime) -> Result<Cookie> {
		let host = cookie_host(document).ok_or_else(|| {
			Error::UnableToSetCookie(format!("document at {document} cannot hold cookies"))
		})?;

		let (domain, host_only) = match self.domain {
			Some(domain) if domain != host && !domain_match(&host, &domain) => {
				return Err(Error::InvalidCookieDomain { domain, host });
			}
			Some(domain) => (domain, false),
			None => (host, true),
		};

		if self.secure && document.scheme() != "https" {
			return Err(Error::UnableToSetCookie(
				"Secure cookies can only be set from https documents".into(),
			));
		}
		if self.same_site == Some(SameSite::None) && !self.secure {
			return Err(Error::UnableToSetCookie("SameSite=None requires Secure".into()));
		}

		let expiry = match self.max_age {
			Some(delta) if delta <= 0 => Some(OffsetDateTime::UNIX_EPOCH),
			Some(delta) => Some(
				now.checked_add(Duration::seconds(delta))
					.unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc()),
			),
			None => self.expires,
		};

		Ok(Cookie {
			name: self.name,
			value: self.value,
			domain,
			path: self.path.unwrap_or_else(|| default_path(document)),
			host_only,
			secure: self.secure,
			http_only: self.http_only,
			same_site: self.same_site,
			expiry,
			created_at: now,
			creation_seq: 0,
		})
	}
}

fn trim_wsp(s: &str) -> &str {
	s.trim_matches(|c| c == ' ' || c == '\t')
}

fn parse_max_age(val: &str) -> Option<i64> {
	let digits = val.strip_prefix('-').unwrap_or(val);
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	// Out-of-range values saturate instead of being dropped.
	Some(val.parse::<i64>().unwrap_or(if val.starts_with('-') { i64::MIN } else { i64::MAX }))
}
