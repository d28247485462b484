//! Conversion between stored cookies and their wire form.

use time::OffsetDateTime;
use url::Url;
use wd_protocol::{CookieInput, SameSite, WireCookie};

use crate::cookie::{Cookie, cookie_host, domain_match};
use crate::error::{Error, Result};

/// Largest expiry Add Cookie accepts: the maximum safe JavaScript integer.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Renders stored cookies for the wire and validates cookies coming from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieConverter {
	default_same_site: SameSite,
}

impl CookieConverter {
	/// Creates a converter that reports `default_same_site` for cookies
	/// stored without a SameSite attribute.
	pub fn new(default_same_site: SameSite) -> Self {
		Self { default_same_site }
	}

	pub fn default_same_site(&self) -> SameSite {
		self.default_same_site
	}

	/// Builds the wire form of a stored cookie.
	///
	/// Domain cookies get a leading dot. The expiry is floored to whole
	/// seconds and omitted for session cookies.
	pub fn to_wire(&self, cookie: &Cookie) -> WireCookie {
		let domain = if cookie.host_only {
			cookie.domain.clone()
		} else {
			format!(".{}", cookie.domain)
		};
		WireCookie {
			name: cookie.name.clone(),
			value: cookie.value.clone(),
			path: cookie.path.clone(),
			domain,
			secure: cookie.secure,
			http_only: cookie.http_only,
			same_site: cookie.same_site.unwrap_or(self.default_same_site),
			expiry: cookie.expiry.map(epoch_seconds),
		}
	}

	/// Validates an Add Cookie payload against the current document.
	pub fn from_wire(&self, input: CookieInput, document: &Url, now: OffsetDateTime) -> Result<Cookie> {
		let host = cookie_host(document).ok_or_else(|| Error::InvalidCookieDomain {
			domain: input.domain.clone().unwrap_or_default(),
			host: document.to_string(),
		})?;

		check_token("name", &input.name, true)?;
		check_token("value", &input.value, false)?;

		let (domain, host_only) = match input.domain {
			Some(domain) => {
				let domain = domain.strip_prefix('.').unwrap_or(&domain).to_ascii_lowercase();
				if domain != host && !domain_match(&host, &domain) {
					return Err(Error::InvalidCookieDomain { domain, host });
				}
				(domain, false)
			}
			None => (host, true),
		};

		let expiry = match input.expiry {
			Some(secs) if secs > MAX_SAFE_INTEGER => {
				return Err(Error::InvalidArgument(format!(
					"cookie expiry {secs} is outside 0..={MAX_SAFE_INTEGER}"
				)));
			}
			Some(secs) => Some(from_epoch_seconds(secs)?),
			None => None,
		};

		let secure = input.secure.unwrap_or(false);
		if secure && document.scheme() != "https" {
			return Err(Error::UnableToSetCookie(
				"Secure cookies can only be set on https documents".into(),
			));
		}
		if input.same_site == Some(SameSite::None) && !secure {
			return Err(Error::UnableToSetCookie("SameSite=None requires Secure".into()));
		}

		Ok(Cookie {
			name: input.name,
			value: input.value,
			domain,
			path: input.path.unwrap_or_else(|| "/".to_string()),
			host_only,
			secure,
			http_only: input.http_only.unwrap_or(false),
			same_site: input.same_site,
			expiry,
			created_at: now,
			creation_seq: 0,
		})
	}
}

fn epoch_seconds(instant: OffsetDateTime) -> u64 {
	u64::try_from(instant.unix_timestamp()).unwrap_or(0)
}

fn from_epoch_seconds(secs: u64) -> Result<OffsetDateTime> {
	i64::try_from(secs)
		.ok()
		.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
		.ok_or_else(|| Error::InvalidArgument(format!("cookie expiry {secs} is not a representable time")))
}

fn check_token(field: &str, token: &str, is_name: bool) -> Result<()> {
	let bad = token
		.chars()
		.any(|c| c.is_ascii_control() || c == ';' || (is_name && c == '='));
	if bad {
		return Err(Error::UnableToSetCookie(format!("cookie {field} contains a forbidden character")));
	}
	Ok(())
}
