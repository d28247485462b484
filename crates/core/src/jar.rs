//! Cookie jar owned by a top-level browsing context.
//!
//! The jar enforces the (name, domain, path) uniqueness invariant and the
//! replacement rules of RFC 6265 section 5.3. All reads are scoped to a
//! document URL: a cookie is only ever returned to a document it would be
//! sent to.

use time::OffsetDateTime;
use tracing::{debug, trace};
use url::Url;

use crate::cookie::{Cookie, CookieSource};
use crate::error::{Error, Result};

/// What a successful [`CookieJar::store`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
	/// A new cookie was added.
	Inserted,
	/// A cookie with the same identity was overwritten.
	Replaced,
	/// The cookie was already expired; any cookie with its identity is gone.
	Expired,
}

/// Per-context cookie storage.
#[derive(Debug, Default)]
pub struct CookieJar {
	cookies: Vec<Cookie>,
	next_seq: u64,
}

impl CookieJar {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored cookies, including ones not yet purged after expiry.
	pub fn len(&self) -> usize {
		self.cookies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cookies.is_empty()
	}

	/// Stores a cookie, replacing any cookie with the same identity.
	///
	/// A replacement inherits the creation time of the cookie it replaces.
	/// Script writes may neither carry `HttpOnly` nor overwrite an
	/// `HttpOnly` cookie.
	pub fn store(&mut self, mut cookie: Cookie, source: CookieSource, now: OffsetDateTime) -> Result<StoreOutcome> {
		if source == CookieSource::Script && cookie.http_only {
			return Err(Error::UnableToSetCookie("HttpOnly cookies cannot be set from script".into()));
		}

		self.purge_expired(now);

		let existing = self.cookies.iter().position(|c| c.same_identity(&cookie));
		if let Some(idx) = existing {
			let old = &self.cookies[idx];
			if source == CookieSource::Script && old.http_only {
				return Err(Error::UnableToSetCookie(format!(
					"cookie '{}' is HttpOnly and cannot be overwritten from script",
					old.name
				)));
			}
			cookie.created_at = old.created_at;
			cookie.creation_seq = old.creation_seq;
		} else {
			cookie.created_at = now;
			cookie.creation_seq = self.next_seq;
			self.next_seq += 1;
		}

		if cookie.is_expired(now) {
			if let Some(idx) = existing {
				self.cookies.remove(idx);
			}
			debug!(target: "wd.cookie", name = %cookie.name, domain = %cookie.domain, "expired cookie write evicted");
			return Ok(StoreOutcome::Expired);
		}

		trace!(
			target: "wd.cookie",
			name = %cookie.name,
			domain = %cookie.domain,
			path = %cookie.path,
			?source,
			"cookie stored"
		);
		match existing {
			Some(idx) => {
				self.cookies[idx] = cookie;
				Ok(StoreOutcome::Replaced)
			}
			None => {
				self.cookies.push(cookie);
				Ok(StoreOutcome::Inserted)
			}
		}
	}

	/// Cookies visible to `url`, longest path first, then oldest first.
	pub fn visible(&self, url: &Url, now: OffsetDateTime) -> Vec<&Cookie> {
		let mut visible: Vec<&Cookie> = self
			.cookies
			.iter()
			.filter(|c| !c.is_expired(now) && c.visible_to(url))
			.collect();
		visible.sort_by(|a, b| {
			b.path
				.len()
				.cmp(&a.path.len())
				.then(a.creation_seq.cmp(&b.creation_seq))
		});
		visible
	}

	/// Finds the most specific visible cookie named `name`.
	pub fn find_by_name(&self, url: &Url, name: &str, now: OffsetDateTime) -> Result<&Cookie> {
		self.visible(url, now)
			.into_iter()
			.find(|c| c.name == name)
			.ok_or_else(|| Error::NoSuchCookie { name: name.to_string() })
	}

	/// Removes every visible cookie named `name`. Returns how many were removed.
	pub fn remove_named(&mut self, url: &Url, name: &str, now: OffsetDateTime) -> usize {
		let before = self.cookies.len();
		self.cookies
			.retain(|c| c.is_expired(now) || c.name != name || !c.visible_to(url));
		self.purge_expired(now);
		before - self.cookies.len()
	}

	/// Removes every cookie visible to `url`. Returns how many were removed.
	pub fn clear_visible(&mut self, url: &Url, now: OffsetDateTime) -> usize {
		let before = self.cookies.len();
		self.cookies.retain(|c| c.is_expired(now) || !c.visible_to(url));
		self.purge_expired(now);
		before - self.cookies.len()
	}

	/// Removes everything, visible or not.
	pub fn clear(&mut self) {
		self.cookies.clear();
	}

	/// The string `document.cookie` reads: non-HttpOnly visible cookies as
	/// `name=value` joined by `"; "`.
	pub fn document_cookie(&self, url: &Url, now: OffsetDateTime) -> String {
		self.visible(url, now)
			.into_iter()
			.filter(|c| !c.http_only)
			.map(|c| {
				if c.name.is_empty() {
					c.value.clone()
				} else {
					format!("{}={}", c.name, c.value)
				}
			})
			.collect::<Vec<_>>()
			.join("; ")
	}

	fn purge_expired(&mut self, now: OffsetDateTime) {
		self.cookies.retain(|c| !c.is_expired(now));
	}
}
