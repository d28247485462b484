//! Browsing contexts: top-level windows and the frames nested in them.

use std::fmt;

use url::Url;
use uuid::Uuid;

use crate::jar::CookieJar;

/// Opaque identifier of a browsing context. Top-level ids double as window
/// handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextId(String);

impl ContextId {
	pub fn new() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for ContextId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for ContextId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ContextId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

/// Where a context sits in its tree.
#[derive(Debug)]
pub enum ContextKind {
	/// A window or tab. Owns the cookie jar shared by all of its frames.
	TopLevel { jar: CookieJar },
	/// A nested frame.
	Frame { parent: ContextId, top: ContextId },
}

/// A navigable with its active document.
#[derive(Debug)]
pub struct BrowsingContext {
	id: ContextId,
	url: Url,
	children: Vec<ContextId>,
	kind: ContextKind,
}

impl BrowsingContext {
	pub fn top_level(url: Url) -> Self {
		Self {
			id: ContextId::new(),
			url,
			children: Vec::new(),
			kind: ContextKind::TopLevel { jar: CookieJar::new() },
		}
	}

	pub fn frame(parent: ContextId, top: ContextId, url: Url) -> Self {
		Self {
			id: ContextId::new(),
			url,
			children: Vec::new(),
			kind: ContextKind::Frame { parent, top },
		}
	}

	pub fn id(&self) -> &ContextId {
		&self.id
	}

	/// URL of the active document.
	pub fn url(&self) -> &Url {
		&self.url
	}

	pub(crate) fn set_url(&mut self, url: Url) {
		self.url = url;
	}

	pub fn kind(&self) -> &ContextKind {
		&self.kind
	}

	pub fn is_top_level(&self) -> bool {
		matches!(self.kind, ContextKind::TopLevel { .. })
	}

	/// Parent frame or window, `None` for top-level contexts.
	pub fn parent(&self) -> Option<&ContextId> {
		match &self.kind {
			ContextKind::TopLevel { .. } => None,
			ContextKind::Frame { parent, .. } => Some(parent),
		}
	}

	/// The top-level context whose jar this context uses.
	pub fn top(&self) -> &ContextId {
		match &self.kind {
			ContextKind::TopLevel { .. } => &self.id,
			ContextKind::Frame { top, .. } => top,
		}
	}

	/// Open child frames in document order.
	pub fn children(&self) -> &[ContextId] {
		&self.children
	}

	pub(crate) fn children_mut(&mut self) -> &mut Vec<ContextId> {
		&mut self.children
	}

	pub fn jar(&self) -> Option<&CookieJar> {
		match &self.kind {
			ContextKind::TopLevel { jar } => Some(jar),
			ContextKind::Frame { .. } => None,
		}
	}

	pub(crate) fn jar_mut(&mut self) -> Option<&mut CookieJar> {
		match &mut self.kind {
			ContextKind::TopLevel { jar } => Some(jar),
			ContextKind::Frame { .. } => None,
		}
	}
}
