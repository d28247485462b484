//! A WebDriver session and the browsing-context tree it drives.
//!
//! Closed contexts are dropped from the tree immediately. Any handle that
//! still points at one (the current window, the current frame) then fails
//! resolution with [`Error::NoSuchWindow`].

use std::collections::HashMap;

use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;
use url::Url;
use wd_protocol::WindowKind;

use crate::context::{BrowsingContext, ContextId};
use crate::cookie::{CookieSource, parse_set_cookie};
use crate::error::{Error, Result};
use crate::jar::CookieJar;

/// Object key identifying a web element reference.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// Object key identifying a shadow root reference.
pub const SHADOW_ROOT_KEY: &str = "shadow-6066-11e4-a52e-4f735466cecf";
/// Object keys identifying window and frame references.
const WINDOW_KEY: &str = "window-fcc6-11e5-b4f8-330a88ab9d7f";
const FRAME_KEY: &str = "frame-075b-4da1-b6ba-e579c2d3230a";

const ABOUT_BLANK: &str = "about:blank";

#[derive(Debug)]
pub struct Session {
	id: String,
	contexts: HashMap<ContextId, BrowsingContext>,
	/// Open top-level contexts in creation order.
	windows: Vec<ContextId>,
	current_top: Option<ContextId>,
	current: Option<ContextId>,
}

impl Session {
	/// Creates a session with a single window showing `about:blank`.
	pub fn new(id: impl Into<String>) -> Result<Self> {
		let mut session = Self {
			id: id.into(),
			contexts: HashMap::new(),
			windows: Vec::new(),
			current_top: None,
			current: None,
		};
		let window = session.open_window()?;
		session.current_top = Some(window.clone());
		session.current = Some(window);
		Ok(session)
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	/// Returns true once the last window has been closed.
	pub fn is_finished(&self) -> bool {
		self.windows.is_empty()
	}

	/// Looks up an open context.
	pub fn context(&self, id: &ContextId) -> Option<&BrowsingContext> {
		self.contexts.get(id)
	}

	/// The current top-level context, if it is still open.
	pub fn top_level_context(&self) -> Result<&BrowsingContext> {
		self.current_top
			.as_ref()
			.and_then(|id| self.contexts.get(id))
			.ok_or_else(|| Error::NoSuchWindow("top-level browsing context has been closed".into()))
	}

	/// The current browsing context, which may be a nested frame.
	///
	/// Fails if either the current top-level context or the current context
	/// itself has been closed.
	pub fn resolve_context(&self) -> Result<&BrowsingContext> {
		self.top_level_context()?;
		self.current
			.as_ref()
			.and_then(|id| self.contexts.get(id))
			.ok_or_else(|| Error::NoSuchWindow("current browsing context has been closed".into()))
	}

	/// The jar and document URL cookie commands run against.
	pub fn cookie_scope(&self) -> Result<(&CookieJar, &Url)> {
		let context = self.resolve_context()?;
		let jar = self
			.contexts
			.get(context.top())
			.and_then(BrowsingContext::jar)
			.ok_or_else(|| Error::NoSuchWindow("top-level browsing context has been closed".into()))?;
		Ok((jar, context.url()))
	}

	/// Mutable variant of [`Session::cookie_scope`]. The URL is cloned out
	/// because the jar borrow covers the owning context.
	pub fn cookie_scope_mut(&mut self) -> Result<(&mut CookieJar, Url)> {
		let context = self.resolve_context()?;
		let url = context.url().clone();
		let top = context.top().clone();
		let jar = self
			.contexts
			.get_mut(&top)
			.and_then(BrowsingContext::jar_mut)
			.ok_or_else(|| Error::NoSuchWindow("top-level browsing context has been closed".into()))?;
		Ok((jar, url))
	}

	/// Loads `url` into the current top-level context.
	///
	/// All frames of the old document go away and the current context is
	/// reset to the top-level one.
	pub fn navigate(&mut self, url: &str) -> Result<()> {
		let url = Url::parse(url).map_err(|e| Error::InvalidArgument(format!("invalid URL '{url}': {e}")))?;
		let top = self.top_level_context()?.id().clone();

		let frames = self
			.contexts
			.get(&top)
			.map(|context| context.children().to_vec())
			.unwrap_or_default();
		for frame in frames {
			self.drop_subtree(&frame);
		}
		if let Some(context) = self.contexts.get_mut(&top) {
			context.children_mut().clear();
			context.set_url(url);
		}
		self.current = Some(top.clone());
		debug!(target: "wd.session", session = %self.id, context = %top, "navigated");
		Ok(())
	}

	/// URL of the current top-level document.
	pub fn current_url(&self) -> Result<&Url> {
		Ok(self.top_level_context()?.url())
	}

	pub fn window_handle(&self) -> Result<String> {
		Ok(self.top_level_context()?.id().to_string())
	}

	pub fn window_handles(&self) -> Vec<String> {
		self.windows.iter().map(ContextId::to_string).collect()
	}

	/// Closes the current top-level context and everything nested in it.
	///
	/// Returns the handles that remain open. An empty list means the session
	/// is finished.
	pub fn close_window(&mut self) -> Result<Vec<String>> {
		let top = self.top_level_context()?.id().clone();
		self.drop_subtree(&top);
		self.windows.retain(|id| id != &top);
		self.current_top = None;
		self.current = None;
		debug!(target: "wd.session", session = %self.id, window = %top, "window closed");
		Ok(self.window_handles())
	}

	pub fn switch_to_window(&mut self, handle: &str) -> Result<()> {
		let id = ContextId::from(handle);
		if !self.windows.contains(&id) {
			return Err(Error::NoSuchWindow(format!("no open window with handle {handle}")));
		}
		self.current_top = Some(id.clone());
		self.current = Some(id);
		Ok(())
	}

	/// Opens a new `about:blank` window without switching to it.
	pub fn new_window(&mut self, kind: WindowKind) -> Result<String> {
		self.top_level_context()?;
		let id = self.open_window()?;
		debug!(target: "wd.session", session = %self.id, window = %id, ?kind, "window opened");
		Ok(id.to_string())
	}

	/// Switches the current context.
	///
	/// `null` selects the top-level context and an integer selects a child
	/// frame of the current context by index.
	pub fn switch_to_frame(&mut self, id: &Value) -> Result<()> {
		match id {
			Value::Null => {
				let top = self.top_level_context()?.id().clone();
				self.current = Some(top);
				Ok(())
			}
			Value::Number(number) => {
				let index = number
					.as_u64()
					.filter(|index| *index <= u64::from(u16::MAX))
					.ok_or_else(|| Error::InvalidArgument(format!("frame index {number} is not in 0..=65535")))?;
				let context = self.resolve_context()?;
				let child = usize::try_from(index)
					.ok()
					.and_then(|index| context.children().get(index))
					.cloned()
					.ok_or_else(|| Error::NoSuchFrame(format!("no frame at index {index}")))?;
				self.current = Some(child);
				Ok(())
			}
			Value::Object(map)
				if [ELEMENT_KEY, SHADOW_ROOT_KEY, WINDOW_KEY, FRAME_KEY]
					.iter()
					.any(|key| map.contains_key(*key)) =>
			{
				self.resolve_context()?;
				Err(Error::UnsupportedOperation(
					"switching to a frame by element reference is not supported".into(),
				))
			}
			other => Err(Error::InvalidArgument(format!("frame id must be null or an integer, got {other}"))),
		}
	}

	/// Switches to the parent of the current context. A no-op at top level.
	pub fn switch_to_parent_frame(&mut self) -> Result<()> {
		let context = self.resolve_context()?;
		if let Some(parent) = context.parent() {
			if !self.contexts.contains_key(parent) {
				return Err(Error::NoSuchWindow("parent browsing context has been closed".into()));
			}
			self.current = Some(parent.clone());
		}
		Ok(())
	}

	/// Inserts a child frame under `parent`, as the engine does when a
	/// document creates an iframe.
	pub fn attach_frame(&mut self, parent: &ContextId, url: Url) -> Result<ContextId> {
		let parent_context = self
			.contexts
			.get(parent)
			.ok_or_else(|| Error::NoSuchFrame(format!("no open context {parent}")))?;
		let frame = BrowsingContext::frame(parent.clone(), parent_context.top().clone(), url);
		let id = frame.id().clone();
		self.contexts.insert(id.clone(), frame);
		if let Some(parent_context) = self.contexts.get_mut(parent) {
			parent_context.children_mut().push(id.clone());
		}
		debug!(target: "wd.session", session = %self.id, frame = %id, %parent, "frame attached");
		Ok(id)
	}

	/// Removes a frame and its descendants, as when an iframe leaves the
	/// document. Handles pointing into the removed subtree go stale.
	pub fn detach_frame(&mut self, id: &ContextId) -> Result<()> {
		let parent = match self.contexts.get(id) {
			Some(context) => context
				.parent()
				.cloned()
				.ok_or_else(|| Error::InvalidArgument(format!("{id} is a top-level context, not a frame")))?,
			None => return Err(Error::NoSuchFrame(format!("no open frame {id}"))),
		};
		if let Some(parent) = self.contexts.get_mut(&parent) {
			parent.children_mut().retain(|child| child != id);
		}
		self.drop_subtree(id);
		debug!(target: "wd.session", session = %self.id, frame = %id, "frame detached");
		Ok(())
	}

	/// Reads `document.cookie` in the current context.
	pub fn document_cookie(&self, now: OffsetDateTime) -> Result<String> {
		let (jar, url) = self.cookie_scope()?;
		Ok(jar.document_cookie(url, now))
	}

	/// Assigns to `document.cookie` in the current context.
	///
	/// Like the DOM setter this never fails because of the cookie itself:
	/// unparsable or refused cookies are dropped. Only a missing context is
	/// an error.
	pub fn set_document_cookie(&mut self, cookie_string: &str, now: OffsetDateTime) -> Result<()> {
		let (jar, url) = self.cookie_scope_mut()?;
		let Some(parsed) = parse_set_cookie(cookie_string) else {
			debug!(target: "wd.cookie", %url, "ignored unparsable cookie string");
			return Ok(());
		};
		let stored = parsed
			.resolve(&url, now)
			.and_then(|cookie| jar.store(cookie, CookieSource::Script, now));
		if let Err(err) = stored {
			debug!(target: "wd.cookie", %url, error = %err, "script cookie ignored");
		}
		Ok(())
	}

	fn open_window(&mut self) -> Result<ContextId> {
		let url = Url::parse(ABOUT_BLANK).map_err(|e| Error::SessionNotCreated(e.to_string()))?;
		let window = BrowsingContext::top_level(url);
		let id = window.id().clone();
		self.contexts.insert(id.clone(), window);
		self.windows.push(id.clone());
		Ok(id)
	}

	fn drop_subtree(&mut self, root: &ContextId) {
		let mut pending = vec![root.clone()];
		while let Some(id) = pending.pop() {
			if let Some(context) = self.contexts.remove(&id) {
				pending.extend(context.children().iter().cloned());
			}
		}
	}
}
