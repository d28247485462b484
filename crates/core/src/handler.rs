//! Command dispatch.
//!
//! [`CommandHandler`] is the single entry point for the transport layer: a
//! [`Command`] and an optional session id go in, the JSON `value` payload or
//! an [`Error`] comes out. Each request resolves its session, locks it for
//! the duration of the command, and releases it on return.

use serde::de::DeserializeOwned;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;
use wd_protocol::{
	AddCookieParams, Capabilities, ExecuteScriptParams, NavigateParams, NewSessionParams, NewSessionResult,
	NewWindowParams, NewWindowResult, StatusResult, SwitchToFrameParams, SwitchToWindowParams, WireCookie,
};

use crate::config::Defaults;
use crate::convert::CookieConverter;
use crate::cookie::CookieSource;
use crate::error::{Error, Result, invalid_argument};
use crate::registry::{SessionHandle, SessionRegistry};
use crate::script::{Statement, parse_script};

/// Every command the handler understands.
#[derive(Debug, Clone)]
pub enum Command {
	NewSession(NewSessionParams),
	DeleteSession,
	Status,
	NavigateTo(NavigateParams),
	GetCurrentUrl,
	GetWindowHandle,
	CloseWindow,
	SwitchToWindow(SwitchToWindowParams),
	GetWindowHandles,
	NewWindow(NewWindowParams),
	SwitchToFrame(SwitchToFrameParams),
	SwitchToParentFrame,
	ExecuteScript(ExecuteScriptParams),
	GetAllCookies,
	GetNamedCookie { name: String },
	AddCookie(AddCookieParams),
	DeleteCookie { name: String },
	DeleteAllCookies,
}

impl Command {
	/// Name used in logs.
	pub fn name(&self) -> &'static str {
		match self {
			Command::NewSession(_) => "new_session",
			Command::DeleteSession => "delete_session",
			Command::Status => "status",
			Command::NavigateTo(_) => "navigate_to",
			Command::GetCurrentUrl => "get_current_url",
			Command::GetWindowHandle => "get_window_handle",
			Command::CloseWindow => "close_window",
			Command::SwitchToWindow(_) => "switch_to_window",
			Command::GetWindowHandles => "get_window_handles",
			Command::NewWindow(_) => "new_window",
			Command::SwitchToFrame(_) => "switch_to_frame",
			Command::SwitchToParentFrame => "switch_to_parent_frame",
			Command::ExecuteScript(_) => "execute_script",
			Command::GetAllCookies => "get_all_cookies",
			Command::GetNamedCookie { .. } => "get_named_cookie",
			Command::AddCookie(_) => "add_cookie",
			Command::DeleteCookie { .. } => "delete_cookie",
			Command::DeleteAllCookies => "delete_all_cookies",
		}
	}
}

/// Decodes command parameters from a request body.
///
/// An empty body reads as `{}`. Malformed JSON and shape mismatches are
/// [`Error::InvalidArgument`].
pub fn parse_params<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return serde_json::from_slice(b"{}").map_err(invalid_argument);
	}
	serde_json::from_slice(body).map_err(invalid_argument)
}

/// Clock used for cookie expiry decisions.
pub type Clock = fn() -> OffsetDateTime;

/// Routes commands to sessions and their cookie jars.
pub struct CommandHandler {
	registry: SessionRegistry,
	converter: CookieConverter,
	defaults: Defaults,
	clock: Clock,
}

impl CommandHandler {
	pub fn new(defaults: Defaults) -> Self {
		Self {
			registry: SessionRegistry::new(defaults.max_sessions),
			converter: CookieConverter::new(defaults.same_site),
			defaults,
			clock: OffsetDateTime::now_utc,
		}
	}

	/// Replaces the wall clock, for deterministic expiry in tests.
	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;
		self
	}

	pub fn registry(&self) -> &SessionRegistry {
		&self.registry
	}

	pub fn defaults(&self) -> &Defaults {
		&self.defaults
	}

	fn now(&self) -> OffsetDateTime {
		(self.clock)()
	}

	/// Runs one command and returns its `value` payload.
	pub async fn dispatch(&self, session_id: Option<&str>, command: Command) -> Result<Value> {
		let name = command.name();
		debug!(target: "wd.session", command = name, session = session_id, "dispatch");

		let result = self.run(session_id, command).await;
		if let Err(err) = &result {
			debug!(target: "wd.session", command = name, session = session_id, code = %err.code(), error = %err, "command failed");
		}
		result
	}

	async fn run(&self, session_id: Option<&str>, command: Command) -> Result<Value> {
		let id = || session_id.ok_or_else(|| Error::InvalidSessionId("command requires a session".into()));
		match command {
			Command::Status => to_value(self.status()),
			Command::NewSession(params) => to_value(self.new_session(params)?),
			Command::DeleteSession => {
				self.delete_session(id()?);
				Ok(Value::Null)
			}
			Command::NavigateTo(params) => {
				self.navigate_to(id()?, &params.url).await?;
				Ok(Value::Null)
			}
			Command::GetCurrentUrl => to_value(self.current_url(id()?).await?),
			Command::GetWindowHandle => to_value(self.window_handle(id()?).await?),
			Command::CloseWindow => to_value(self.close_window(id()?).await?),
			Command::SwitchToWindow(params) => {
				self.switch_to_window(id()?, &params.handle).await?;
				Ok(Value::Null)
			}
			Command::GetWindowHandles => to_value(self.window_handles(id()?).await?),
			Command::NewWindow(params) => to_value(self.new_window(id()?, params).await?),
			Command::SwitchToFrame(params) => {
				self.switch_to_frame(id()?, &params.id).await?;
				Ok(Value::Null)
			}
			Command::SwitchToParentFrame => {
				self.switch_to_parent_frame(id()?).await?;
				Ok(Value::Null)
			}
			Command::ExecuteScript(params) => self.execute_script(id()?, params).await,
			Command::GetAllCookies => to_value(self.get_all_cookies(id()?).await?),
			Command::GetNamedCookie { name } => to_value(self.get_named_cookie(id()?, &name).await?),
			Command::AddCookie(params) => {
				self.add_cookie(id()?, params).await?;
				Ok(Value::Null)
			}
			Command::DeleteCookie { name } => {
				self.delete_cookie(id()?, &name).await?;
				Ok(Value::Null)
			}
			Command::DeleteAllCookies => {
				self.delete_all_cookies(id()?).await?;
				Ok(Value::Null)
			}
		}
	}

	fn session(&self, id: &str) -> Result<SessionHandle> {
		self.registry.get(id)
	}

	pub fn status(&self) -> StatusResult {
		let ready = self.registry.len() < self.registry.max_sessions();
		StatusResult {
			ready,
			message: if ready {
				"ready to create sessions".to_string()
			} else {
				"session limit reached".to_string()
			},
		}
	}

	/// Capabilities in the request are accepted and ignored.
	pub fn new_session(&self, _params: NewSessionParams) -> Result<NewSessionResult> {
		let session_id = self.registry.create()?;
		Ok(NewSessionResult {
			session_id,
			capabilities: Capabilities {
				browser_name: self.defaults.browser_name.clone(),
				browser_version: env!("CARGO_PKG_VERSION").to_string(),
				platform_name: std::env::consts::OS.to_string(),
				accept_insecure_certs: false,
				set_window_rect: false,
			},
		})
	}

	/// Ends a session. Unknown ids are not an error.
	pub fn delete_session(&self, id: &str) {
		self.registry.remove(id);
	}

	pub async fn navigate_to(&self, id: &str, url: &str) -> Result<()> {
		let session = self.session(id)?;
		let mut session = session.lock().await;
		session.navigate(url)
	}

	pub async fn current_url(&self, id: &str) -> Result<String> {
		let session = self.session(id)?;
		let session = session.lock().await;
		Ok(session.current_url()?.to_string())
	}

	pub async fn window_handle(&self, id: &str) -> Result<String> {
		let session = self.session(id)?;
		let session = session.lock().await;
		session.window_handle()
	}

	pub async fn window_handles(&self, id: &str) -> Result<Vec<String>> {
		let session = self.session(id)?;
		let session = session.lock().await;
		Ok(session.window_handles())
	}

	/// Closes the current window. Closing the last one ends the session.
	pub async fn close_window(&self, id: &str) -> Result<Vec<String>> {
		let session = self.session(id)?;
		let mut session = session.lock().await;
		let remaining = session.close_window()?;
		if session.is_finished() {
			self.registry.remove(id);
		}
		Ok(remaining)
	}

	pub async fn switch_to_window(&self, id: &str, handle: &str) -> Result<()> {
		let session = self.session(id)?;
		let mut session = session.lock().await;
		session.switch_to_window(handle)
	}

	pub async fn new_window(&self, id: &str, params: NewWindowParams) -> Result<NewWindowResult> {
		let kind = params.kind.unwrap_or_default();
		let session = self.session(id)?;
		let mut session = session.lock().await;
		let handle = session.new_window(kind)?;
		Ok(NewWindowResult { handle, kind })
	}

	pub async fn switch_to_frame(&self, id: &str, frame: &Value) -> Result<()> {
		let session = self.session(id)?;
		let mut session = session.lock().await;
		session.switch_to_frame(frame)
	}

	pub async fn switch_to_parent_frame(&self, id: &str) -> Result<()> {
		let session = self.session(id)?;
		let mut session = session.lock().await;
		session.switch_to_parent_frame()
	}

	/// Runs a recognized `document.cookie` script in the current context.
	///
	/// Returns the value of a trailing `return document.cookie`, or `null`.
	pub async fn execute_script(&self, id: &str, params: ExecuteScriptParams) -> Result<Value> {
		if !params.args.is_array() {
			return Err(Error::InvalidArgument("script arguments must be an array".into()));
		}
		let session = self.session(id)?;
		let mut session = session.lock().await;
		session.resolve_context()?;
		let statements = parse_script(&params.script)?;

		let now = self.now();
		let mut result = Value::Null;
		for statement in statements {
			match statement {
				Statement::SetDocumentCookie(cookie) => session.set_document_cookie(&cookie, now)?,
				Statement::ReturnDocumentCookie => result = Value::String(session.document_cookie(now)?),
			}
		}
		Ok(result)
	}

	/// Every cookie visible to the current document.
	pub async fn get_all_cookies(&self, id: &str) -> Result<Vec<WireCookie>> {
		let session = self.session(id)?;
		let session = session.lock().await;
		let (jar, url) = session.cookie_scope()?;
		Ok(jar
			.visible(url, self.now())
			.into_iter()
			.map(|cookie| self.converter.to_wire(cookie))
			.collect())
	}

	/// The most specific cookie named `name` visible to the current document.
	pub async fn get_named_cookie(&self, id: &str, name: &str) -> Result<WireCookie> {
		let session = self.session(id)?;
		let session = session.lock().await;
		let (jar, url) = session.cookie_scope()?;
		let cookie = jar.find_by_name(url, name, self.now())?;
		Ok(self.converter.to_wire(cookie))
	}

	pub async fn add_cookie(&self, id: &str, params: AddCookieParams) -> Result<()> {
		let now = self.now();
		let session = self.session(id)?;
		let mut session = session.lock().await;
		let (jar, url) = session.cookie_scope_mut()?;
		let cookie = self.converter.from_wire(params.cookie, &url, now)?;
		jar.store(cookie, CookieSource::Driver, now)?;
		Ok(())
	}

	pub async fn delete_cookie(&self, id: &str, name: &str) -> Result<()> {
		let now = self.now();
		let session = self.session(id)?;
		let mut session = session.lock().await;
		let (jar, url) = session.cookie_scope_mut()?;
		let removed = jar.remove_named(&url, name, now);
		debug!(target: "wd.cookie", session = id, name, removed, "delete cookie");
		Ok(())
	}

	pub async fn delete_all_cookies(&self, id: &str) -> Result<()> {
		let now = self.now();
		let session = self.session(id)?;
		let mut session = session.lock().await;
		let (jar, url) = session.cookie_scope_mut()?;
		let removed = jar.clear_visible(&url, now);
		debug!(target: "wd.cookie", session = id, removed, "delete all cookies");
		Ok(())
	}
}

impl Default for CommandHandler {
	fn default() -> Self {
		Self::new(Defaults::default())
	}
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value> {
	Ok(serde_json::to_value(value)?)
}
