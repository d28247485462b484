//! Concurrent map of live sessions.
//!
//! Each session sits behind its own [`tokio::sync::Mutex`], which serializes
//! commands for that session in arrival order. Commands for different
//! sessions never contend. [`SessionRegistry::get`] clones the `Arc` out of
//! the map so no shard lock is held while the caller awaits the mutex.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::session::Session;

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Thread-safe registry of sessions by id.
pub struct SessionRegistry {
	sessions: DashMap<String, SessionHandle>,
	max_sessions: usize,
}

impl SessionRegistry {
	pub fn new(max_sessions: usize) -> Self {
		Self {
			sessions: DashMap::new(),
			max_sessions,
		}
	}

	pub fn max_sessions(&self) -> usize {
		self.max_sessions
	}

	/// Starts a new session and returns its id.
	pub fn create(&self) -> Result<String> {
		if self.sessions.len() >= self.max_sessions {
			return Err(Error::SessionNotCreated(format!(
				"maximum of {} concurrent sessions reached",
				self.max_sessions
			)));
		}
		let id = Uuid::new_v4().to_string();
		let session = Session::new(id.clone())?;
		self.sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
		info!(target: "wd.session", session = %id, "session created");
		Ok(id)
	}

	/// Looks up a live session.
	pub fn get(&self, id: &str) -> Result<SessionHandle> {
		self.sessions
			.get(id)
			.map(|entry| entry.value().clone())
			.ok_or_else(|| Error::InvalidSessionId(format!("no active session with id {id}")))
	}

	/// Ends a session. Returns false if it was already gone.
	pub fn remove(&self, id: &str) -> bool {
		let removed = self.sessions.remove(id).is_some();
		if removed {
			info!(target: "wd.session", session = %id, "session ended");
		} else {
			debug!(target: "wd.session", session = %id, "remove of unknown session");
		}
		removed
	}

	pub fn len(&self) -> usize {
		self.sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.is_empty()
	}

	pub fn ids(&self) -> Vec<String> {
		self.sessions.iter().map(|entry| entry.key().clone()).collect()
	}
}

impl Default for SessionRegistry {
	fn default() -> Self {
		Self::new(crate::config::DEFAULT_MAX_SESSIONS)
	}
}
