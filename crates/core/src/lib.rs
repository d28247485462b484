//! wd - WebDriver session registry and cookie store
//!
//! This crate holds the state behind the WebDriver session and cookie
//! commands:
//!
//! - **Registry**: live sessions by id, one lock per session
//! - **Sessions**: the browsing-context tree (windows, frames) and which
//!   context is current
//! - **Cookie store**: one jar per top-level context, RFC 6265 matching and
//!   storage rules
//! - **Converter**: stored cookie to wire cookie and back
//! - **Handler**: command dispatch and error mapping
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐
//! │ CommandHandler │  dispatch(session_id, Command)
//! └───────┬────────┘
//!         │
//! ┌───────▼────────┐     ┌─────────────────┐
//! │ SessionRegistry│     │ CookieConverter │  Cookie <-> WireCookie
//! └───────┬────────┘     └─────────────────┘
//!         │ Arc<Mutex<Session>>
//! ┌───────▼────────┐
//! │    Session     │  windows, frames, current context
//! └───────┬────────┘
//!         │ top-level context owns
//! ┌───────▼────────┐
//! │   CookieJar    │
//! └────────────────┘
//! ```
//!
//! The HTTP transport lives in `wd-server`; wire types in `wd-protocol`.

pub mod config;
pub mod context;
pub mod convert;
pub mod cookie;
pub mod error;
pub mod handler;
pub mod jar;
pub mod registry;
pub mod script;
pub mod session;

// Re-export key types at crate root
pub use config::Defaults;
pub use context::{BrowsingContext, ContextId, ContextKind};
pub use convert::CookieConverter;
pub use cookie::{Cookie, CookieSource};
pub use error::{Error, Result};
pub use handler::{Clock, Command, CommandHandler, parse_params};
pub use jar::{CookieJar, StoreOutcome};
pub use registry::{SessionHandle, SessionRegistry};
pub use session::Session;
pub use wd_protocol as protocol;
