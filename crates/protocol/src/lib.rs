//! Wire types for the WebDriver session and cookie commands.
//!
//! This crate contains the serde-serializable shapes exchanged with a
//! WebDriver client over HTTP: cookies, command parameters and results, and
//! the error body.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with protocol**: Field names and literals match the wire exactly
//! - **Stable**: Changes only when the wire protocol changes
//!
//! Session state and cookie-jar semantics live in `wd-rs`.

pub mod command;
pub mod cookie;
pub mod error;

pub use command::*;
pub use cookie::*;
pub use error::*;
