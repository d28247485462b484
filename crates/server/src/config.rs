//! Server configuration: JSON file plus command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wd::Defaults;

use crate::cli::Cli;

/// Schema version for config files.
pub const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4444;

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("failed to read config {path}: {source}")]
	ReadConfig {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config {path}: {source}")]
	ParseConfig {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("config schema {found} is newer than supported schema {}", SCHEMA_VERSION)]
	UnsupportedSchema { found: u32 },

	#[error("invalid listen address {addr}: {reason}")]
	InvalidAddress { addr: String, reason: String },

	#[error("invalid config: {0}")]
	Invalid(String),
}

/// Where the server listens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListenConfig {
	pub host: String,
	pub port: u16,
}

impl Default for ListenConfig {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_string(),
			port: DEFAULT_PORT,
		}
	}
}

/// Top-level config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
	#[serde(default)]
	pub schema: u32,
	#[serde(default)]
	pub listen: ListenConfig,
	#[serde(default)]
	pub defaults: Defaults,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			schema: SCHEMA_VERSION,
			listen: ListenConfig::default(),
			defaults: Defaults::default(),
		}
	}
}

impl ServerConfig {
	/// Reads a config file. Missing sections take their defaults.
	pub fn load(path: &Path) -> Result<Self, ServerError> {
		let content = fs::read_to_string(path).map_err(|source| ServerError::ReadConfig {
			path: path.to_path_buf(),
			source,
		})?;
		serde_json::from_str(&content).map_err(|source| ServerError::ParseConfig {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Builds the effective config: file (if given), then flags on top.
	pub fn from_cli(cli: &Cli) -> Result<Self, ServerError> {
		let mut config = match &cli.config {
			Some(path) => Self::load(path)?,
			None => Self::default(),
		};
		config.apply_overrides(cli);
		config.validate()?;
		Ok(config)
	}

	pub fn apply_overrides(&mut self, cli: &Cli) {
		if let Some(host) = &cli.host {
			self.listen.host = host.clone();
		}
		if let Some(port) = cli.port {
			self.listen.port = port;
		}
		if let Some(same_site) = cli.same_site_default {
			self.defaults.same_site = same_site.into();
		}
		if let Some(max_sessions) = cli.max_sessions {
			self.defaults.max_sessions = max_sessions;
		}
	}

	pub fn validate(&self) -> Result<(), ServerError> {
		if self.schema > SCHEMA_VERSION {
			return Err(ServerError::UnsupportedSchema { found: self.schema });
		}
		if self.listen.port == 0 {
			return Err(ServerError::Invalid("listen.port must be non-zero".into()));
		}
		if self.defaults.max_sessions == 0 {
			return Err(ServerError::Invalid("defaults.maxSessions must be at least 1".into()));
		}
		if self.listen.host.trim().is_empty() || self.listen.host.contains(char::is_whitespace) {
			return Err(ServerError::InvalidAddress {
				addr: self.bind_addr(),
				reason: "host must be a hostname or IP address".into(),
			});
		}
		Ok(())
	}

	/// `host:port` string handed to the listener, which resolves hostnames.
	pub fn bind_addr(&self) -> String {
		format!("{}:{}", self.listen.host, self.listen.port)
	}
}
