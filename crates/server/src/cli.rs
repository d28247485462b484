use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use wd::protocol::SameSite;

/// SameSite value accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliSameSite {
	None,
	Lax,
	Strict,
}

impl From<CliSameSite> for SameSite {
	fn from(value: CliSameSite) -> Self {
		match value {
			CliSameSite::None => SameSite::None,
			CliSameSite::Lax => SameSite::Lax,
			CliSameSite::Strict => SameSite::Strict,
		}
	}
}

#[derive(Parser, Debug)]
#[command(name = "wdd")]
#[command(about = "WebDriver session and cookie-store server")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// JSON config file
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Address to bind (default 127.0.0.1)
	#[arg(long)]
	pub host: Option<String>,

	/// Port to bind (default 4444)
	#[arg(short, long)]
	pub port: Option<u16>,

	/// SameSite reported for cookies stored without one
	#[arg(long, value_enum, value_name = "VALUE")]
	pub same_site_default: Option<CliSameSite>,

	/// Maximum number of concurrent sessions
	#[arg(long, value_name = "N")]
	pub max_sessions: Option<usize>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_flags_means_no_overrides() {
		let cli = Cli::parse_from(["wdd"]);
		assert_eq!(cli.verbose, 0);
		assert!(cli.config.is_none());
		assert!(cli.port.is_none());
		assert!(cli.same_site_default.is_none());
	}

	#[test]
	fn verbosity_counts() {
		let cli = Cli::parse_from(["wdd", "-vv"]);
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn rejects_unknown_same_site() {
		assert!(Cli::try_parse_from(["wdd", "--same-site-default", "sometimes"]).is_err());
	}
}
