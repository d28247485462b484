use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Filter directives used when `RUST_LOG` is unset.
///
/// 0 = warnings and errors only
/// 1 (-v) = info for the server and session lifecycle, warn for cookies
/// 2+ (-vv) = debug for everything, including per-request and cookie logs
pub fn default_filter(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info,wd.cookie=warn",
		_ => "debug",
	}
}

pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}
