//! wd-server - HTTP front end for the wd session and cookie handler
//!
//! Binds the WebDriver routes with axum and forwards every request to a
//! shared [`wd::CommandHandler`]. The `wdd` binary wires this together with
//! the CLI, config file and logging.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use wd::CommandHandler;

pub use config::{ServerConfig, ServerError};
pub use routes::router;

/// Binds the configured address and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig) -> Result<()> {
	let handler = Arc::new(CommandHandler::new(config.defaults.clone()));
	let addr = config.bind_addr();
	let listener = TcpListener::bind(&addr)
		.await
		.with_context(|| format!("Failed to bind {addr}"))?;
	let local = listener.local_addr().context("Failed to read bound address")?;
	info!(
		target: "wd.server",
		addr = %local,
		same_site_default = %config.defaults.same_site,
		max_sessions = config.defaults.max_sessions,
		"listening"
	);

	axum::serve(listener, router(Arc::clone(&handler)))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("Server error")?;

	info!(target: "wd.server", open_sessions = handler.registry().len(), "stopped");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			warn!(target: "wd.server", error = %e, "failed to listen for Ctrl+C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};
		match signal(SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
			}
			Err(e) => {
				warn!(target: "wd.server", error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => info!(target: "wd.server", "received Ctrl+C, shutting down"),
		_ = terminate => info!(target: "wd.server", "received SIGTERM, shutting down"),
	}
}
