use anyhow::Context;
use clap::Parser;
use wd_server::{ServerConfig, cli::Cli, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let config = ServerConfig::from_cli(&cli).context("Invalid configuration")?;
	wd_server::serve(config).await
}
