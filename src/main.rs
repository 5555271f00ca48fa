use anyhow::Result;
use clap::Parser;
use cwtail::cli::{handle_tail_command, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Rendered log output owns stdout; keep tracing quiet unless asked.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    handle_tail_command(cli).await
}
