use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use budget_planner::config::AppConfig;
use budget_planner::initialize_backend;
use budget_planner::io::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // RUST_LOG wins over the configured filter. Logs go to stderr so stdout
    // stays clean for exported JSON lines.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let state = initialize_backend(&config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    io::run(cli.command, &state, &mut out).await
}
