//! llm-loadgen CLI entry point

use anyhow::Result;
use clap::Parser;
use llm_loadgen::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default to warnings only in quiet mode so log lines don't fight the
    // progress bar; RUST_LOG still wins when set.
    let default_filter = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    cli.run().await
}
