mod cli;
mod config;
mod error;
mod import;
mod mapping;
mod model;
mod planka;
mod report;
mod translate;
mod trello;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let result = cli::run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "trello2planka failed");
    }
    result
}
