//! Binary crate for the `skywatch` command-line dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive dashboard page
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;
mod repl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    skywatch_core::display::validate_code_table()?;

    let cmd = cli::Cli::parse();
    cmd.run().await
}
