//! Valet - Main Entry Point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use valet_cli::Cli;

fn main() -> Result<()> {
    // Logs to stderr, results to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("running {:?}", cli);

    let output = cli.run()?;
    println!("{output}");
    Ok(())
}
