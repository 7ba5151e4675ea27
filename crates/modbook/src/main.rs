//! modbook CLI - generate documentation from an infrastructure module catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod generate;

#[derive(Parser)]
#[command(name = "modbook")]
#[command(about = "Generate a documentation tree from an infrastructure module catalog")]
#[command(version)]
pub struct Cli {
    /// Repository URL of the module catalog
    #[arg(short, long)]
    repo: Option<String>,

    /// Output directory for generated pages (defaults to config or "docs/modules")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to modbook.toml config file
    #[arg(short, long, default_value = "modbook.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    generate::run(&cli.config, cli.repo, cli.output).await
}
