//! Documentation generation command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modbook_catalog::Fetcher;
use modbook_site::SiteBuilder;

use crate::config::load_config;

/// Run the generator.
pub async fn run(config_path: &Path, repo: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let file_config = load_config(config_path)?;
    let (source, config) = file_config.resolve(repo, output);

    tracing::info!("Starting documentation generation from {}", source.describe());

    let builder = SiteBuilder::new(config)?;
    let result = builder
        .generate(&source)
        .await
        .context("Documentation generation failed")?;

    tracing::info!(
        "Generated {} module pages in {} categories in {}ms",
        result.modules,
        result.categories,
        result.duration_ms
    );

    if !result.skipped.is_empty() {
        tracing::warn!("Skipped {} module(s): {}", result.skipped.len(), result.skipped.join(", "));
    }

    tracing::info!("Documentation generated successfully in {}", result.output_dir.display());
    tracing::info!(
        "Add the contents of {} to your mkdocs.yml nav section",
        result.nav_file.display()
    );

    Ok(())
}
