//! Catalog documentation builder.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Deserialize;

use modbook_catalog::{
    discover, readme_path, Catalog, DiscoveryError, FetchError, Fetcher, Snapshot,
    DEFAULT_REPO_URL,
};
use modbook_readme::{read_sections, SectionMap};

use crate::document::OutputDocument;
use crate::links::SourceLinks;
use crate::nav::{build_navigation, to_yaml};
use crate::templates::{
    title_case, CategoryCount, CategoryIndex, ModulePage, ModuleSummary, RenderError, RootIndex,
    TemplateEngine,
};

/// File name of the navigation fragment.
pub const NAV_FILE: &str = "nav_modules.yml";

/// Default text of the root index "About" section.
pub const DEFAULT_ABOUT: &str = "These modules are reusable infrastructure components. \
Every page in this section is generated from the module's README; edit the README in the \
source repository to change it.";

/// What to do with a README that yields nothing but the fallback title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankReadmePolicy {
    /// Publish the module with default content
    #[default]
    Include,
    /// Publish the module and report it for review
    Warn,
    /// Leave the module out of the generated tree
    Skip,
}

/// Configuration for generating the documentation tree.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Module root inside the snapshot
    pub modules_dir: PathBuf,

    /// Output root for generated pages
    pub output_dir: PathBuf,

    /// Navigation fragment path (defaults to a sibling of the output root)
    pub nav_file: Option<PathBuf>,

    /// Output root as seen from the site's docs directory
    /// (defaults to the output root's directory name)
    pub nav_prefix: Option<String>,

    /// Title of the root index
    pub site_title: String,

    /// Text of the root index "About" section
    pub about: Option<String>,

    /// Links back to module sources
    pub source: SourceLinks,

    /// Handling of READMEs without any recognizable section
    pub blank_readme: BlankReadmePolicy,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            modules_dir: PathBuf::from("modules"),
            output_dir: PathBuf::from("docs/modules"),
            nav_file: None,
            nav_prefix: None,
            site_title: "Module Catalog".to_string(),
            about: Some(DEFAULT_ABOUT.to_string()),
            source: SourceLinks::from_repo_url(DEFAULT_REPO_URL, None, "modules"),
            blank_readme: BlankReadmePolicy::Include,
        }
    }
}

impl GenerateConfig {
    /// Where the navigation fragment is written.
    pub fn nav_path(&self) -> PathBuf {
        if let Some(path) = &self.nav_file {
            return path.clone();
        }

        match self.output_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(NAV_FILE),
            _ => PathBuf::from(NAV_FILE),
        }
    }

    /// Prefix of page paths in the navigation fragment.
    pub fn nav_prefix(&self) -> String {
        if let Some(prefix) = &self.nav_prefix {
            return prefix.clone();
        }

        self.output_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string()
    }
}

/// Result of a generation run.
#[derive(Debug)]
pub struct GenerateResult {
    /// Number of module pages written
    pub modules: usize,

    /// Number of category indexes written
    pub categories: usize,

    /// Modules published with a blank README under [`BlankReadmePolicy::Warn`]
    pub flagged: Vec<String>,

    /// Modules left out (unreadable README or [`BlankReadmePolicy::Skip`])
    pub skipped: Vec<String>,

    /// Output root
    pub output_dir: PathBuf,

    /// Navigation fragment
    pub nav_file: PathBuf,

    /// Total run time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to serialize navigation: {0}")]
    Navigation(#[from] serde_yaml::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Outcome of processing one module.
enum ModuleOutcome {
    Published {
        category: String,
        module: String,
        sections: SectionMap,
        flagged: bool,
    },
    Skipped {
        id: String,
    },
}

/// Documentation tree builder.
pub struct SiteBuilder {
    config: GenerateConfig,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new builder.
    pub fn new(config: GenerateConfig) -> Result<Self, GenerateError> {
        Ok(Self {
            config,
            templates: TemplateEngine::new()?,
        })
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    /// Fetch the catalog and generate the full documentation tree.
    ///
    /// The snapshot is released before returning, whether generation
    /// succeeded or not.
    pub async fn generate<F: Fetcher>(&self, fetcher: &F) -> Result<GenerateResult, GenerateError> {
        let start = Instant::now();

        let snapshot = fetcher.fetch().await?;
        let result = self.build_tree(&snapshot, start);

        if let Err(e) = snapshot.close() {
            tracing::warn!("Failed to remove catalog checkout: {}", e);
        }

        result
    }

    /// Generate the documentation tree from an existing snapshot.
    pub fn generate_from(&self, snapshot: &Snapshot) -> Result<GenerateResult, GenerateError> {
        self.build_tree(snapshot, Instant::now())
    }

    /// Run time is measured from `start`.
    fn build_tree(
        &self,
        snapshot: &Snapshot,
        start: Instant,
    ) -> Result<GenerateResult, GenerateError> {
        let module_root = snapshot.module_root(&self.config.modules_dir);

        tracing::info!("Discovering modules...");
        let catalog = discover(&module_root)?;
        tracing::info!(
            "Found {} modules in {} categories",
            catalog.module_count(),
            catalog.category_count()
        );

        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| GenerateError::Write {
            path: output_dir.clone(),
            source,
        })?;

        // Extract and render module pages in parallel; each owns its own path
        let jobs: Vec<(&str, &str)> = catalog
            .categories()
            .flat_map(|(category, modules)| {
                modules.iter().map(move |module| (category, module.as_str()))
            })
            .collect();

        let outcomes: Vec<Result<ModuleOutcome, GenerateError>> = jobs
            .par_iter()
            .map(|(category, module)| self.build_module(&module_root, category, module))
            .collect();

        let mut published = Catalog::new();
        let mut sections: HashMap<(String, String), SectionMap> = HashMap::new();
        let mut flagged = Vec::new();
        let mut skipped = Vec::new();

        for (category, _) in catalog.categories() {
            published.add_category(category);
        }

        for outcome in outcomes {
            match outcome? {
                ModuleOutcome::Published {
                    category,
                    module,
                    sections: map,
                    flagged: is_flagged,
                } => {
                    if is_flagged {
                        flagged.push(format!("{}/{}", category, module));
                    }
                    published.add_module(category.as_str(), module.as_str());
                    sections.insert((category, module), map);
                }
                ModuleOutcome::Skipped { id } => skipped.push(id),
            }
        }

        for (category, modules) in published.categories() {
            let summaries = modules
                .iter()
                .filter_map(|module| {
                    let map = sections.get(&(category.to_string(), module.clone()))?;
                    let source_url = self.config.source.module_url(category, module);
                    Some(ModuleSummary::new(module, map, source_url))
                })
                .collect();

            let content = self.templates.render_category_index(&CategoryIndex {
                category,
                category_label: title_case(category),
                site_title: &self.config.site_title,
                modules: summaries,
            })?;

            self.write(&OutputDocument::category_index(category, content))?;
        }

        let content = self.templates.render_root_index(&RootIndex {
            site_title: &self.config.site_title,
            source_name: self.config.source.repository_name(),
            source_url: &self.config.source.repository,
            categories: published
                .categories()
                .map(|(name, modules)| CategoryCount {
                    name: name.to_string(),
                    label: title_case(name),
                    count: modules.len(),
                })
                .collect(),
            about: self.config.about.as_deref(),
        })?;
        self.write(&OutputDocument::root_index(content))?;

        let nav_file = self.config.nav_path();
        let nav = build_navigation(&published, &self.config.nav_prefix());
        write_file(&nav_file, &to_yaml(&nav)?)?;
        tracing::info!("Generated navigation: {}", nav_file.display());

        if !flagged.is_empty() {
            tracing::warn!(
                "{} module(s) have no recognizable README sections: {}",
                flagged.len(),
                flagged.join(", ")
            );
        }

        Ok(GenerateResult {
            modules: published.module_count(),
            categories: published.category_count(),
            flagged,
            skipped,
            output_dir: output_dir.clone(),
            nav_file,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Extract one module's README and write its page.
    fn build_module(
        &self,
        module_root: &Path,
        category: &str,
        module: &str,
    ) -> Result<ModuleOutcome, GenerateError> {
        let id = format!("{}/{}", category, module);

        let sections = match read_sections(&readme_path(module_root, category, module)) {
            Ok(sections) => sections,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", id, e);
                return Ok(ModuleOutcome::Skipped { id });
            }
        };

        let blank = sections.is_blank();
        if blank && self.config.blank_readme == BlankReadmePolicy::Skip {
            tracing::warn!("Skipping {}: no recognizable README sections", id);
            return Ok(ModuleOutcome::Skipped { id });
        }

        let content = self.templates.render_module_page(&ModulePage {
            category,
            category_label: title_case(category),
            module,
            sections: &sections,
            source_url: self.config.source.module_url(category, module),
        })?;

        self.write(&OutputDocument::module_page(category, module, content))?;

        Ok(ModuleOutcome::Published {
            category: category.to_string(),
            module: module.to_string(),
            sections,
            flagged: blank && self.config.blank_readme == BlankReadmePolicy::Warn,
        })
    }

    fn write(&self, document: &OutputDocument) -> Result<(), GenerateError> {
        let path = document
            .write_to(&self.config.output_dir)
            .map_err(|source| GenerateError::Write {
                path: self.config.output_dir.join(&document.path),
                source,
            })?;

        tracing::info!("Generated: {}", path.display());
        Ok(())
    }
}

/// Write a file outside the output tree.
fn write_file(path: &Path, content: &str) -> Result<(), GenerateError> {
    let result = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
    .and_then(|_| fs::write(path, content));

    result.map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}
