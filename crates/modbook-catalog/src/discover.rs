//! Category and module discovery.
//!
//! The module root holds one directory per category, and each category holds
//! one directory per module. A module directory only counts when it carries
//! a README.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Documentation file every module must carry.
pub const README_FILE: &str = "README.md";

/// Categories and their modules, both in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category, which may stay empty.
    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.entry(category.into()).or_default();
    }

    /// Register a module under a category.
    pub fn add_module(&mut self, category: impl Into<String>, module: impl Into<String>) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(module.into());
    }

    /// Iterate categories with their modules, sorted by name.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.categories.iter().map(|(name, modules)| (name.as_str(), modules))
    }

    /// Modules of a category, if it exists.
    pub fn modules(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn module_count(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Path of a module's README below the module root.
pub fn readme_path(module_root: &Path, category: &str, module: &str) -> PathBuf {
    module_root.join(category).join(module).join(README_FILE)
}

/// Discover the catalog below a module root.
pub fn discover(module_root: &Path) -> Result<Catalog, DiscoveryError> {
    if !module_root.is_dir() {
        return Err(DiscoveryError::ModuleRoot(module_root.to_path_buf()));
    }

    let mut catalog = Catalog::new();

    for (category, category_dir) in subdirectories(module_root) {
        catalog.add_category(category.as_str());

        for (module, module_dir) in subdirectories(&category_dir) {
            if module_dir.join(README_FILE).is_file() {
                catalog.add_module(category.as_str(), module);
            } else {
                tracing::debug!("Skipping {}/{}: no {}", category, module, README_FILE);
            }
        }
    }

    Ok(catalog)
}

/// Immediate, non-hidden subdirectories of a directory.
fn subdirectories(dir: &Path) -> impl Iterator<Item = (String, PathBuf)> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            if name.starts_with('.') {
                return None;
            }
            Some((name, e.into_path()))
        })
}

/// Errors that can occur during discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Module root not found: {}", .0.display())]
    ModuleRoot(PathBuf),
}
