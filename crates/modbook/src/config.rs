//! Configuration file (modbook.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modbook_catalog::{FetchError, Fetcher, GitFetcher, LocalFetcher, Snapshot, DEFAULT_REPO_URL};
use modbook_site::{BlankReadmePolicy, GenerateConfig, SourceLinks};
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_repo_url")]
    pub repo_url: String,
    /// Branch to clone (remote default when unset)
    pub branch: Option<String>,
    /// Use an existing local checkout instead of cloning
    pub path: Option<PathBuf>,
    #[serde(default = "default_modules_dir")]
    pub modules_dir: String,
    /// Base of source links, e.g. `https://github.com/org/repo/tree/main`
    pub source_base: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    pub nav_file: Option<PathBuf>,
    pub nav_prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    pub about: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExtractConfig {
    #[serde(default)]
    pub blank_readme: BlankReadmePolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repo_url: default_repo_url(),
            branch: None,
            path: None,
            modules_dir: default_modules_dir(),
            source_base: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            nav_file: None,
            nav_prefix: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            about: None,
        }
    }
}

fn default_repo_url() -> String {
    DEFAULT_REPO_URL.to_string()
}
fn default_modules_dir() -> String {
    "modules".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("docs/modules")
}
fn default_title() -> String {
    "Module Catalog".to_string()
}

/// Load configuration if the file exists.
/// Returns an error if the file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Where the catalog snapshot comes from.
pub enum CatalogSource {
    Git(GitFetcher),
    Local(LocalFetcher),
}

impl Fetcher for CatalogSource {
    fn describe(&self) -> String {
        match self {
            Self::Git(git) => git.describe(),
            Self::Local(local) => local.describe(),
        }
    }

    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        match self {
            Self::Git(git) => git.fetch().await,
            Self::Local(local) => local.fetch().await,
        }
    }
}

impl ConfigFile {
    /// Apply command-line overrides and build the run configuration.
    ///
    /// A repository given on the command line takes precedence over a local
    /// checkout configured in the file.
    pub fn resolve(
        self,
        repo: Option<String>,
        output: Option<PathBuf>,
    ) -> (CatalogSource, GenerateConfig) {
        let repo_overridden = repo.is_some();
        let repo_url = repo.unwrap_or(self.source.repo_url);
        let branch = self.source.branch;

        let source = match self.source.path {
            Some(path) if !repo_overridden => CatalogSource::Local(LocalFetcher::new(path)),
            _ => {
                let mut git = GitFetcher::new(repo_url.as_str());
                git.branch = branch.clone();
                CatalogSource::Git(git)
            }
        };

        let mut links =
            SourceLinks::from_repo_url(&repo_url, branch.as_deref(), &self.source.modules_dir);
        if let Some(base) = self.source.source_base {
            links = links.with_tree(base);
        }

        let mut config = GenerateConfig {
            modules_dir: PathBuf::from(&self.source.modules_dir),
            output_dir: output.unwrap_or(self.output.dir),
            nav_file: self.output.nav_file,
            nav_prefix: self.output.nav_prefix,
            site_title: self.site.title,
            source: links,
            blank_readme: self.extract.blank_readme,
            ..Default::default()
        };
        if self.site.about.is_some() {
            config.about = self.site.about;
        }

        (source, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_uses_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        let (source, generate) = config.resolve(None, None);

        assert!(matches!(source, CatalogSource::Git(_)));
        assert_eq!(source.describe(), DEFAULT_REPO_URL);
        assert_eq!(generate.output_dir, PathBuf::from("docs/modules"));
        assert_eq!(generate.modules_dir, PathBuf::from("modules"));
        assert_eq!(generate.site_title, "Module Catalog");
        assert_eq!(generate.blank_readme, BlankReadmePolicy::Include);
        assert!(generate.about.is_some());
    }

    #[test]
    fn parses_all_sections() {
        let config: ConfigFile = toml::from_str(
            r#"
[source]
repo_url = "https://github.com/awslabs/idf-modules.git"
branch = "release/1.x"
modules_dir = "modules"

[output]
dir = "site/docs/idf"
nav_prefix = "idf"

[site]
title = "IDF Modules Documentation"
about = "Industrial Data Fabric modules."

[extract]
blank_readme = "warn"
"#,
        )
        .unwrap();

        let (source, generate) = config.resolve(None, None);

        assert_eq!(
            source.describe(),
            "https://github.com/awslabs/idf-modules.git (release/1.x)"
        );
        assert_eq!(generate.output_dir, PathBuf::from("site/docs/idf"));
        assert_eq!(generate.nav_prefix(), "idf");
        assert_eq!(generate.site_title, "IDF Modules Documentation");
        assert_eq!(generate.about.as_deref(), Some("Industrial Data Fabric modules."));
        assert_eq!(generate.blank_readme, BlankReadmePolicy::Warn);
        assert_eq!(
            generate.source.module_url("core", "vpc"),
            "https://github.com/awslabs/idf-modules/tree/release/1.x/modules/core/vpc"
        );
    }

    #[test]
    fn command_line_overrides_file() {
        let config: ConfigFile = toml::from_str(
            r#"
[source]
path = "/srv/catalog"

[output]
dir = "docs/modules"
"#,
        )
        .unwrap();

        let (source, generate) = config.resolve(
            Some("https://example.com/other.git".to_string()),
            Some(PathBuf::from("out")),
        );

        assert!(matches!(source, CatalogSource::Git(_)));
        assert_eq!(generate.output_dir, PathBuf::from("out"));
        assert_eq!(generate.source.repository, "https://example.com/other");
    }

    #[test]
    fn local_checkout_from_file() {
        let config: ConfigFile = toml::from_str("[source]\npath = \"/srv/catalog\"\n").unwrap();

        let (source, _) = config.resolve(None, None);

        assert!(matches!(source, CatalogSource::Local(_)));
        assert_eq!(source.describe(), "/srv/catalog");
    }

    #[test]
    fn source_base_overrides_links() {
        let config: ConfigFile = toml::from_str(
            "[source]\nsource_base = \"https://github.com/awslabs/idf-modules/tree/main\"\n",
        )
        .unwrap();

        let (_, generate) = config.resolve(None, None);

        assert_eq!(
            generate.source.module_url("a", "b"),
            "https://github.com/awslabs/idf-modules/tree/main/modules/a/b"
        );
    }

    #[test]
    fn rejects_unknown_policy() {
        let result: Result<ConfigFile, _> = toml::from_str("[extract]\nblank_readme = \"maybe\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let config = load_config(Path::new("/nonexistent/modbook.toml")).unwrap();

        assert_eq!(config.output.dir, PathBuf::from("docs/modules"));
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modbook.toml");
        fs::write(&path, "[output\ndir = 3").unwrap();

        assert!(load_config(&path).is_err());
    }
}
