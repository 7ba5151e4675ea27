//! Snapshot acquisition for the module catalog.
//!
//! A [`Snapshot`] is a read-only local copy of the catalog repository. When it
//! was created from a remote checkout it owns a temporary directory, which is
//! deleted when the snapshot is dropped.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::process::Command;

/// Default module catalog repository.
pub const DEFAULT_REPO_URL: &str = "https://github.com/awslabs/aiops-modules.git";

/// A local copy of the module catalog.
#[derive(Debug)]
pub struct Snapshot {
    root: PathBuf,

    /// Temporary checkout, removed on drop
    checkout: Option<TempDir>,
}

impl Snapshot {
    /// Wrap an existing directory. It is never deleted.
    pub fn borrowed(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            checkout: None,
        }
    }

    /// Take ownership of a temporary checkout.
    pub fn owned(checkout: TempDir) -> Self {
        Self {
            root: checkout.path().to_path_buf(),
            checkout: Some(checkout),
        }
    }

    /// Root directory of the snapshot.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the module categories.
    pub fn module_root(&self, modules_dir: &Path) -> PathBuf {
        self.root.join(modules_dir)
    }

    /// Whether the snapshot deletes its directory when released.
    pub fn is_temporary(&self) -> bool {
        self.checkout.is_some()
    }

    /// Release the snapshot, reporting any failure to delete the checkout.
    pub fn close(self) -> io::Result<()> {
        match self.checkout {
            Some(checkout) => checkout.close(),
            None => Ok(()),
        }
    }
}

/// A source of catalog snapshots.
pub trait Fetcher: Send + Sync {
    /// Human-readable description of where snapshots come from.
    fn describe(&self) -> String;

    /// Produce a snapshot of the latest catalog revision.
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;
}

/// Fetches the catalog with a shallow `git clone`.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    /// Repository URL
    pub repo_url: String,

    /// Branch to check out (remote default when unset)
    pub branch: Option<String>,
}

impl GitFetcher {
    /// Create a fetcher for the default branch of a repository.
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            branch: None,
        }
    }

    /// Check out a specific branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    fn clone_command(&self, target: &Path) -> Command {
        let mut command = Command::new("git");
        command.args(["clone", "--depth", "1", "--quiet"]);

        if let Some(branch) = &self.branch {
            command.arg("--branch").arg(branch);
        }

        command
            .arg(&self.repo_url)
            .arg(target)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);

        command
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_REPO_URL)
    }
}

impl Fetcher for GitFetcher {
    fn describe(&self) -> String {
        match &self.branch {
            Some(branch) => format!("{} ({})", self.repo_url, branch),
            None => self.repo_url.clone(),
        }
    }

    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let checkout = tempfile::Builder::new()
            .prefix("modbook-")
            .tempdir()
            .map_err(FetchError::TempDir)?;

        tracing::info!("Cloning {} to {}", self.describe(), checkout.path().display());

        let output = self
            .clone_command(checkout.path())
            .output()
            .await
            .map_err(FetchError::Spawn)?;

        if !output.status.success() {
            // checkout is dropped here, removing the partial clone
            return Err(FetchError::Clone {
                url: self.repo_url.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(Snapshot::owned(checkout))
    }
}

/// Uses an existing local directory as the snapshot.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    pub root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetcher for LocalFetcher {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        if !self.root.is_dir() {
            return Err(FetchError::MissingRoot(self.root.clone()));
        }

        Ok(Snapshot::borrowed(&self.root))
    }
}

/// Errors that can occur while fetching the catalog.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to create temporary checkout directory: {0}")]
    TempDir(io::Error),

    #[error("Failed to run git: {0}")]
    Spawn(io::Error),

    #[error("git clone of {url} failed: {stderr}")]
    Clone { url: String, stderr: String },

    #[error("Catalog directory not found: {}", .0.display())]
    MissingRoot(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn owned_snapshot_removes_checkout_on_drop() {
        let checkout = tempfile::tempdir().unwrap();
        let path = checkout.path().to_path_buf();
        std::fs::write(path.join("marker"), "x").unwrap();

        let snapshot = Snapshot::owned(checkout);
        assert!(snapshot.is_temporary());
        assert_eq!(snapshot.root(), path.as_path());

        drop(snapshot);
        assert!(!path.exists());
    }

    #[test]
    fn owned_snapshot_close_removes_checkout() {
        let checkout = tempfile::tempdir().unwrap();
        let path = checkout.path().to_path_buf();

        Snapshot::owned(checkout).close().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn borrowed_snapshot_keeps_directory() {
        let dir = tempfile::tempdir().unwrap();

        let snapshot = Snapshot::borrowed(dir.path());
        assert!(!snapshot.is_temporary());
        assert_eq!(
            snapshot.module_root(Path::new("modules")),
            dir.path().join("modules")
        );

        snapshot.close().unwrap();
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn local_fetcher_requires_directory() {
        let fetcher = LocalFetcher::new("/nonexistent/catalog");

        let result = fetcher.fetch().await;

        assert!(matches!(result, Err(FetchError::MissingRoot(_))));
    }

    #[tokio::test]
    async fn local_fetcher_returns_borrowed_snapshot() {
        let dir = tempfile::tempdir().unwrap();

        let snapshot = LocalFetcher::new(dir.path()).fetch().await.unwrap();

        assert_eq!(snapshot.root(), dir.path());
        assert!(!snapshot.is_temporary());
    }

    #[test]
    fn clone_command_is_shallow() {
        let fetcher = GitFetcher::new("https://example.com/catalog.git").with_branch("release");
        let command = fetcher.clone_command(Path::new("/tmp/target"));

        let args: Vec<String> = command
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        assert_eq!(
            args,
            vec![
                "clone",
                "--depth",
                "1",
                "--quiet",
                "--branch",
                "release",
                "https://example.com/catalog.git",
                "/tmp/target",
            ]
        );
        assert_eq!(fetcher.describe(), "https://example.com/catalog.git (release)");
    }

    #[tokio::test]
    async fn unreachable_repository_is_fetch_error() {
        let missing = tempfile::tempdir().unwrap();
        let fetcher = GitFetcher::new(missing.path().join("no-such-repo").display().to_string());

        // Either git is absent (Spawn) or the clone fails (Clone)
        let result = fetcher.fetch().await;

        assert!(matches!(
            result,
            Err(FetchError::Spawn(_)) | Err(FetchError::Clone { .. })
        ));
    }
}
