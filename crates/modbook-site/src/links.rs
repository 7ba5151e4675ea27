//! Links back to the module catalog repository.

/// Branch used in source links when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Builds outbound links to module sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLinks {
    /// Browsable repository URL
    pub repository: String,

    /// Base of file-tree links, e.g. `<repository>/tree/main`
    pub tree: String,

    /// Module root inside the repository
    pub modules_dir: String,
}

impl SourceLinks {
    /// Derive links from a clone URL.
    pub fn from_repo_url(repo_url: &str, branch: Option<&str>, modules_dir: &str) -> Self {
        let repository = web_url(repo_url);
        let tree = format!("{}/tree/{}", repository, branch.unwrap_or(DEFAULT_BRANCH));

        Self {
            repository,
            tree,
            modules_dir: modules_dir.trim_matches('/').to_string(),
        }
    }

    /// Override the file-tree base.
    pub fn with_tree(mut self, tree: impl Into<String>) -> Self {
        self.tree = tree.into().trim_end_matches('/').to_string();
        self
    }

    /// Last path segment of the repository URL.
    pub fn repository_name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.repository)
    }

    /// Link to a module's source directory.
    pub fn module_url(&self, category: &str, module: &str) -> String {
        if self.modules_dir.is_empty() {
            format!("{}/{}/{}", self.tree, category, module)
        } else {
            format!("{}/{}/{}/{}", self.tree, self.modules_dir, category, module)
        }
    }
}

/// Turn a clone URL into a browsable one.
///
/// `git@host:org/repo.git` and `ssh://git@host/org/repo.git` both become
/// `https://host/org/repo`.
fn web_url(repo_url: &str) -> String {
    let url = repo_url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, host)| host);
        return format!("https://{}", rest);
    }

    if let Some((user_host, path)) = url.split_once(':') {
        if let Some((_, host)) = user_host.split_once('@') {
            if !user_host.contains('/') {
                return format!("https://{}/{}", host, path);
            }
        }
    }

    url.to_string()
}
