//! Generated output documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A rendered document and its place in the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    /// Path relative to the output root
    pub path: PathBuf,

    /// Rendered Markdown
    pub content: String,
}

impl OutputDocument {
    /// `<category>/<module>.md`
    pub fn module_page(category: &str, module: &str, content: String) -> Self {
        Self {
            path: Path::new(category).join(format!("{}.md", module)),
            content,
        }
    }

    /// `<category>/index.md`
    pub fn category_index(category: &str, content: String) -> Self {
        Self {
            path: Path::new(category).join("index.md"),
            content,
        }
    }

    /// `index.md`
    pub fn root_index(content: String) -> Self {
        Self {
            path: PathBuf::from("index.md"),
            content,
        }
    }

    /// Write below the output root, replacing any existing file.
    ///
    /// Returns the full path written.
    pub fn write_to(&self, output_root: &Path) -> io::Result<PathBuf> {
        let target = output_root.join(&self.path);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &self.content)?;

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paths_follow_layout() {
        assert_eq!(
            OutputDocument::module_page("storage", "fsx-lustre", String::new()).path,
            PathBuf::from("storage/fsx-lustre.md")
        );
        assert_eq!(
            OutputDocument::category_index("storage", String::new()).path,
            PathBuf::from("storage/index.md")
        );
        assert_eq!(
            OutputDocument::root_index(String::new()).path,
            PathBuf::from("index.md")
        );
    }

    #[test]
    fn write_overwrites_existing_content() {
        let temp = tempfile::tempdir().unwrap();
        let first = OutputDocument::category_index("storage", "old and longer".to_string());
        let second = OutputDocument::category_index("storage", "new".to_string());

        first.write_to(temp.path()).unwrap();
        let written = second.write_to(temp.path()).unwrap();

        assert_eq!(written, temp.path().join("storage/index.md"));
        assert_eq!(fs::read_to_string(written).unwrap(), "new");
    }
}
