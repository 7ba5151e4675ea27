//! Navigation fragment for the site generator configuration.
//!
//! The fragment mirrors the category/module tree and is serialized as YAML
//! where every node is a single-key mapping: `{label: path}` for pages and
//! `{label: [children]}` for sections.

use serde::ser::{Serialize, SerializeMap, Serializer};

use modbook_catalog::Catalog;

use crate::templates::{module_label, title_case};

/// Label of the top-level navigation entry.
pub const ROOT_LABEL: &str = "Modules";

/// Label of index pages inside a section.
pub const OVERVIEW_LABEL: &str = "Overview";

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavNode {
    /// A single page
    Page { label: String, path: String },

    /// A group of entries
    Section { label: String, children: Vec<NavNode> },
}

impl NavNode {
    pub fn label(&self) -> &str {
        match self {
            Self::Page { label, .. } | Self::Section { label, .. } => label,
        }
    }

    /// Number of pages below this node, including itself.
    pub fn page_count(&self) -> usize {
        match self {
            Self::Page { .. } => 1,
            Self::Section { children, .. } => children.iter().map(NavNode::page_count).sum(),
        }
    }
}

impl Serialize for NavNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Page { label, path } => map.serialize_entry(label, path)?,
            Self::Section { label, children } => map.serialize_entry(label, children)?,
        }
        map.end()
    }
}

/// Build the navigation tree for a catalog.
///
/// `prefix` is the output root relative to the site's docs directory.
pub fn build_navigation(catalog: &Catalog, prefix: &str) -> NavNode {
    let mut children = vec![NavNode::Page {
        label: OVERVIEW_LABEL.to_string(),
        path: site_path(prefix, "index.md"),
    }];

    for (category, modules) in catalog.categories() {
        let mut entries = vec![NavNode::Page {
            label: OVERVIEW_LABEL.to_string(),
            path: site_path(prefix, &format!("{}/index.md", category)),
        }];

        entries.extend(modules.iter().map(|module| NavNode::Page {
            label: module_label(module),
            path: site_path(prefix, &format!("{}/{}.md", category, module)),
        }));

        children.push(NavNode::Section {
            label: title_case(category),
            children: entries,
        });
    }

    NavNode::Section {
        label: ROOT_LABEL.to_string(),
        children,
    }
}

/// Serialize a navigation tree to block-style YAML.
pub fn to_yaml(nav: &NavNode) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(nav)
}

fn site_path(prefix: &str, relative: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", prefix, relative)
    }
}
