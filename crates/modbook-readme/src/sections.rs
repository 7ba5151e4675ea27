//! Section extraction from module READMEs.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::outline::{outline, Heading};

/// Title used when a README has no top-level heading.
pub const UNTITLED: &str = "Untitled Module";

/// Name of a section in a [`SectionMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    Title,
    Description,
    Inputs,
    Outputs,
    Example,
}

impl SectionKey {
    /// All section keys, in template order.
    pub const ALL: [SectionKey; 5] = [
        Self::Title,
        Self::Description,
        Self::Inputs,
        Self::Outputs,
        Self::Example,
    ];

    /// Key name as used in templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Inputs => "inputs",
            Self::Outputs => "outputs",
            Self::Example => "example",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heading-delimited block to capture.
struct BlockRule {
    key: SectionKey,
    /// Heading text that opens the block
    heading: &'static str,
    /// Level of the opening heading
    level: u8,
    /// The block ends at the next heading of this level or shallower
    stop_level: u8,
}

const BLOCK_RULES: [BlockRule; 4] = [
    BlockRule {
        key: SectionKey::Description,
        heading: "Description",
        level: 2,
        stop_level: 2,
    },
    BlockRule {
        key: SectionKey::Inputs,
        heading: "Input Parameters",
        level: 3,
        stop_level: 3,
    },
    BlockRule {
        key: SectionKey::Outputs,
        heading: "Module Metadata Outputs",
        level: 3,
        stop_level: 3,
    },
    BlockRule {
        key: SectionKey::Example,
        heading: "Input Example",
        level: 3,
        stop_level: 3,
    },
];

/// Documentation fragments extracted from one README.
///
/// Every field is always present; missing sections are empty strings and a
/// missing title is [`UNTITLED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMap {
    pub title: String,
    pub description: String,
    pub inputs: String,
    pub outputs: String,
    pub example: String,
}

impl Default for SectionMap {
    fn default() -> Self {
        Self {
            title: UNTITLED.to_string(),
            description: String::new(),
            inputs: String::new(),
            outputs: String::new(),
            example: String::new(),
        }
    }
}

impl SectionMap {
    /// Look up a section by key.
    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Title => &self.title,
            SectionKey::Description => &self.description,
            SectionKey::Inputs => &self.inputs,
            SectionKey::Outputs => &self.outputs,
            SectionKey::Example => &self.example,
        }
    }

    fn slot(&mut self, key: SectionKey) -> &mut String {
        match key {
            SectionKey::Title => &mut self.title,
            SectionKey::Description => &mut self.description,
            SectionKey::Inputs => &mut self.inputs,
            SectionKey::Outputs => &mut self.outputs,
            SectionKey::Example => &mut self.example,
        }
    }

    /// True when nothing beyond the fallback title could be extracted.
    pub fn is_blank(&self) -> bool {
        SectionKey::ALL.iter().all(|key| match key {
            SectionKey::Title => self.title == UNTITLED,
            _ => self.get(*key).is_empty(),
        })
    }

    /// True when the page needs an interface block.
    pub fn has_interface(&self) -> bool {
        !(self.inputs.is_empty() && self.outputs.is_empty() && self.example.is_empty())
    }
}

/// Extract the fixed set of sections from README text.
///
/// Absent sections are not an error; they keep their default value.
pub fn extract_sections(source: &str) -> SectionMap {
    let headings = outline(source);
    let mut sections = SectionMap::default();

    if let Some(title) = headings.iter().find(|h| h.level == 1) {
        sections.title = title.text.clone();
    }

    for rule in &BLOCK_RULES {
        let Some(index) = headings
            .iter()
            .position(|h| h.level == rule.level && h.text == rule.heading)
        else {
            continue;
        };

        let start = headings[index].span.end;
        let end = headings[index + 1..]
            .iter()
            .find(|h| h.level <= rule.stop_level)
            .map(|h: &Heading| h.span.start)
            .unwrap_or(source.len());

        *sections.slot(rule.key) = source[start..end.max(start)].trim().to_string();
    }

    sections
}

/// Read a README from disk and extract its sections.
pub fn read_sections(path: &Path) -> Result<SectionMap, ReadmeError> {
    let content = fs::read_to_string(path).map_err(|source| ReadmeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(extract_sections(&content))
}

/// Errors that can occur when loading a README.
#[derive(Debug, thiserror::Error)]
pub enum ReadmeError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_README: &str = r#"# Network Bastion

Some badges here.

## Description

Deploys a bastion host into the shared VPC.

Access is granted through SSM only.

### Architecture

Diagram goes here.

## Inputs/Outputs

### Input Parameters

#### Required

- `vpc-id`: target VPC

#### Optional

- `instance-type`: defaults to `t3.micro`

### Input Example

```yaml
# seedfarmer manifest
name: bastion
parameters:
  - name: vpc-id
    value: vpc-123
```

### Module Metadata Outputs

- `BastionId`: instance id

## License

Apache-2.0
"#;

    #[test]
    fn extracts_all_sections() {
        let sections = extract_sections(FULL_README);

        assert_eq!(sections.title, "Network Bastion");
        assert_eq!(
            sections.description,
            "Deploys a bastion host into the shared VPC.\n\nAccess is granted through SSM only.\n\n### Architecture\n\nDiagram goes here."
        );
        assert!(sections.inputs.starts_with("#### Required"));
        assert!(sections.inputs.ends_with("defaults to `t3.micro`"));
        assert!(sections.example.starts_with("```yaml\n# seedfarmer manifest"));
        assert!(sections.example.ends_with("```"));
        assert_eq!(sections.outputs, "- `BastionId`: instance id");
    }

    #[test]
    fn missing_sections_default() {
        let sections = extract_sections("Just some text with no headings.");

        assert_eq!(sections, SectionMap::default());
        assert_eq!(sections.title, UNTITLED);
        assert!(sections.is_blank());
    }

    #[test]
    fn section_runs_to_end_of_document() {
        let sections = extract_sections("# T\n\n### Module Metadata Outputs\n\n- `Arn`\n- `Name`\n");

        assert_eq!(sections.outputs, "- `Arn`\n- `Name`");
    }

    #[test]
    fn setext_underline_does_not_end_section() {
        let source = "# Loader\n\n## Description\n\nDeploys the loader stack.\n---\nMore text.\n\n## Usage\n\n- a\n";

        let sections = extract_sections(source);

        assert_eq!(sections.description, "Deploys the loader stack.\n---\nMore text.");
    }

    #[test]
    fn setext_title_falls_back() {
        let sections = extract_sections("Widget\nLoader\n======\n\n## Description\n\nText.\n");

        assert_eq!(sections.title, UNTITLED);
        assert_eq!(sections.description, "Text.");
    }

    #[test]
    fn description_inside_html_block() {
        let sections = extract_sections("# T\n<div>\n## Description\nInside html.\n</div>\n");

        assert_eq!(sections.description, "Inside html.\n</div>");
    }

    #[test]
    fn description_stops_at_level_two() {
        let sections = extract_sections("## Description\n\nFirst.\n\n## Usage\n\nSecond.\n");

        assert_eq!(sections.description, "First.");
    }

    #[test]
    fn deeper_heading_does_not_match_pattern() {
        let sections = extract_sections("# T\n\n#### Input Parameters\n\n- a\n");

        assert_eq!(sections.inputs, "");
    }

    #[test]
    fn first_matching_heading_wins() {
        let source = "## Description\n\nOne.\n\n## Description\n\nTwo.\n";

        assert_eq!(extract_sections(source).description, "One.");
    }

    #[test]
    fn empty_section_body() {
        let sections = extract_sections("# T\n\n## Description\n## Next\n");

        assert_eq!(sections.description, "");
        assert!(!sections.is_blank());
    }

    #[test]
    fn get_matches_fields() {
        let sections = extract_sections(FULL_README);

        for key in SectionKey::ALL {
            let expected = match key {
                SectionKey::Title => &sections.title,
                SectionKey::Description => &sections.description,
                SectionKey::Inputs => &sections.inputs,
                SectionKey::Outputs => &sections.outputs,
                SectionKey::Example => &sections.example,
            };
            assert_eq!(sections.get(key), expected.as_str(), "key {}", key);
        }
        assert!(sections.has_interface());
    }

    #[test]
    fn read_sections_reports_missing_file() {
        let result = read_sections(Path::new("/nonexistent/README.md"));

        assert!(matches!(result, Err(ReadmeError::Read { .. })));
    }
}
