//! Template engine for rendering catalog pages.
//!
//! Pages are Markdown for the downstream site generator, so templates are
//! registered with `.md` names and never HTML-escaped.

use minijinja::Environment;
use serde::Serialize;

use modbook_readme::SectionMap;

/// Maximum length of a category index summary, in characters.
pub const SUMMARY_LIMIT: usize = 200;

/// Context for a module detail page.
#[derive(Debug, Clone, Serialize)]
pub struct ModulePage<'a> {
    /// Category directory name
    pub category: &'a str,
    /// Category display name
    pub category_label: String,
    /// Module directory name
    pub module: &'a str,
    /// Extracted README sections
    pub sections: &'a SectionMap,
    /// Link to the module source
    pub source_url: String,
}

/// One module entry on a category index.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub module: String,
    pub title: String,
    pub summary: String,
    pub source_url: String,
}

/// Context for a category index page.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryIndex<'a> {
    pub category: &'a str,
    pub category_label: String,
    pub site_title: &'a str,
    pub modules: Vec<ModuleSummary>,
}

/// One category entry on the root index.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub label: String,
    pub count: usize,
}

/// Context for the root index page.
#[derive(Debug, Clone, Serialize)]
pub struct RootIndex<'a> {
    pub site_title: &'a str,
    pub source_name: &'a str,
    pub source_url: &'a str,
    pub categories: Vec<CategoryCount>,
    pub about: Option<&'a str>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the catalog templates.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        env.add_template("module.md", MODULE_TEMPLATE)?;
        env.add_template("category.md", CATEGORY_TEMPLATE)?;
        env.add_template("index.md", INDEX_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render a module detail page.
    pub fn render_module_page(&self, page: &ModulePage<'_>) -> Result<String, RenderError> {
        Ok(self.env.get_template("module.md")?.render(page)?)
    }

    /// Render a category index page.
    pub fn render_category_index(&self, index: &CategoryIndex<'_>) -> Result<String, RenderError> {
        Ok(self.env.get_template("category.md")?.render(index)?)
    }

    /// Render the root index page.
    pub fn render_root_index(&self, index: &RootIndex<'_>) -> Result<String, RenderError> {
        Ok(self.env.get_template("index.md")?.render(index)?)
    }
}

/// Errors that can occur when rendering a page.
#[derive(Debug, thiserror::Error)]
#[error("Failed to render template: {0}")]
pub struct RenderError(#[from] minijinja::Error);

/// Short description for a category index entry.
///
/// Takes the first line of the description, cut to [`SUMMARY_LIMIT`]
/// characters with `...` appended when it was cut.
pub fn summarize(description: &str) -> String {
    let first_line = description.lines().next().unwrap_or("").trim_end();

    match first_line.char_indices().nth(SUMMARY_LIMIT) {
        Some((cut, _)) => format!("{}...", &first_line[..cut]),
        None => first_line.to_string(),
    }
}

/// Title-case a name: letters following a non-letter are upper-cased, all
/// other letters lower-cased.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut after_letter = false;

    for c in name.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }

    out
}

/// Display label for a module directory name.
pub fn module_label(module: &str) -> String {
    title_case(&module.replace('-', " "))
}

/// Admonition titles are double-quoted.
fn admonition_title(title: &str) -> String {
    title.replace('"', "'")
}

impl ModuleSummary {
    /// Build the index entry for one module.
    pub fn new(module: &str, sections: &SectionMap, source_url: String) -> Self {
        Self {
            module: module.to_string(),
            title: admonition_title(&sections.title),
            summary: summarize(&sections.description),
            source_url,
        }
    }
}

const MODULE_TEMPLATE: &str = r##"# {{ sections.title }}

**Category:** {{ category_label }}

**Module:** `{{ category }}/{{ module }}`

## Description

{{ sections.description }}

{% if sections.inputs or sections.outputs or sections.example %}
## Interface

{% if sections.inputs %}
### Input Parameters

{{ sections.inputs }}

{% endif %}
{% if sections.outputs %}
### Module Metadata Outputs

{{ sections.outputs }}

{% endif %}
{% if sections.example %}
### Input Example

{{ sections.example }}

{% endif %}
{% endif %}
## Source

[View source]({{ source_url }})
"##;

const CATEGORY_TEMPLATE: &str = r##"# {{ category_label }} Modules

This section contains all {{ category }} modules available in the {{ site_title }}.

{% for entry in modules %}
??? info "{{ entry.title }}"

    **Module:** `{{ category }}/{{ entry.module }}`

    {{ entry.summary }}

    [View Details](./{{ entry.module }}.md){ .md-button }
    [Source]({{ entry.source_url }}){ .md-button .md-button--primary }

{% endfor %}
"##;

const INDEX_TEMPLATE: &str = r##"# {{ site_title }}

This documentation is automatically generated from the [{{ source_name }}]({{ source_url }}) repository.

## Module Categories

{% for category in categories %}
### [{{ category.label }}](./{{ category.name }}/index.md)

{{ category.count }} module{% if category.count != 1 %}s{% endif %} available

{% endfor %}
{% if about %}
## About

{{ about }}

{% endif %}
---

*Generated from the {{ source_name }} repository*
"##;
