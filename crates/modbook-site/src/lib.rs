//! Documentation tree generator for module catalogs.
//!
//! Renders module pages, category indexes, a root index and a navigation
//! fragment for the downstream site generator.

pub mod builder;
pub mod document;
pub mod links;
pub mod nav;
pub mod templates;

pub use builder::{
    BlankReadmePolicy, GenerateConfig, GenerateError, GenerateResult, SiteBuilder, NAV_FILE,
};
pub use document::OutputDocument;
pub use links::SourceLinks;
pub use nav::{build_navigation, NavNode};
pub use templates::{RenderError, TemplateEngine};
