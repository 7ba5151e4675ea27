//! README section extraction for module catalogs.
//!
//! This crate scans the heading outline of a module README and pulls out the
//! fixed set of documentation sections used to build catalog pages.

pub mod outline;
pub mod sections;

pub use outline::{outline, Heading};
pub use sections::{
    extract_sections, read_sections, ReadmeError, SectionKey, SectionMap, UNTITLED,
};
