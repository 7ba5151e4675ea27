//! Module catalog fetching and discovery.
//!
//! This crate obtains a local snapshot of a module catalog repository and
//! classifies its directories into categories and modules.

pub mod discover;
pub mod fetch;

pub use discover::{discover, readme_path, Catalog, DiscoveryError, README_FILE};
pub use fetch::{FetchError, Fetcher, GitFetcher, LocalFetcher, Snapshot, DEFAULT_REPO_URL};
