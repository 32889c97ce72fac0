//! # usp-core
//!
//! Recursive sitemap discovery, fetch, and parse engine.
//!
//! Given a homepage URL, [`sitemap_tree_for_homepage`] probes `robots.txt` and the well-known
//! sitemap paths, recursively follows any sitemap index it finds, and returns a single in-memory
//! tree whose leaves are page records. [`sitemap_from_str`] parses one already-fetched document
//! with no network access, for callers who manage their own fetching.
//!
//! ## Quick start
//!
//! ```no_run
//! # async fn run() -> usp_core::Result<()> {
//! use usp_core::{EngineConfig, RecursionFilters, sitemap_tree_for_homepage};
//!
//! let tree = sitemap_tree_for_homepage(
//!     "https://example.org",
//!     EngineConfig::default(),
//!     RecursionFilters::default(),
//!     None,
//! )
//! .await?;
//!
//! for page in tree.all_pages() {
//!     println!("{}", page.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! Network and parse failures while walking a tree never abort the whole call: they are
//! localised to the node that produced them and surfaced as an [`entity::SitemapEntity::InvalidSitemap`]
//! leaf. [`Error`] is reserved for failures in a single, non-tree-walking operation (building the
//! client, parsing a homepage URL, reading or writing a page-store scratch file).

/// The web client interface and its default `reqwest`-backed implementation.
pub mod client;
/// Engine configuration: client tuning, recursion bounds, well-known paths.
pub mod config;
/// RFC3339/date-only/naive-datetime timestamp parsing and priority defaulting.
pub mod date;
/// The sitemap entity sum type and the page records it carries.
pub mod entity;
/// Error types and the crate's `Result` alias.
pub mod error;
/// Fetcher and classifier: one recursive walk from a URL to a subtree.
pub mod fetch;
/// Top-level orchestrator: homepage to tree, and the no-network single-document entry point.
pub mod orchestrator;
/// Scratch-file-backed storage for one page sitemap's entries.
pub mod page_store;
/// The recursion controller: depth bound, cycle detection, filter callbacks.
pub mod recursion;
/// Robots.txt `Sitemap:`/`Site-map:` directive extraction.
pub mod robots;
/// Plain-text page-list parsing.
pub mod text;
/// XML dispatch and the concrete sitemapindex/urlset/RSS/Atom parsers.
pub mod xml;

pub use client::{FetchFailure, FetchResponse, ReqwestWebClient, WebClient};
pub use config::{ClientConfig, EngineConfig};
pub use entity::{AlternateLink, ChangeFrequency, ImageEntry, NewsStory, SitemapEntity, SitemapEntry};
pub use error::{Error, Result};
pub use orchestrator::{sitemap_from_str, sitemap_tree_for_homepage};
pub use page_store::PageStore;
pub use recursion::{ListFilter, RecursionFilters, UrlFilter};
