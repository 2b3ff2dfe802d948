//! Notion API access.
//!
//! This module contains the submodules that talk to the Notion REST API:
//!
//! # Submodules
//!
//! - [`client`]: Authenticated HTTP client with backoff retry logic
//! - [`query`]: Pulls archived article records out of the articles database
//! - [`publish`]: Creates the weekly issue page from converted blocks
//!
//! # Common Patterns
//!
//! All calls go through [`client::NotionClient`], which owns the bearer
//! token and the `Notion-Version` header and retries transient failures
//! with exponential backoff. Failures surface as `Box<dyn Error>` and are
//! logged at the call site; a failed publish never destroys locally
//! generated output.

pub mod client;
pub mod publish;
pub mod query;

/// Title property shared by the articles and publish databases.
pub const PROP_TITLE: &str = "Title";
/// Rich-text property holding the curator's summary.
pub const PROP_SUMMARY: &str = "Summary";
/// URL property pointing at the original article.
pub const PROP_URL: &str = "URL";
/// Multi-select property with the curator's category label.
pub const PROP_CATEGORY: &str = "Category";
/// Select property with the importance rating.
pub const PROP_IMPORTANCE: &str = "Importance";
/// Date property recording when the article was archived.
pub const PROP_ADDED: &str = "Added";
/// Multi-select property with topic tags.
pub const PROP_TAGS: &str = "Tags";
/// Select property tracking the curation state.
pub const PROP_STATUS: &str = "Status";
/// Status select value that makes an article eligible for an issue.
pub const STATUS_ARCHIVED: &str = "Archived";
