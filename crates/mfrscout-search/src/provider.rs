//! Collaborator contracts consumed by the resolver.
//!
//! Each trait has an HTTP-backed implementation in this crate; tests and
//! alternative backends plug in their own.

use async_trait::async_trait;
use mfrscout_core::SearchResult;

use crate::error::{FetchError, RenderError, SearchError};

/// Text web search.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Run `query` and return at most `limit` results in rank order.
    ///
    /// Zero hits is `Ok(vec![])`; an unreachable provider is an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// Raw HTML retrieval for a candidate URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// What to read from a page that only renders client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub url: String,
    /// CSS selector of the element whose text is wanted.
    pub target_selector: String,
    /// When the target is missing on the first page, follow the first link
    /// whose `href` contains this fragment and look again.
    pub follow_link_containing: Option<String>,
}

/// Browser-driven page reader.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Text content of the target element, or `None` when it never appears.
    async fn element_text(&self, request: &RenderRequest) -> Result<Option<String>, RenderError>;
}
