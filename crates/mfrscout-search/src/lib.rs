//! Search, page-fetch, and render adapters for the manufacturer resolver.

pub mod duckduckgo;
pub mod error;
pub mod fetch;
pub mod html;
pub mod provider;
mod rate_limit;
#[cfg(feature = "browser")]
pub mod render;

pub use duckduckgo::DuckDuckGoSearch;
pub use error::{FetchError, RenderError, SearchError};
pub use fetch::HttpFetcher;
pub use provider::{PageFetcher, RenderRequest, Renderer, SearchProvider};
#[cfg(feature = "browser")]
pub use render::ChromeRenderer;
