//! DuckDuckGo HTML-endpoint search provider.
//!
//! The `html.duckduckgo.com/html/` endpoint serves plain server-rendered
//! markup, so results can be read with a couple of regexes instead of a
//! browser. Each organic hit is a `result__a` anchor (title + redirect link)
//! followed by a `result__snippet` element.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use mfrscout_core::SearchResult;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use reqwest::{Client, StatusCode};

use crate::error::SearchError;
use crate::html::{clean_text, decode_entities};
use crate::provider::SearchProvider;
use crate::rate_limit::retry_with_backoff;

static RESULT_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<a\b([^>]*\bclass\s*=\s*["'][^"']*\bresult__a\b[^"']*["'][^>]*)>(.*?)</a>"#,
    )
    .expect("valid result anchor regex")
});
static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(a|div|td)\b[^>]*\bclass\s*=\s*["'][^"']*\bresult__snippet\b[^"']*["'][^>]*>(.*?)</(?:a|div|td)>"#,
    )
    .expect("valid snippet regex")
});
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bhref\s*=\s*["']([^"']+)["']"#).expect("valid href regex")
});

/// Markers of DuckDuckGo's bot-check interstitial.
const ANOMALY_MARKERS: [&str; 2] = ["anomaly-modal", "anomaly.js"];

pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl DuckDuckGoSearch {
    /// Creates a provider against `endpoint` (normally
    /// `https://html.duckduckgo.com/html/`).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    fn query_url(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        format!("{}?q={encoded}", self.endpoint)
    }

    async fn search_once(&self, url: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0);
            return Err(SearchError::RateLimited { retry_after_secs });
        }
        // DuckDuckGo answers bot checks with 202 and an interstitial page.
        if !status.is_success() || status == StatusCode::ACCEPTED {
            return Err(SearchError::Unavailable(format!(
                "unexpected HTTP status {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        if ANOMALY_MARKERS.iter().any(|m| body.contains(m)) {
            return Err(SearchError::Unavailable(
                "bot-check page returned instead of results".to_string(),
            ));
        }

        Ok(parse_results(&body, limit))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let url = self.query_url(query);
        let url = url.as_str();
        let results = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.search_once(url, limit)
        })
        .await?;
        tracing::debug!(query, count = results.len(), "search completed");
        Ok(results)
    }
}

/// Parse organic results out of a DuckDuckGo HTML results page.
pub(crate) fn parse_results(html: &str, limit: usize) -> Vec<SearchResult> {
    let anchors: Vec<_> = RESULT_ANCHOR_RE.captures_iter(html).collect();
    let snippets: Vec<_> = SNIPPET_RE.captures_iter(html).collect();

    let mut results = Vec::new();
    for (i, anchor) in anchors.iter().enumerate() {
        if results.len() >= limit {
            break;
        }
        let (Some(whole), Some(attrs), Some(inner)) = (anchor.get(0), anchor.get(1), anchor.get(2))
        else {
            continue;
        };

        let href = HREF_RE
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .map(|m| decode_entities(m.as_str()));
        // Sponsored slots link through the ad click tracker.
        if href.as_deref().is_some_and(|h| h.contains("duckduckgo.com/y.js")) {
            continue;
        }

        let block_end = anchors
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |m| m.start());
        let snippet = snippets
            .iter()
            .filter_map(|s| s.get(0).zip(s.get(2)))
            .find(|(whole_snippet, _)| {
                whole_snippet.start() >= whole.end() && whole_snippet.start() < block_end
            })
            .map(|(_, text)| clean_text(text.as_str()))
            .unwrap_or_default();

        let title = clean_text(inner.as_str());
        if title.is_empty() && snippet.is_empty() {
            continue;
        }

        results.push(SearchResult {
            title,
            url: href.as_deref().and_then(resolve_target_url),
            snippet,
        });
    }
    results
}

/// Unwrap DuckDuckGo's `/l/?uddg=<target>` redirect into the target URL.
fn resolve_target_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_owned()
    };
    let parsed = reqwest::Url::parse(&absolute).ok()?;

    let is_redirect = parsed
        .host_str()
        .is_some_and(|h| h.ends_with("duckduckgo.com"))
        && parsed.path().starts_with("/l/");
    if is_redirect {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
            .filter(|v| v.starts_with("http"));
    }

    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

#[cfg(test)]
#[path = "duckduckgo_test.rs"]
mod tests;
