//! Headquarters address lookup via a second search pass.

use mfrscout_core::SearchResult;
use mfrscout_search::{SearchError, SearchProvider};

/// Street tokens plus a few manufacturing-hub place names. Matched as
/// case-insensitive substrings.
pub const ADDRESS_KEYWORDS: [&str; 13] = [
    "Street", "St", "Road", "Rd", "Ave", "Avenue", "Tokyo", "Japan", "Osaka", "San Jose", "CA",
    "Suwon", "Maetan-ro",
];

#[must_use]
pub fn address_query(manufacturer: &str) -> String {
    format!("{manufacturer} headquarters address")
}

/// Whether a snippet has a digit and at least one address keyword.
#[must_use]
pub fn looks_like_address(snippet: &str) -> bool {
    let has_digit = snippet.chars().any(char::is_numeric);
    if !has_digit {
        return false;
    }
    let lowered = snippet.to_lowercase();
    ADDRESS_KEYWORDS
        .iter()
        .any(|k| lowered.contains(&k.to_lowercase()))
}

/// Pick the address snippet from ranked results.
///
/// The first snippet that [`looks_like_address`] wins; otherwise the first
/// result's snippet is returned as a low-confidence answer. Empty results
/// or an empty fallback snippet give `None`.
#[must_use]
pub fn select_address(results: &[SearchResult]) -> Option<String> {
    if let Some(hit) = results.iter().find(|r| looks_like_address(&r.snippet)) {
        return Some(hit.snippet.trim().to_string());
    }
    let fallback = results.first()?.snippet.trim();
    if fallback.is_empty() {
        return None;
    }
    tracing::debug!(snippet = fallback, "no address-shaped snippet, using first result");
    Some(fallback.to_string())
}

/// Search for `manufacturer`'s headquarters and select an address snippet.
///
/// # Errors
///
/// Propagates the provider's [`SearchError`]; the caller decides whether
/// that is fatal.
pub async fn resolve_address(
    search: &dyn SearchProvider,
    manufacturer: &str,
    limit: usize,
) -> Result<Option<String>, SearchError> {
    let results = search.search(&address_query(manufacturer), limit).await?;
    if results.is_empty() {
        tracing::debug!(manufacturer, "address search returned no results");
        return Ok(None);
    }
    Ok(select_address(&results))
}
