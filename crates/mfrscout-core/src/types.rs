use serde::{Deserialize, Serialize};

/// One normalized hit from a search pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: Option<String>,
    pub snippet: String,
}

impl SearchResult {
    #[must_use]
    pub fn new(title: impl Into<String>, url: Option<&str>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.map(str::to_owned),
            snippet: snippet.into(),
        }
    }
}

/// Terminal output of one resolution.
///
/// `None` fields mean the pipeline reached (or could not reach) that stage
/// without producing anything usable. The part number is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub part_number: String,
    pub manufacturer_name: Option<String>,
    pub manufacturer_address: Option<String>,
    pub city_country: Option<String>,
}

impl ResolutionResult {
    #[must_use]
    pub fn empty(part_number: &str) -> Self {
        Self {
            part_number: part_number.to_owned(),
            manufacturer_name: None,
            manufacturer_address: None,
            city_country: None,
        }
    }
}
