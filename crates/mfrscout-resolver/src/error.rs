use std::fmt;

use thiserror::Error;

/// The only failure surfaced to callers. Everything else degrades to a
/// partial [`ResolutionResult`](mfrscout_core::ResolutionResult).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("search unavailable for {part_number}: every name strategy failed ({reason})")]
    SearchUnavailable { part_number: String, reason: String },
}

/// Why a stage produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMiss {
    SearchUnavailable,
    FetchFailed,
    RenderFailed,
    ParseFailed,
    NoCandidate,
    NoNameFound,
    NoAddressFound,
    NoLocalityFound,
}

impl StageMiss {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SearchUnavailable => "search_unavailable",
            Self::FetchFailed => "fetch_failed",
            Self::RenderFailed => "render_failed",
            Self::ParseFailed => "parse_failed",
            Self::NoCandidate => "no_candidate",
            Self::NoNameFound => "no_name_found",
            Self::NoAddressFound => "no_address_found",
            Self::NoLocalityFound => "no_locality_found",
        }
    }
}

impl fmt::Display for StageMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
