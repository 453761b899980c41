//! Evidence scoring: pick the catalog manufacturer best supported by a set of
//! search results.

use mfrscout_core::{ManufacturerCatalog, SearchResult};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub canonical: String,
    /// Number of distinct variants of `canonical` present in the text.
    pub count: usize,
}

/// Titles and snippets of every result, joined with spaces.
#[must_use]
pub fn evidence_blob(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("{} {}", r.title, r.snippet))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole-word matchers for every catalog variant, compiled once per catalog.
#[derive(Debug, Clone, Default)]
pub struct EvidenceScorer {
    entries: Vec<ScoredEntry>,
}

#[derive(Debug, Clone)]
struct ScoredEntry {
    canonical: String,
    variants: Vec<Regex>,
}

impl EvidenceScorer {
    /// Compile one case-insensitive `\b...\b` matcher per variant.
    ///
    /// A variant whose pattern cannot be built is logged and left out.
    #[must_use]
    pub fn new(catalog: &ManufacturerCatalog) -> Self {
        let entries = catalog
            .iter()
            .map(|entry| ScoredEntry {
                canonical: entry.canonical.clone(),
                variants: entry
                    .variants
                    .iter()
                    .filter_map(|variant| word_matcher(variant))
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    /// Score every catalog entry against `blob`.
    ///
    /// Each variant present as a whole word (case-insensitive) adds one to its
    /// canonical name. The strictly highest count wins; on a tie the entry
    /// inserted first into the catalog is kept. `None` when nothing matched.
    #[must_use]
    pub fn score(&self, blob: &str) -> Option<Evidence> {
        let mut best: Option<Evidence> = None;

        for entry in &self.entries {
            let count = entry.variants.iter().filter(|re| re.is_match(blob)).count();
            if count == 0 {
                continue;
            }
            tracing::debug!(canonical = %entry.canonical, count, "catalog entry matched");
            if best.as_ref().is_none_or(|b| count > b.count) {
                best = Some(Evidence {
                    canonical: entry.canonical.clone(),
                    count,
                });
            }
        }

        best
    }
}

fn word_matcher(variant: &str) -> Option<Regex> {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(variant));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(variant, error = %e, "skipping unmatchable catalog variant");
            None
        }
    }
}
