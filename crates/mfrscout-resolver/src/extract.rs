//! Manufacturer name extraction from one candidate.
//!
//! Tiers run in fixed order and stop at the first that yields a non-empty
//! name: structured data, page metadata, then the search-result title. The
//! winning name must still pass [`validate_name`]; if it does not, the
//! candidate is skipped rather than falling through to a later tier.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::StageMiss;
use crate::filter::is_blacklisted_name;
use crate::meta::publisher_name;
use crate::structured::{first_match, parse_json_ld_blocks};

static TITLE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\||-|\bby\b").expect("valid title split regex"));
static TITLE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:by\s)?([A-Z][a-zA-Z\s.&-]+)").expect("valid title name regex")
});

/// Which tier produced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    StructuredData,
    Metadata,
    Title,
}

impl NameSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StructuredData => "structured_data",
            Self::Metadata => "metadata",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtraction {
    pub name: String,
    pub source: NameSource,
    /// Address from the structured-data tier, kept even when the name came
    /// from a later tier.
    pub address: Option<String>,
}

/// Run the tiers over a fetched page and its search-result title.
///
/// # Errors
///
/// [`StageMiss::ParseFailed`] when no tier produced a name and at least one
/// JSON-LD block could not be parsed; [`StageMiss::NoNameFound`] otherwise.
pub fn extract_from_page(
    html: &str,
    title: &str,
    part_number: &str,
) -> Result<PageExtraction, StageMiss> {
    let parsed = parse_json_ld_blocks(html);
    let structured = first_match(&parsed.values);
    let address = structured.as_ref().and_then(|s| s.address.clone());

    let (raw, source) = if let Some(name) = structured.and_then(|s| s.name) {
        (name, NameSource::StructuredData)
    } else if let Some(name) = publisher_name(html) {
        (name, NameSource::Metadata)
    } else if let Some(name) = title_tier(title, part_number) {
        (name, NameSource::Title)
    } else if parsed.failed_blocks > 0 {
        tracing::debug!(
            part_number,
            failed_blocks = parsed.failed_blocks,
            "no name and JSON-LD unparseable"
        );
        return Err(StageMiss::ParseFailed);
    } else {
        tracing::debug!(part_number, "no tier produced a name");
        return Err(StageMiss::NoNameFound);
    };

    let Some(name) = validate_name(&raw) else {
        tracing::debug!(part_number, name = %raw, source = source.as_str(), "name failed validation");
        return Err(StageMiss::NoNameFound);
    };

    Ok(PageExtraction {
        name,
        source,
        address,
    })
}

/// Title tier: drop the part number, keep the text before the first `|`,
/// `-`, or the word `by`.
#[must_use]
pub fn title_tier(title: &str, part_number: &str) -> Option<String> {
    let stripped = strip_part_number(title, part_number);
    let head = TITLE_SPLIT_RE
        .split(&stripped)
        .next()
        .unwrap_or_default()
        .trim();
    if head.is_empty() || is_blacklisted_name(head) {
        return None;
    }
    Some(head.to_string())
}

/// Title-only extractor for result lists without fetched pages.
///
/// Matches a capitalized run at the start of the title (after an optional
/// leading `by `), e.g. `"ERJ-2RKF2201X by Panasonic Industry | Arrow.com"`
/// gives `"Panasonic Industry"`.
#[must_use]
pub fn name_from_title(title: &str, part_number: &str) -> Option<String> {
    let stripped = strip_part_number(title, part_number);
    let captured = TITLE_NAME_RE
        .captures(stripped.trim())
        .and_then(|c| c.get(1))?
        .as_str()
        .replace('|', "");
    validate_name(&captured)
}

/// Trimmed name if it is at least two characters and not a distributor
/// token.
#[must_use]
pub fn validate_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.chars().count() < 2 || is_blacklisted_name(trimmed) {
        return None;
    }
    Some(trimmed.to_string())
}

fn strip_part_number(title: &str, part_number: &str) -> String {
    if part_number.is_empty() {
        title.to_string()
    } else {
        title.replace(part_number, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PN: &str = "CL10C330JB8NNNC";

    fn jsonld(block: &str) -> String {
        format!(r#"<script type="application/ld+json">{block}</script>"#)
    }

    #[test]
    fn structured_data_beats_metadata_and_title() {
        let html = format!(
            r#"<meta property="og:site_name" content="Site Name">{}"#,
            jsonld(r#"{"@type":"Product","manufacturer":{"name":"Samsung Electro-Mechanics"}}"#)
        );
        let got = extract_from_page(&html, "Title Co | x", PN).expect("name");
        assert_eq!(got.name, "Samsung Electro-Mechanics");
        assert_eq!(got.source, NameSource::StructuredData);
        assert_eq!(got.address, None);
    }

    #[test]
    fn metadata_used_when_no_structured_name() {
        let html = r#"<meta name="publisher" content="Vishay Intertechnology">"#;
        let got = extract_from_page(html, "ignored", PN).expect("name");
        assert_eq!(got.name, "Vishay Intertechnology");
        assert_eq!(got.source, NameSource::Metadata);
    }

    #[test]
    fn metadata_name_with_apostrophe_is_not_truncated() {
        let html = r#"<meta property="og:site_name" content="Murata's Official Store">"#;
        let got = extract_from_page(html, "ignored", PN).expect("name");
        assert_eq!(got.name, "Murata's Official Store");
    }

    #[test]
    fn structured_address_survives_when_name_comes_from_title() {
        let html = jsonld(
            r#"{"@type":"Organization","address":{"streetAddress":"1 Rd","addressCountry":"US"}}"#,
        );
        let got = extract_from_page(&html, &format!("{PN} Kemet - capacitors"), PN).expect("name");
        assert_eq!(got.name, "Kemet");
        assert_eq!(got.source, NameSource::Title);
        assert_eq!(got.address.as_deref(), Some("1 Rd, US"));
    }

    #[test]
    fn invalid_structured_name_skips_candidate_without_falling_through() {
        let html = format!(
            r#"<meta property="og:site_name" content="Good Name">{}"#,
            jsonld(r#"{"@type":"Organization","name":"Mouser"}"#)
        );
        assert_eq!(
            extract_from_page(&html, "Other Title", PN),
            Err(StageMiss::NoNameFound)
        );
    }

    #[test]
    fn single_character_name_is_rejected() {
        let html = r#"<meta property="og:site_name" content="X">"#;
        assert_eq!(extract_from_page(html, "", PN), Err(StageMiss::NoNameFound));
    }

    #[test]
    fn title_tier_takes_text_before_first_separator() {
        assert_eq!(
            title_tier(&format!("{PN} Murata by Someone | Shop"), PN).as_deref(),
            Some("Murata")
        );
        assert_eq!(title_tier("Yageo - RC0402 resistors", "RC0402").as_deref(), Some("Yageo"));
        assert_eq!(
            title_tier("Nearby Components | BYV26", "BYV26").as_deref(),
            Some("Nearby Components")
        );
    }

    #[test]
    fn title_tier_rejects_empty_and_blacklisted_heads() {
        assert_eq!(title_tier(&format!("{PN} | Samsung Electro-Mechanics"), PN), None);
        assert_eq!(title_tier(&format!("Mouser | {PN}"), PN), None);
    }

    #[test]
    fn empty_page_and_title_yield_nothing() {
        assert_eq!(
            extract_from_page("<html></html>", PN, PN),
            Err(StageMiss::NoNameFound)
        );
    }

    #[test]
    fn broken_json_ld_without_other_tiers_is_a_parse_failure() {
        let html = jsonld("{ not json");
        assert_eq!(extract_from_page(&html, PN, PN), Err(StageMiss::ParseFailed));
    }

    #[test]
    fn companion_extractor_handles_by_prefix() {
        assert_eq!(
            name_from_title("ERJ-2RKF2201X by Panasonic Industry | Arrow.com", "ERJ-2RKF2201X")
                .as_deref(),
            Some("Panasonic Industry")
        );
    }

    #[test]
    fn companion_extractor_needs_capitalized_start() {
        assert_eq!(name_from_title("datasheet for ERJ-2RKF2201X", "ERJ-2RKF2201X"), None);
    }

    #[test]
    fn companion_extractor_applies_validation_gate() {
        assert_eq!(name_from_title("Arrow | ERJ-2RKF2201X", "ERJ-2RKF2201X"), None);
    }

    #[test]
    fn validate_name_trims() {
        assert_eq!(validate_name("  TDK  ").as_deref(), Some("TDK"));
        assert_eq!(validate_name(" "), None);
        assert_eq!(validate_name("digikey"), None);
    }
}
