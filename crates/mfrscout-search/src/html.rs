//! Regex-based HTML text helpers shared by the search adapters.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid entity regex"));

/// Strip tags, decode common entities, and collapse whitespace.
#[must_use]
pub fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    decode_entities(&no_tags)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the handful of HTML entities that show up in titles and snippets.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(input, |caps: &regex::Captures<'_>| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), |c| c.to_string())
    });
    numeric
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_tags_and_collapses_space() {
        assert_eq!(
            clean_text("<b>CL10C330JB8NNNC</b>\n  Samsung <i>Electro-Mechanics</i>"),
            "CL10C330JB8NNNC Samsung Electro-Mechanics"
        );
    }

    #[test]
    fn decode_entities_handles_named_and_numeric() {
        assert_eq!(decode_entities("AT&amp;T &#39;x&#x27; &quot;y&quot;"), "AT&T 'x' \"y\"");
    }

    #[test]
    fn decode_entities_leaves_invalid_code_points() {
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
    }
}
