//! `<meta>` tag lookups for the metadata name tier.

use std::sync::LazyLock;

use mfrscout_search::html::decode_entities;
use regex::Regex;

static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static PROPERTY_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("property"));
static NAME_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("name"));
static CONTENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("content"));

/// Attribute that identifies which `<meta>` tag is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Property,
    Name,
}

impl MetaKey {
    fn regex(self) -> &'static Regex {
        match self {
            Self::Property => &PROPERTY_ATTR_RE,
            Self::Name => &NAME_ATTR_RE,
        }
    }
}

/// `attr="..."` or `attr='...'`, with whitespace before the name so that
/// `data-content=` is not read as `content=`.
fn attr_regex(attr: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)\s{attr}\s*=\s*(?:"([^"]*)"|'([^']*)')"#
    ))
    .expect("valid attribute regex")
}

/// Publisher-ish name from page metadata.
///
/// `og:site_name`, then `og:brand`, then `<meta name="publisher">`. A tag
/// with an empty `content` does not count.
#[must_use]
pub fn publisher_name(html: &str) -> Option<String> {
    find_meta_content(html, MetaKey::Property, "og:site_name")
        .or_else(|| find_meta_content(html, MetaKey::Property, "og:brand"))
        .or_else(|| find_meta_content(html, MetaKey::Name, "publisher"))
}

/// `content` of the first `<meta>` whose `key` attribute equals `key_value`
/// (case-insensitive) and whose content is non-empty.
#[must_use]
pub fn find_meta_content(html: &str, key: MetaKey, key_value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let found = extract_attr(tag, key.regex())?;
        if found.eq_ignore_ascii_case(key_value) {
            extract_attr(tag, &CONTENT_ATTR_RE)
                .map(|c| decode_entities(&c).trim().to_string())
                .filter(|c| !c.is_empty())
        } else {
            None
        }
    })
}

fn extract_attr(tag: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_name_wins_over_publisher() {
        let html = r#"<head>
            <meta name="publisher" content="Some Publisher">
            <meta property="og:site_name" content="Murata Manufacturing">
        </head>"#;
        assert_eq!(publisher_name(html).as_deref(), Some("Murata Manufacturing"));
    }

    #[test]
    fn brand_is_used_when_site_name_missing() {
        let html = r#"<meta content="KEMET" property="og:brand" />"#;
        assert_eq!(publisher_name(html).as_deref(), Some("KEMET"));
    }

    #[test]
    fn empty_site_name_falls_through_to_publisher() {
        let html = r#"<meta property="og:site_name" content=""><meta name='publisher' content='Nexperia'>"#;
        assert_eq!(publisher_name(html).as_deref(), Some("Nexperia"));
    }

    #[test]
    fn entities_in_content_are_decoded() {
        let html = r#"<meta property="og:site_name" content="AVX &amp; Kyocera">"#;
        assert_eq!(publisher_name(html).as_deref(), Some("AVX & Kyocera"));
    }

    #[test]
    fn no_meta_means_none() {
        assert_eq!(publisher_name("<html><title>x</title></html>"), None);
    }

    #[test]
    fn key_match_is_case_insensitive() {
        let html = r#"<META PROPERTY="OG:SITE_NAME" CONTENT="Yageo">"#;
        assert_eq!(find_meta_content(html, MetaKey::Property, "og:site_name").as_deref(), Some("Yageo"));
    }

    #[test]
    fn apostrophe_inside_double_quoted_content_is_kept() {
        let html = r#"<meta property="og:site_name" content="Murata's Official Store">"#;
        assert_eq!(publisher_name(html).as_deref(), Some("Murata's Official Store"));
    }

    #[test]
    fn double_quote_inside_single_quoted_content_is_kept() {
        let html = r#"<meta property='og:brand' content='The "Vishay" Group'>"#;
        assert_eq!(publisher_name(html).as_deref(), Some(r#"The "Vishay" Group"#));
    }

    #[test]
    fn prefixed_attributes_are_not_mistaken_for_content() {
        let html =
            r#"<meta property="og:site_name" data-content="tracker" content="Nexperia">"#;
        assert_eq!(publisher_name(html).as_deref(), Some("Nexperia"));
    }

    #[test]
    fn prefixed_key_attribute_does_not_select_the_tag() {
        let html = r#"<meta data-property="og:site_name" content="tracker">
            <meta name="publisher" content="Bourns">"#;
        assert_eq!(publisher_name(html).as_deref(), Some("Bourns"));
    }
}
