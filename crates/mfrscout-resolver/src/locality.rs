//! Reduce a free-text address to a trailing `City, Region` pair.

use std::sync::LazyLock;

use regex::Regex;

static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-zA-Z\s-]+,\s*[A-Z][a-zA-Z\s]+").expect("valid locality regex")
});

/// Right-most `Word, Word` pair in `address`, trimmed.
///
/// Every capital letter that starts a word is tried as a match start, from
/// the end of the string backwards, so overlapping pairs are seen:
/// `"150 Maetan-ro, Suwon, South Korea"` gives `"Suwon, South Korea"`.
#[must_use]
pub fn extract_locality(address: &str) -> Option<String> {
    let starts: Vec<usize> = address
        .char_indices()
        .filter(|&(i, c)| c.is_ascii_uppercase() && starts_word(address, i))
        .map(|(i, _)| i)
        .collect();

    starts.into_iter().rev().find_map(|i| {
        PAIR_RE
            .find(&address[i..])
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

fn starts_word(text: &str, idx: usize) -> bool {
    text[..idx]
        .chars()
        .next_back()
        .is_none_or(|prev| !prev.is_alphanumeric() && prev != '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_last_pair() {
        assert_eq!(
            extract_locality("1 Main St, Springfield, Illinois, US").as_deref(),
            Some("Illinois, US")
        );
    }

    #[test]
    fn hyphenated_street_does_not_win() {
        assert_eq!(
            extract_locality("Address: 150 Maetan-ro, Suwon, South Korea").as_deref(),
            Some("Suwon, South Korea")
        );
    }

    #[test]
    fn multi_word_country_is_kept() {
        assert_eq!(
            extract_locality("10-1 Higashikotari, Nagaokakyo, Kyoto Prefecture").as_deref(),
            Some("Nagaokakyo, Kyoto Prefecture")
        );
    }

    #[test]
    fn capital_inside_word_is_not_a_start() {
        assert_eq!(extract_locality("abcKyoto, Osaka"), None);
    }

    #[test]
    fn no_pair_is_none() {
        assert_eq!(extract_locality(""), None);
        assert_eq!(extract_locality("Global leader in passives"), None);
        assert_eq!(extract_locality("123 456, 789"), None);
    }
}
