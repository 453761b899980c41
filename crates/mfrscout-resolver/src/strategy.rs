use std::fmt;
use std::str::FromStr;

/// A way of finding the manufacturer name. The pipeline tries its
/// configured strategies in order and keeps the first valid name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameStrategy {
    /// Fetch candidate pages and run the tiered extractor on each.
    Page,
    /// Count catalog variants across a result list.
    Evidence,
    /// Read a capitalized name straight from result titles.
    Snippet,
    /// Read the manufacturer element of a client-rendered listing page.
    Rendered,
}

impl NameStrategy {
    pub const ALL: [Self; 4] = [Self::Page, Self::Evidence, Self::Snippet, Self::Rendered];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Evidence => "evidence",
            Self::Snippet => "snippet",
            Self::Rendered => "rendered",
        }
    }

    /// Parse a comma-separated list, dropping duplicates but keeping order.
    ///
    /// # Errors
    ///
    /// Returns the offending token when it names no strategy, or a message
    /// when the list is empty.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, String> {
        let mut out = Vec::new();
        for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let strategy = token.parse::<Self>()?;
            if !out.contains(&strategy) {
                out.push(strategy);
            }
        }
        if out.is_empty() {
            return Err("at least one name strategy is required".to_string());
        }
        Ok(out)
    }
}

impl fmt::Display for NameStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown name strategy {s:?} (expected page, evidence, snippet or rendered)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("Evidence".parse::<NameStrategy>(), Ok(NameStrategy::Evidence));
        assert!("scrape".parse::<NameStrategy>().is_err());
    }

    #[test]
    fn list_keeps_order_and_drops_duplicates() {
        assert_eq!(
            NameStrategy::parse_list("snippet, page,snippet"),
            Ok(vec![NameStrategy::Snippet, NameStrategy::Page])
        );
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(NameStrategy::parse_list(" , ").is_err());
    }
}
