//! Distributor / marketplace noise filter for search candidates.

use mfrscout_core::SearchResult;

/// Domains that list parts without being their manufacturer.
pub const HOST_BLACKLIST: [&str; 10] = [
    "youtube.com",
    "youtu.be",
    "digikey.com",
    "mouser.com",
    "arrow.com",
    "rs-online.com",
    "aliexpress.com",
    "amazon.com",
    "ebay.com",
    "wikipedia.org",
];

/// Title tokens that betray a distributor page. Also used to reject
/// extracted names that are really a distributor's self-reference.
pub const TOKEN_BLACKLIST: [&str; 7] = [
    "digi-key",
    "digikey",
    "mouser",
    "arrow",
    "rs components",
    "rs-online",
    "distributor",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    DistributorHost,
    DistributorToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateDecision {
    Accepted,
    Rejected(RejectReason),
}

impl CandidateDecision {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Classify a candidate by its host and title.
///
/// Host is checked first; a blacklisted host rejects regardless of title.
#[must_use]
pub fn classify(host: &str, title: &str) -> CandidateDecision {
    let host = host.to_lowercase();
    if HOST_BLACKLIST.iter().any(|b| host.contains(b)) {
        return CandidateDecision::Rejected(RejectReason::DistributorHost);
    }
    let title = title.to_lowercase();
    if TOKEN_BLACKLIST.iter().any(|t| title.contains(t)) {
        return CandidateDecision::Rejected(RejectReason::DistributorToken);
    }
    CandidateDecision::Accepted
}

/// Classify a search result using the host of its URL.
#[must_use]
pub fn classify_result(result: &SearchResult) -> CandidateDecision {
    classify(&host_of(result.url.as_deref()), &result.title)
}

/// Lower-cased host of `url`; empty when absent or unparseable.
#[must_use]
pub fn host_of(url: Option<&str>) -> String {
    url.and_then(|u| reqwest::Url::parse(u).ok())
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

/// Whether `name` is exactly a distributor token (case-insensitive).
#[must_use]
pub fn is_blacklisted_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    TOKEN_BLACKLIST.iter().any(|t| *t == lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_blacklisted_host_is_rejected_regardless_of_title() {
        for host in HOST_BLACKLIST {
            for title in ["", "Samsung Electro-Mechanics", "CL10C330JB8NNNC datasheet"] {
                assert_eq!(
                    classify(&format!("www.{host}"), title),
                    CandidateDecision::Rejected(RejectReason::DistributorHost),
                    "host {host} with title {title:?}"
                );
            }
        }
    }

    #[test]
    fn host_match_is_case_insensitive() {
        assert_eq!(
            classify("WWW.MOUSER.COM", "anything"),
            CandidateDecision::Rejected(RejectReason::DistributorHost)
        );
    }

    #[test]
    fn every_blacklisted_token_in_title_is_rejected_regardless_of_host() {
        for token in TOKEN_BLACKLIST {
            for host in ["www.samsungsem.com", "", "datasheets.example.org"] {
                let title = format!("CL10C330JB8NNNC - {} listing", token.to_uppercase());
                assert_eq!(
                    classify(host, &title),
                    CandidateDecision::Rejected(RejectReason::DistributorToken),
                    "token {token} with host {host:?}"
                );
            }
        }
    }

    #[test]
    fn manufacturer_page_is_accepted() {
        assert!(classify("www.samsungsem.com", "CL10C330JB8NNNC | Samsung Electro-Mechanics")
            .is_accepted());
    }

    #[test]
    fn classify_result_uses_url_host() {
        let r = SearchResult::new("Part", Some("https://www.digikey.com/en/products/x"), "");
        assert_eq!(
            classify_result(&r),
            CandidateDecision::Rejected(RejectReason::DistributorHost)
        );
    }

    #[test]
    fn host_of_handles_missing_and_bad_urls() {
        assert_eq!(host_of(None), "");
        assert_eq!(host_of(Some("not a url")), "");
        assert_eq!(host_of(Some("https://Shop.Example.COM:8080/a")), "shop.example.com");
    }

    #[test]
    fn blacklisted_name_requires_exact_token() {
        assert!(is_blacklisted_name(" Mouser "));
        assert!(is_blacklisted_name("Digi-Key"));
        assert!(!is_blacklisted_name("Murata"));
        assert!(!is_blacklisted_name("Arrow Electronics"));
    }
}
