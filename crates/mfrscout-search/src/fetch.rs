//! Plain HTTP page fetcher with user-agent rotation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;
use crate::provider::PageFetcher;

const BROWSER_FALLBACK_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Fetches candidate pages, rotating through the configured user agents.
///
/// Each call starts from the next agent in the list so consecutive requests
/// to the same site do not share a fingerprint. When a response is not
/// usable HTML the remaining agents are tried once before giving up.
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
    next_agent: AtomicUsize,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agents: &[String]) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| FetchError::Http {
                url: String::new(),
                source,
            })?;

        let mut user_agents: Vec<String> = user_agents
            .iter()
            .filter(|ua| !ua.trim().is_empty())
            .cloned()
            .collect();
        if user_agents.is_empty() {
            user_agents.push(BROWSER_FALLBACK_UA.to_string());
        }

        // Start the rotation at a random offset so parallel processes spread out.
        let start = rand::random_range(0..user_agents.len());

        Ok(Self {
            client,
            user_agents,
            next_agent: AtomicUsize::new(start),
        })
    }

    fn rotation(&self) -> impl Iterator<Item = &str> {
        let len = self.user_agents.len();
        let start = self.next_agent.fetch_add(1, Ordering::Relaxed) % len;
        (0..len).map(move |i| self.user_agents[(start + i) % len].as_str())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error: Option<FetchError> = None;

        for ua in self.rotation() {
            let response = match self
                .client
                .get(url)
                .header(reqwest::header::USER_AGENT, ua)
                .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(source) => {
                    // Transport failures will not improve with a different agent.
                    return Err(FetchError::Http {
                        url: url.to_owned(),
                        source,
                    });
                }
            };

            let status = response.status();
            if !status.is_success() {
                last_error = Some(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
                continue;
            }

            let body = response.text().await.map_err(|source| FetchError::Http {
                url: url.to_owned(),
                source,
            })?;
            match unusable_reason(&body) {
                None => return Ok(body),
                Some(reason) => {
                    tracing::debug!(url, user_agent = ua, reason, "page body unusable");
                    last_error = Some(FetchError::Unusable {
                        url: url.to_owned(),
                        reason,
                    });
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::Unusable {
            url: url.to_owned(),
            reason: "no user agent produced a response",
        }))
    }
}

fn unusable_reason(body: &str) -> Option<&'static str> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Some("empty body");
    }
    if looks_like_bot_challenge(trimmed) {
        return Some("bot challenge page");
    }
    None
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}
