//! Headless Chrome renderer for listing sites that build their pages
//! client-side.
//!
//! `headless_chrome` is blocking, so each render runs on a blocking thread
//! with its own browser process. The `Browser` is owned by that closure and
//! dropped (killing Chrome) on every exit path, including the case where
//! the async caller has already given up on the timeout.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};

use crate::error::RenderError;
use crate::provider::{RenderRequest, Renderer};

/// How long to wait for the target on the first page before treating it as
/// a results list.
const PRODUCT_PAGE_WAIT: Duration = Duration::from_secs(5);
/// How long to wait for the product link and then the target after clicking.
const NAVIGATION_WAIT: Duration = Duration::from_secs(10);

pub struct ChromeRenderer {
    timeout_secs: u64,
    chrome_path: Option<PathBuf>,
}

impl ChromeRenderer {
    #[must_use]
    pub fn new(timeout_secs: u64, chrome_path: Option<PathBuf>) -> Self {
        Self {
            timeout_secs,
            chrome_path,
        }
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn element_text(&self, request: &RenderRequest) -> Result<Option<String>, RenderError> {
        let request_owned = request.clone();
        let chrome_path = self.chrome_path.clone();
        let handle =
            tokio::task::spawn_blocking(move || render_blocking(&request_owned, chrome_path));

        match tokio::time::timeout(Duration::from_secs(self.timeout_secs), handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(RenderError::Session(format!(
                "render task panicked or was cancelled: {join_err}"
            ))),
            Err(_) => Err(RenderError::Timeout {
                url: request.url.clone(),
                timeout_secs: self.timeout_secs,
            }),
        }
    }
}

fn render_blocking(
    request: &RenderRequest,
    chrome_path: Option<PathBuf>,
) -> Result<Option<String>, RenderError> {
    let session = |e: &dyn std::fmt::Display| RenderError::Session(e.to_string());

    let is_container = std::path::Path::new("/.dockerenv").exists();
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(!is_container)
        .path(chrome_path)
        .build()
        .map_err(|e| session(&e))?;
    let browser = Browser::new(options).map_err(|e| session(&e))?;

    let tab = browser.new_tab().map_err(|e| session(&e))?;
    tab.navigate_to(&request.url).map_err(|e| session(&e))?;
    tab.wait_until_navigated().map_err(|e| session(&e))?;

    if let Ok(element) =
        tab.wait_for_element_with_custom_timeout(&request.target_selector, PRODUCT_PAGE_WAIT)
    {
        tracing::debug!(url = %request.url, "target element found on first page");
        return Ok(normalize_text(&element.get_inner_text().map_err(|e| session(&e))?));
    }

    let Some(fragment) = request.follow_link_containing.as_deref() else {
        return Ok(None);
    };

    tracing::debug!(url = %request.url, fragment, "target missing, following product link");
    let link_selector = href_contains_selector(fragment);
    let Ok(link) = tab.wait_for_element_with_custom_timeout(&link_selector, NAVIGATION_WAIT)
    else {
        tracing::debug!(url = %request.url, selector = %link_selector, "no product link matched");
        return Ok(None);
    };
    link.click().map_err(|e| session(&e))?;

    match tab.wait_for_element_with_custom_timeout(&request.target_selector, NAVIGATION_WAIT) {
        Ok(element) => Ok(normalize_text(
            &element.get_inner_text().map_err(|e| session(&e))?,
        )),
        Err(_) => Ok(None),
    }
}

fn normalize_text(raw: &str) -> Option<String> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// `a[href*='...']` with `fragment` escaped as a CSS string.
fn href_contains_selector(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("a[href*='{escaped}']")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_selector_for_plain_part_number() {
        assert_eq!(
            href_contains_selector("cl10c330jb8nnnc"),
            "a[href*='cl10c330jb8nnnc']"
        );
    }

    #[test]
    fn link_selector_escapes_quotes_and_backslashes() {
        assert_eq!(href_contains_selector("o'neil"), r"a[href*='o\'neil']");
        assert_eq!(href_contains_selector(r"a\b"), r"a[href*='a\\b']");
    }

    #[test]
    fn whitespace_is_collapsed_and_blank_text_is_none() {
        assert_eq!(
            normalize_text("  Samsung\n  Electro-Mechanics "),
            Some("Samsung Electro-Mechanics".to_string())
        );
        assert_eq!(normalize_text(" \n\t"), None);
    }
}
