//! End-to-end resolution for one part number.

use std::sync::Arc;
use std::time::Duration;

use mfrscout_core::{AppConfig, ManufacturerCatalog, ResolutionResult, SearchResult};
use mfrscout_search::{PageFetcher, RenderRequest, Renderer, SearchProvider};

use crate::address::resolve_address;
use crate::error::{ResolveError, StageMiss};
use crate::extract::{extract_from_page, name_from_title, validate_name};
use crate::filter::classify_result;
use crate::locality::extract_locality;
use crate::scorer::{evidence_blob, EvidenceScorer};
use crate::state::{PipelineState, Stage, StateTracker};
use crate::strategy::NameStrategy;

const DEFAULT_RENDER_SEARCH_URL: &str = "https://www.arrow.com/en/products/search";
const DEFAULT_RENDER_TARGET_SELECTOR: &str = ".Product-SimplifiedSummary-SubHeading-Manufacturer";
const RENDERED_NAME_SUFFIX: &str = "Co., Ltd.";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Name strategies in the order they are tried.
    pub strategies: Vec<NameStrategy>,
    pub candidate_limit: usize,
    pub evidence_limit: usize,
    pub snippet_limit: usize,
    pub address_result_limit: usize,
    /// Pause between consecutive candidate page fetches.
    pub inter_request_delay: Duration,
    pub render_search_url: String,
    pub render_target_selector: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            strategies: vec![NameStrategy::Page],
            candidate_limit: 8,
            evidence_limit: 10,
            snippet_limit: 5,
            address_result_limit: 5,
            inter_request_delay: Duration::from_millis(500),
            render_search_url: DEFAULT_RENDER_SEARCH_URL.to_string(),
            render_target_selector: DEFAULT_RENDER_TARGET_SELECTOR.to_string(),
        }
    }
}

impl PipelineOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            candidate_limit: config.candidate_limit,
            address_result_limit: config.address_result_limit,
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<NameStrategy>) -> Self {
        self.strategies = strategies;
        self
    }
}

/// A finished resolution and how far the pipeline got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub result: ResolutionResult,
    /// Always terminal: `Done` or `Aborted`.
    pub state: PipelineState,
}

#[derive(Debug)]
struct NameFound {
    name: String,
    /// Address published alongside the name in structured data.
    address: Option<String>,
    strategy: NameStrategy,
}

/// Sequences candidate search, filtering, name extraction, address lookup
/// and locality extraction.
///
/// Cheap to share behind an `Arc`; independent `resolve` calls may run
/// concurrently.
pub struct Pipeline {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    renderer: Option<Arc<dyn Renderer>>,
    scorer: EvidenceScorer,
    options: PipelineOptions,
}

impl Pipeline {
    /// The catalog's variant matchers are compiled here, once.
    #[must_use]
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        catalog: &ManufacturerCatalog,
        options: PipelineOptions,
    ) -> Self {
        Self {
            search,
            fetcher,
            renderer: None,
            scorer: EvidenceScorer::new(catalog),
            options,
        }
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Resolve manufacturer name, address and locality for `part_number`.
    ///
    /// Stages that find nothing leave their field `None` and end the run
    /// early; the partial result is still returned.
    ///
    /// # Errors
    ///
    /// [`ResolveError::SearchUnavailable`] only when every configured name
    /// strategy failed because the search provider was unreachable.
    pub async fn resolve(&self, part_number: &str) -> Result<Resolution, ResolveError> {
        let part_number = part_number.trim();
        let mut tracker = StateTracker::new(part_number);
        let mut result = ResolutionResult::empty(part_number);

        if part_number.is_empty() {
            let state = tracker.abort(Stage::Name, StageMiss::NoCandidate);
            return Ok(Resolution { result, state });
        }

        // Step 1: manufacturer name.
        let found = match self.resolve_name(part_number, &mut tracker).await {
            Ok(found) => found,
            Err(misses) => {
                if !misses.is_empty() && misses.iter().all(|m| *m == StageMiss::SearchUnavailable)
                {
                    let tried: Vec<&str> =
                        self.options.strategies.iter().map(|s| s.as_str()).collect();
                    return Err(ResolveError::SearchUnavailable {
                        part_number: part_number.to_string(),
                        reason: format!("tried {}", tried.join(", ")),
                    });
                }
                let reason = misses.last().copied().unwrap_or(StageMiss::NoNameFound);
                tracing::info!(part_number, %reason, "no manufacturer name found");
                let state = tracker.abort(Stage::Name, reason);
                return Ok(Resolution { result, state });
            }
        };
        tracing::info!(
            part_number,
            manufacturer = %found.name,
            strategy = %found.strategy,
            "manufacturer name resolved"
        );
        tracker.advance(PipelineState::NameResolved);
        result.manufacturer_name = Some(found.name.clone());

        // Step 2: address, unless structured data already carried one.
        let address = if let Some(address) = found.address {
            tracing::debug!(part_number, "using structured-data address");
            address
        } else {
            match resolve_address(
                self.search.as_ref(),
                &found.name,
                self.options.address_result_limit,
            )
            .await
            {
                Ok(Some(address)) => address,
                Ok(None) => {
                    tracing::info!(part_number, manufacturer = %found.name, "no address found");
                    let state = tracker.abort(Stage::Address, StageMiss::NoAddressFound);
                    return Ok(Resolution { result, state });
                }
                Err(e) => {
                    tracing::warn!(
                        part_number,
                        provider = self.search.name(),
                        error = %e,
                        "address search failed"
                    );
                    let state = tracker.abort(Stage::Address, StageMiss::SearchUnavailable);
                    return Ok(Resolution { result, state });
                }
            }
        };
        tracker.advance(PipelineState::AddressResolved);

        // Step 3: locality.
        let locality = extract_locality(&address);
        result.manufacturer_address = Some(address);
        let Some(locality) = locality else {
            tracing::info!(part_number, "address has no city/country pair");
            let state = tracker.abort(Stage::Locality, StageMiss::NoLocalityFound);
            return Ok(Resolution { result, state });
        };
        result.city_country = Some(locality);
        tracker.advance(PipelineState::LocalityExtracted);
        tracker.advance(PipelineState::Done);

        Ok(Resolution {
            result,
            state: tracker.state(),
        })
    }

    /// Try each strategy in order; on failure return every miss reason.
    async fn resolve_name(
        &self,
        part_number: &str,
        tracker: &mut StateTracker<'_>,
    ) -> Result<NameFound, Vec<StageMiss>> {
        let mut misses = Vec::with_capacity(self.options.strategies.len());

        for &strategy in &self.options.strategies {
            let outcome = match strategy {
                NameStrategy::Page => self.name_from_pages(part_number, tracker).await,
                NameStrategy::Evidence => self.name_from_evidence(part_number, tracker).await,
                NameStrategy::Snippet => self.name_from_snippets(part_number, tracker).await,
                NameStrategy::Rendered => self.name_from_render(part_number, tracker).await,
            };
            match outcome {
                Ok(found) => return Ok(found),
                Err(miss) => {
                    tracing::debug!(part_number, %strategy, reason = %miss, "name strategy missed");
                    misses.push(miss);
                }
            }
        }

        Err(misses)
    }

    async fn search_or_miss(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, StageMiss> {
        self.search.search(query, limit).await.map_err(|e| {
            tracing::warn!(
                provider = self.search.name(),
                query,
                error = %e,
                "search failed"
            );
            StageMiss::SearchUnavailable
        })
    }

    async fn name_from_pages(
        &self,
        part_number: &str,
        tracker: &mut StateTracker<'_>,
    ) -> Result<NameFound, StageMiss> {
        let query = format!("\"{part_number}\"");
        let limit = self.options.candidate_limit;

        let results = self.search_or_miss(&query, limit).await?;
        tracker.advance(PipelineState::CandidatesFetched);

        let mut candidates: Vec<SearchResult> = results
            .into_iter()
            .filter(|r| r.url.is_some())
            .filter(|r| {
                let decision = classify_result(r);
                if !decision.is_accepted() {
                    tracing::debug!(
                        part_number,
                        url = r.url.as_deref().unwrap_or_default(),
                        ?decision,
                        "skipping distributor candidate"
                    );
                }
                decision.is_accepted()
            })
            .collect();

        if candidates.is_empty() {
            tracing::info!(part_number, "no clean candidates, retrying unfiltered");
            // A failed retry counts as no candidates.
            candidates = match self.search_or_miss(&query, limit).await {
                Ok(results) => results.into_iter().filter(|r| r.url.is_some()).collect(),
                Err(_) => Vec::new(),
            };
        }
        tracker.advance(PipelineState::Filtered);

        if candidates.is_empty() {
            return Err(StageMiss::NoCandidate);
        }

        let mut fetched_any = false;
        let mut last_miss = StageMiss::NoNameFound;
        for (i, candidate) in candidates.iter().enumerate() {
            let Some(url) = candidate.url.as_deref() else {
                continue;
            };
            if i > 0 && !self.options.inter_request_delay.is_zero() {
                tokio::time::sleep(self.options.inter_request_delay).await;
            }

            let html = match self.fetcher.fetch(url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::debug!(part_number, url, error = %e, "candidate fetch failed");
                    continue;
                }
            };
            fetched_any = true;

            match extract_from_page(&html, &candidate.title, part_number) {
                Ok(extraction) => {
                    tracing::debug!(
                        part_number,
                        url,
                        source = extraction.source.as_str(),
                        "name extracted from candidate"
                    );
                    return Ok(NameFound {
                        name: extraction.name,
                        address: extraction.address,
                        strategy: NameStrategy::Page,
                    });
                }
                Err(miss) => last_miss = miss,
            }
        }

        Err(if fetched_any {
            last_miss
        } else {
            StageMiss::FetchFailed
        })
    }

    async fn name_from_evidence(
        &self,
        part_number: &str,
        tracker: &mut StateTracker<'_>,
    ) -> Result<NameFound, StageMiss> {
        let query = format!("\"{part_number}\" manufacturer datasheet");
        let results = self
            .search_or_miss(&query, self.options.evidence_limit)
            .await?;
        tracker.advance(PipelineState::CandidatesFetched);
        if results.is_empty() {
            return Err(StageMiss::NoCandidate);
        }

        let evidence = self
            .scorer
            .score(&evidence_blob(&results))
            .ok_or(StageMiss::NoNameFound)?;
        tracing::debug!(
            part_number,
            canonical = %evidence.canonical,
            count = evidence.count,
            "evidence winner"
        );
        let name = validate_name(&evidence.canonical).ok_or(StageMiss::NoNameFound)?;
        Ok(NameFound {
            name,
            address: None,
            strategy: NameStrategy::Evidence,
        })
    }

    async fn name_from_snippets(
        &self,
        part_number: &str,
        tracker: &mut StateTracker<'_>,
    ) -> Result<NameFound, StageMiss> {
        let query = format!("\"{part_number}\" manufacturer");
        let results = self
            .search_or_miss(&query, self.options.snippet_limit)
            .await?;
        tracker.advance(PipelineState::CandidatesFetched);
        if results.is_empty() {
            return Err(StageMiss::NoCandidate);
        }

        let name = results
            .iter()
            .find_map(|r| name_from_title(&r.title, part_number))
            .ok_or(StageMiss::NoNameFound)?;
        Ok(NameFound {
            name,
            address: None,
            strategy: NameStrategy::Snippet,
        })
    }

    async fn name_from_render(
        &self,
        part_number: &str,
        tracker: &mut StateTracker<'_>,
    ) -> Result<NameFound, StageMiss> {
        let Some(renderer) = &self.renderer else {
            tracing::warn!(part_number, "rendered strategy configured without a renderer");
            return Err(StageMiss::RenderFailed);
        };

        let url = reqwest::Url::parse_with_params(
            &self.options.render_search_url,
            &[("q", part_number)],
        )
        .map_err(|e| {
            tracing::warn!(url = %self.options.render_search_url, error = %e, "bad render search url");
            StageMiss::RenderFailed
        })?;
        let request = RenderRequest {
            url: url.to_string(),
            target_selector: self.options.render_target_selector.clone(),
            follow_link_containing: Some(part_number.to_lowercase()),
        };

        match renderer.element_text(&request).await {
            Ok(Some(text)) => {
                // The rendered listing is the only candidate; nothing to filter.
                tracker.advance(PipelineState::CandidatesFetched);
                tracker.advance(PipelineState::Filtered);
                let name = validate_name(&text.replace(RENDERED_NAME_SUFFIX, ""))
                    .ok_or(StageMiss::NoNameFound)?;
                Ok(NameFound {
                    name,
                    address: None,
                    strategy: NameStrategy::Rendered,
                })
            }
            Ok(None) => Err(StageMiss::NoNameFound),
            Err(e) => {
                tracing::warn!(part_number, url = %request.url, error = %e, "render failed");
                Err(StageMiss::RenderFailed)
            }
        }
    }
}
