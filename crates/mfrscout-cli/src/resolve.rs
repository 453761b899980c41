//! `resolve` command: run the pipeline for each part number and print the
//! results.
//!
//! Parts run with bounded concurrency. A part whose search provider was
//! unreachable is logged and left out of the output; the command then exits
//! non-zero after every other part has been printed.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use futures::stream::{self, StreamExt};
use mfrscout_core::{load_catalog, AppConfig, ManufacturerCatalog};
use mfrscout_resolver::{NameStrategy, Pipeline, PipelineOptions, Resolution, ResolveError};
use mfrscout_search::{DuckDuckGoSearch, HttpFetcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Json,
    /// Human-readable block per part
    Text,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Part numbers to resolve
    #[arg(required = true)]
    pub parts: Vec<String>,

    /// Catalog file (defaults to `MFRSCOUT_CATALOG_PATH`)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Comma-separated name strategies, tried in order
    /// (page, evidence, snippet, rendered)
    #[arg(long, default_value = "page")]
    pub strategy: String,

    /// Parts resolved at once (defaults to `MFRSCOUT_MAX_CONCURRENT_PARTS`)
    #[arg(long)]
    pub concurrency: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

pub(crate) async fn run_resolve(config: &AppConfig, args: &ResolveArgs) -> anyhow::Result<()> {
    let strategies = NameStrategy::parse_list(&args.strategy).map_err(anyhow::Error::msg)?;
    let catalog = load_catalog_for(config, args.catalog.as_deref(), &strategies)?;
    let pipeline = build_pipeline(config, &catalog, strategies)?;
    let concurrency = args.concurrency.unwrap_or(config.max_concurrent_parts).max(1);

    let mut outcomes: Vec<(usize, &str, Result<Resolution, ResolveError>)> =
        stream::iter(args.parts.iter().enumerate())
            .map(|(idx, part)| {
                let pipeline = &pipeline;
                async move { (idx, part.as_str(), pipeline.resolve(part).await) }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;
    outcomes.sort_by_key(|(idx, _, _)| *idx);

    let mut unavailable = 0usize;
    for (_, part, outcome) in &outcomes {
        match outcome {
            Ok(resolution) => {
                tracing::info!(part_number = %part, state = %resolution.state, "resolved");
                println!("{}", render(resolution, args.format)?);
            }
            Err(e) => {
                unavailable += 1;
                tracing::error!(part_number = %part, error = %e, "resolution failed");
            }
        }
    }

    if unavailable > 0 {
        anyhow::bail!(
            "{unavailable} of {} part numbers could not be resolved: search unavailable",
            outcomes.len()
        );
    }
    Ok(())
}

/// The evidence strategy needs the catalog; the others can run without it.
fn load_catalog_for(
    config: &AppConfig,
    path: Option<&std::path::Path>,
    strategies: &[NameStrategy],
) -> anyhow::Result<ManufacturerCatalog> {
    let path = path.unwrap_or(&config.catalog_path);
    match load_catalog(path) {
        Ok(catalog) => {
            tracing::debug!(path = %path.display(), entries = catalog.len(), "catalog loaded");
            Ok(catalog)
        }
        Err(e) if !strategies.contains(&NameStrategy::Evidence) => {
            tracing::warn!(error = %e, "continuing without manufacturer catalog");
            Ok(ManufacturerCatalog::default())
        }
        Err(e) => Err(e.into()),
    }
}

fn build_pipeline(
    config: &AppConfig,
    catalog: &ManufacturerCatalog,
    strategies: Vec<NameStrategy>,
) -> anyhow::Result<Pipeline> {
    let search_agent = config.user_agents.first().map_or("", String::as_str);
    let search = DuckDuckGoSearch::new(
        &config.search_endpoint,
        config.search_timeout_secs,
        search_agent,
        config.search_max_retries,
        config.search_retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))?;
    let fetcher = HttpFetcher::new(config.fetch_timeout_secs, &config.user_agents)
        .map_err(|e| anyhow::anyhow!("failed to build page fetcher: {e}"))?;

    let wants_renderer = strategies.contains(&NameStrategy::Rendered);
    let options = PipelineOptions::from_config(config).with_strategies(strategies);
    let pipeline = Pipeline::new(
        Arc::new(search),
        Arc::new(fetcher),
        catalog,
        options,
    );

    Ok(if wants_renderer {
        attach_renderer(pipeline, config)
    } else {
        pipeline
    })
}

#[cfg(feature = "browser")]
fn attach_renderer(pipeline: Pipeline, config: &AppConfig) -> Pipeline {
    let renderer = mfrscout_search::ChromeRenderer::new(
        config.render_timeout_secs,
        config.chrome_path.clone(),
    );
    pipeline.with_renderer(Arc::new(renderer))
}

#[cfg(not(feature = "browser"))]
fn attach_renderer(pipeline: Pipeline, _config: &AppConfig) -> Pipeline {
    tracing::warn!("`rendered` strategy needs a build with the `browser` feature; it will be skipped");
    pipeline
}

pub(crate) fn render(resolution: &Resolution, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(&resolution.result)?),
        OutputFormat::Text => Ok(render_text(resolution)),
    }
}

fn render_text(resolution: &Resolution) -> String {
    let r = &resolution.result;
    let field = |value: Option<&str>| value.unwrap_or("\u{2014}").to_string();
    format!(
        "{}\n  manufacturer: {}\n  address:      {}\n  city/country: {}\n  status:       {}",
        r.part_number,
        field(r.manufacturer_name.as_deref()),
        field(r.manufacturer_address.as_deref()),
        field(r.city_country.as_deref()),
        resolution.state,
    )
}
