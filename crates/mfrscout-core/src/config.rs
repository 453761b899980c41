use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENTS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36|Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("MFRSCOUT_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "MFRSCOUT_CATALOG_PATH",
        "./config/manufacturers.txt",
    ));
    let search_endpoint = or_default(
        "MFRSCOUT_SEARCH_ENDPOINT",
        "https://html.duckduckgo.com/html/",
    );

    let search_timeout_secs = parse_u64("MFRSCOUT_SEARCH_TIMEOUT_SECS", "5")?;
    let search_max_retries = parse_u32("MFRSCOUT_SEARCH_MAX_RETRIES", "1")?;
    let search_retry_backoff_base_secs =
        parse_u64("MFRSCOUT_SEARCH_RETRY_BACKOFF_BASE_SECS", "2")?;
    let fetch_timeout_secs = parse_u64("MFRSCOUT_FETCH_TIMEOUT_SECS", "8")?;
    let render_timeout_secs = parse_u64("MFRSCOUT_RENDER_TIMEOUT_SECS", "30")?;
    let candidate_limit = parse_usize("MFRSCOUT_CANDIDATE_LIMIT", "8")?;
    let address_result_limit = parse_usize("MFRSCOUT_ADDRESS_RESULT_LIMIT", "5")?;
    let inter_request_delay_ms = parse_u64("MFRSCOUT_INTER_REQUEST_DELAY_MS", "500")?;
    let max_concurrent_parts = parse_usize("MFRSCOUT_MAX_CONCURRENT_PARTS", "1")?;

    if max_concurrent_parts == 0 {
        return Err(invalid(
            "MFRSCOUT_MAX_CONCURRENT_PARTS",
            "must be at least 1".to_string(),
        ));
    }

    let user_agents: Vec<String> = or_default("MFRSCOUT_USER_AGENTS", DEFAULT_USER_AGENTS)
        .split('|')
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .map(str::to_string)
        .collect();
    if user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "MFRSCOUT_USER_AGENTS must contain at least one user agent".to_string(),
        ));
    }

    let chrome_path = lookup("MFRSCOUT_CHROME_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        log_level,
        catalog_path,
        search_endpoint,
        search_timeout_secs,
        search_max_retries,
        search_retry_backoff_base_secs,
        fetch_timeout_secs,
        render_timeout_secs,
        user_agents,
        candidate_limit,
        address_result_limit,
        inter_request_delay_ms,
        max_concurrent_parts,
        chrome_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
