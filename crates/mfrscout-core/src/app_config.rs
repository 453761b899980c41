use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub search_endpoint: String,
    pub search_timeout_secs: u64,
    pub search_max_retries: u32,
    pub search_retry_backoff_base_secs: u64,
    pub fetch_timeout_secs: u64,
    pub render_timeout_secs: u64,
    /// Rotated per page fetch; never empty.
    pub user_agents: Vec<String>,
    pub candidate_limit: usize,
    pub address_result_limit: usize,
    pub inter_request_delay_ms: u64,
    pub max_concurrent_parts: usize,
    pub chrome_path: Option<PathBuf>,
}
