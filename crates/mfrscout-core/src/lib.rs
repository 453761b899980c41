//! Shared configuration, reference data, and result types for mfrscout.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod types;

pub use app_config::AppConfig;
pub use catalog::{load_catalog, CatalogEntry, ManufacturerCatalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{ResolutionResult, SearchResult};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read manufacturer catalog at {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config validation failed: {0}")]
    Validation(String),
}
