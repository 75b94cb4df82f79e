//! Sitepulse: live crawl metrics over WebSocket
//!
//! This crate implements a web crawler that walks a site from a seed URL and
//! streams cumulative load metrics to subscribed viewers, one crawl session
//! per named channel.

pub mod config;
pub mod crawler;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for Sitepulse operations
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitepulse operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlEvent, EventKind, FetchOutcome, Metrics};
pub use server::SessionManager;
pub use url::{extract_hostname, same_site};
