//! Crawler module for web page fetching and metrics aggregation
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with wall-clock latency measurement
//! - Anchor-tag link extraction
//! - Running metrics aggregation
//! - Depth-first crawl orchestration and event emission

mod engine;
mod events;
mod fetcher;
mod metrics;
mod parser;

pub use engine::CrawlEngine;
pub use events::{CrawlEvent, EventKind};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use metrics::Metrics;
pub use parser::extract_links;
