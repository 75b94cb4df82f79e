//! Crawl event contract
//!
//! One event is emitted per processed URL, in fetch-completion order,
//! carrying a snapshot of the cumulative metrics at emission time. The
//! `load`/`error` distinction is internal; the wire format viewers see
//! is just `{"url": ..., "metrics": {...}}`.

use crate::crawler::metrics::Metrics;
use serde::Serialize;

/// Whether the URL loaded (any HTTP status) or failed at transport level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An outcome was processed, whether or not it was an HTTP error
    Load,
    /// The fetch itself failed below HTTP
    Error,
}

/// Externally observable notification for one processed URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlEvent {
    /// Load vs. transport failure; not part of the wire format
    #[serde(skip)]
    pub kind: EventKind,

    /// The URL this event reports on
    pub url: String,

    /// Cumulative metrics at the time the outcome was processed
    pub metrics: Metrics,
}
