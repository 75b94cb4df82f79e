//! Crawl engine - traversal state and orchestration
//!
//! The engine owns the visited set and the running metrics for one crawl
//! run, drives the fetcher depth-first from the seed URL, and emits one
//! [`CrawlEvent`] per processed URL. Events leave through an mpsc sender,
//! so the engine knows nothing about its consumers.

use crate::crawler::events::{CrawlEvent, EventKind};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::metrics::Metrics;
use crate::crawler::parser::extract_links;
use crate::url::{extract_hostname, resolve_href, same_site};
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// Crawls one site depth-first from a seed URL
///
/// Traversal is sequential: each link is fully handled, including its own
/// subtree, before the next sibling is started, so events appear in
/// fetch-completion order and every URL is fetched at most once. The
/// visited set is the only bound on the traversal; a site generating an
/// unbounded URL space will keep the run alive until its session is torn
/// down.
pub struct CrawlEngine {
    /// The seed URL; root-relative links resolve against it
    seed_url: String,

    /// Hostname fixed from the seed at construction; all same-site
    /// checks compare against it
    hostname: String,

    client: Client,

    /// URLs already dispatched for fetching; inserted before the fetch
    /// so nothing is ever fetched twice
    visited: HashSet<String>,

    metrics: Metrics,

    events: mpsc::UnboundedSender<CrawlEvent>,
}

impl CrawlEngine {
    /// Creates an engine for one crawl run
    ///
    /// # Arguments
    ///
    /// * `seed_url` - The URL the crawl starts from
    /// * `events` - Sender the engine emits [`CrawlEvent`]s into
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Ready to run
    /// * `Err(PulseError)` - The seed URL is unusable or the HTTP client
    ///   could not be built
    pub fn new(seed_url: &str, events: mpsc::UnboundedSender<CrawlEvent>) -> Result<Self> {
        let hostname = extract_hostname(seed_url)?;
        let client = build_http_client()?;

        Ok(Self {
            seed_url: seed_url.to_string(),
            hostname,
            client,
            visited: HashSet::new(),
            metrics: Metrics::default(),
            events,
        })
    }

    /// Runs the crawl to exhaustion
    ///
    /// Returns when no unvisited same-site link remains reachable. The
    /// event stream ends when the engine (and with it the sender) is
    /// dropped.
    pub async fn run(mut self) {
        tracing::info!("Starting crawl of {}", self.seed_url);

        let seed = self.seed_url.clone();
        self.handle(seed).await;

        tracing::info!(
            "Crawl of {} complete: {} URLs visited",
            self.seed_url,
            self.visited.len()
        );
    }

    /// Processes one URL and, on a 2xx response, its whole subtree
    ///
    /// Skips silently when the URL is external or already visited. A
    /// malformed URL is logged and skipped; it never aborts the
    /// traversal.
    fn handle(&mut self, url: String) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let hostname = match extract_hostname(&url) {
                Ok(h) => h,
                Err(e) => {
                    tracing::warn!("Skipping unresolvable link {}: {}", url, e);
                    return;
                }
            };

            if !same_site(&self.hostname, &hostname) {
                tracing::debug!("Skipping external link {}", url);
                return;
            }

            // insert() before the fetch; a repeat of this URL anywhere in
            // the traversal returns false and is dropped here
            if !self.visited.insert(url.clone()) {
                return;
            }

            let outcome = fetch_url(&self.client, &url).await;

            self.metrics = self.metrics.updated(&outcome);
            self.emit(&outcome);

            if outcome.failed {
                // Transport failure is terminal for this subtree only
                return;
            }

            if !outcome.is_success() {
                // HTTP error statuses are reported but never expanded
                return;
            }

            let body = match outcome.body {
                Some(body) => body,
                None => return,
            };

            for href in extract_links(&body) {
                let target = resolve_href(&href, &self.seed_url);
                self.handle(target).await;
            }
        })
    }

    /// Emits the event for one processed outcome
    fn emit(&self, outcome: &FetchOutcome) {
        let kind = if outcome.failed {
            EventKind::Error
        } else {
            EventKind::Load
        };

        let event = CrawlEvent {
            kind,
            url: outcome.url.clone(),
            metrics: self.metrics.clone(),
        };

        if self.events.send(event).is_err() {
            // Receiver is gone; the session is being torn down
            tracing::debug!("Event receiver dropped for crawl of {}", self.seed_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_fixes_hostname_from_seed() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let engine = CrawlEngine::new("https://www.Example.com/start", tx).unwrap();
        assert_eq!(engine.hostname, "www.example.com");
        assert_eq!(engine.seed_url, "https://www.Example.com/start");
    }

    #[test]
    fn test_engine_rejects_hostless_seed() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(CrawlEngine::new("mailto:admin@example.com", tx).is_err());
    }

    #[test]
    fn test_engine_rejects_malformed_seed() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(CrawlEngine::new("not a url", tx).is_err());
    }

    // Traversal behavior (cycles, external links, error subtrees) is
    // covered end-to-end in tests/crawl_tests.rs.
}
