//! HTTP fetcher implementation
//!
//! This module performs the single GET request behind every crawled page,
//! measures wall-clock latency around the network call, and folds every
//! transport failure into a [`FetchOutcome`] instead of propagating it.

use reqwest::Client;
use std::time::{Duration, Instant};

/// Result of attempting to load one URL.
///
/// Exactly one outcome is produced per fetch attempt, whether the request
/// succeeded, came back with an HTTP error status, or never connected.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The URL that was fetched
    pub url: String,

    /// HTTP status code; absent when the failure happened below HTTP
    /// (DNS, connect, TLS)
    pub status: Option<u16>,

    /// Wall-clock load time; present only when a complete response was
    /// received, whatever its status
    pub duration_millis: Option<u64>,

    /// Response body; present only on a complete response
    pub body: Option<String>,

    /// True for network/transport errors, independent of HTTP status
    pub failed: bool,
}

impl FetchOutcome {
    /// True when the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(s) if (200..300).contains(&s))
    }
}

/// Builds the HTTP client used for one crawl run
///
/// Redirects are followed transparently, so 3xx statuses only surface
/// when the redirect limit is exhausted or the target is not followable.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("sitepulse/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, never propagating transport errors
///
/// The duration covers the request and the full body read. On a send
/// failure the outcome carries whatever partial metadata reqwest exposes
/// (a status code, if one was received) and no duration; a body-read
/// failure is likewise treated as a transport failure.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let start = Instant::now();

    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            match response.text().await {
                Ok(body) => FetchOutcome {
                    url: url.to_string(),
                    status: Some(status),
                    duration_millis: Some(start.elapsed().as_millis() as u64),
                    body: Some(body),
                    failed: false,
                },
                Err(e) => {
                    tracing::debug!("Body read failed for {}: {}", url, e);
                    FetchOutcome {
                        url: url.to_string(),
                        status: Some(status),
                        duration_millis: None,
                        body: None,
                        failed: true,
                    }
                }
            }
        }
        Err(e) => {
            tracing::debug!("Request failed for {}: {}", url, e);
            FetchOutcome {
                url: url.to_string(),
                status: e.status().map(|s| s.as_u16()),
                duration_millis: None,
                body: None,
                failed: true,
            }
        }
    }
}
