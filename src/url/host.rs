use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the hostname from a URL string
///
/// Only HTTP(S) URLs with a host are accepted; `mailto:`, `data:`,
/// protocol handlers, and relative references all fail here and are
/// skipped by the caller. The returned hostname is lowercase.
///
/// # Arguments
///
/// * `url_str` - The URL string to extract the hostname from
///
/// # Returns
///
/// * `Ok(String)` - The lowercase hostname
/// * `Err(UrlError)` - The URL is malformed, has no host, or uses a
///   non-HTTP(S) scheme
///
/// # Examples
///
/// ```
/// use sitepulse::url::extract_hostname;
///
/// let host = extract_hostname("https://Example.COM/path").unwrap();
/// assert_eq!(host, "example.com");
///
/// assert!(extract_hostname("mailto:admin@example.com").is_err());
/// ```
pub fn extract_hostname(url_str: &str) -> UrlResult<String> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    url.host_str()
        .map(|h| h.to_lowercase())
        .ok_or(UrlError::MissingHost)
}

/// Tests whether `candidate` belongs to the site rooted at `site_host`.
///
/// The rule is substring containment: the crawl's hostname must contain
/// the candidate hostname. This is looser than exact-host equality: a
/// crawl of `www.example.com` accepts `example.com`, but it also accepts
/// any host whose name happens to be a substring (e.g. `ample.com`).
/// Kept as-is for compatibility with the behavior this tool replaces;
/// see DESIGN.md.
pub fn same_site(site_host: &str, candidate: &str) -> bool {
    site_host.contains(candidate)
}
