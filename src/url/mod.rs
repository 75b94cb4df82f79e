//! URL handling module for Sitepulse
//!
//! This module provides hostname extraction, same-site matching, and
//! href resolution for discovered links.

mod host;
mod resolve;

// Re-export main functions
pub use host::{extract_hostname, same_site};
pub use resolve::resolve_href;
