use serde::Deserialize;

/// Main configuration structure for Sitepulse
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default, rename = "channel")]
    pub channels: Vec<ChannelConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listener on
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port for the HTTP/WebSocket listener
    pub port: u16,
}

/// A named crawl channel: viewers subscribing to `name` share one crawl
/// session over `seed_url`
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Channel identifier, used as the WebSocket path segment
    pub name: String,

    /// Seed URL the channel's crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
