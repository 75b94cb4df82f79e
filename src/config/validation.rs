use crate::config::types::{ChannelConfig, Config, ServerConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_channels(&config.channels)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.bind_address.is_empty() {
        return Err(ConfigError::Validation(
            "bind_address cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "port must be non-zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates the channel table
fn validate_channels(channels: &[ChannelConfig]) -> Result<(), ConfigError> {
    if channels.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[channel]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for channel in channels {
        validate_channel_name(&channel.name)?;

        if !seen.insert(channel.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate channel name '{}'",
                channel.name
            )));
        }

        let url = Url::parse(&channel.seed_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid seed URL '{}' for channel '{}': {}",
                channel.seed_url, channel.name, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use an HTTP(S) scheme",
                channel.seed_url
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                channel.seed_url
            )));
        }
    }

    Ok(())
}

/// Validates a channel name: non-empty, alphanumeric + hyphens only
fn validate_channel_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "channel name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "channel name must contain only alphanumeric characters and hyphens, got '{}'",
            name
        )));
    }

    Ok(())
}
