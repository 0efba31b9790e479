//! Config validation.

use super::AppConfig;
use crate::error::ConfigError;
use std::net::SocketAddr;

/// Shortest poll interval accepted
pub const MIN_POLL_INTERVAL_MS: u64 = 50;

/// Validate a complete configuration
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_bind_addr(&config.server.bind_addr)?;
    validate_backend_url(&config.client.backend_url)?;
    validate_poll_interval(config.client.poll_interval_ms)?;
    validate_canvas(config.client.canvas_width, config.client.canvas_height)?;
    validate_noise_probability(config.client.noise_probability)?;
    Ok(())
}

/// Bind address must parse as `host:port`.
pub fn validate_bind_addr(addr: &str) -> Result<(), ConfigError> {
    addr.parse::<SocketAddr>().map(|_| ()).map_err(|e| {
        ConfigError::ValidationFailed(format!("Invalid bind address '{}': {}", addr, e))
    })
}

/// Backend URL must be http(s) with a host.
pub fn validate_backend_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| {
            ConfigError::ValidationFailed(format!(
                "Backend URL must start with http:// or https://, got: {}",
                url
            ))
        })?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(ConfigError::ValidationFailed(format!(
            "Backend URL has no host: {}",
            url
        )));
    }
    Ok(())
}

pub fn validate_poll_interval(interval_ms: u64) -> Result<(), ConfigError> {
    if interval_ms < MIN_POLL_INTERVAL_MS {
        return Err(ConfigError::ValidationFailed(format!(
            "Poll interval must be at least {} ms, got: {}",
            MIN_POLL_INTERVAL_MS, interval_ms
        )));
    }
    Ok(())
}

pub fn validate_canvas(width: usize, height: usize) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::ValidationFailed(format!(
            "Canvas dimensions must be non-zero, got: {}x{}",
            width, height
        )));
    }
    Ok(())
}

pub fn validate_noise_probability(p: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ConfigError::ValidationFailed(format!(
            "Noise probability must be within [0, 1], got: {}",
            p
        )));
    }
    Ok(())
}
