//! Startup configuration

use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://localhost:7071";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the answer service; the fixed route is appended by
    /// the transport
    pub api_base: String,
    /// Timeout applied to each answer request
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let api_base =
            std::env::var("COLLOQUY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let timeout_secs = std::env::var("COLLOQUY_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_base,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
