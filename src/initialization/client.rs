//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{RelayConfig, RELAY_USER_AGENT};

/// Initializes the client the relay forwards alerts with.
///
/// Configured with:
/// - The relay User-Agent
/// - The whole-request timeout from `config`
/// - A connect timeout of at most 5s, so an unreachable dashboard surfaces
///   as a connect error (retriable) rather than a request timeout
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_forward_client(config: &RelayConfig) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .user_agent(RELAY_USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_forward_client_default_config() {
        let client = init_forward_client(&RelayConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_init_forward_client_zero_timeout() {
        let config = RelayConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(init_forward_client(&config).is_ok());
    }
}
