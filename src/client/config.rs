//! Client configuration options.

use std::time::Duration;

/// Configuration for the Strava client.
///
/// # Example
///
/// ```
/// use strava_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for API requests. Overridable for tests.
    pub api_base_url: String,
    /// Request timeout, passed through to the HTTP client.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Whether to refresh expired access tokens automatically before a
    /// request. Requires the session to carry refresh credentials.
    pub auto_refresh_token: bool,
    /// Buffer time (in seconds) before expiry at which to refresh.
    pub refresh_buffer_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.strava.com/api/v3".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("strava-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            auto_refresh_token: true,
            refresh_buffer_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable automatic token refresh.
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh_token = enabled;
        self
    }

    /// Set the buffer time before expiry at which to refresh.
    pub fn with_refresh_buffer(mut self, secs: i64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "https://www.strava.com/api/v3");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.auto_refresh_token);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new()
            .with_api_base_url("http://127.0.0.1:9999")
            .with_auto_refresh(false);
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert!(!config.auto_refresh_token);
    }
}
