//! Origin trials client configuration.

use std::time::Duration;

/// Default per-request timeout for origin trials API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the origin trials API.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TrialsConfig {
    /// Base URL of the API, without a trailing slash (e.g. `https://host`).
    pub base_url: String,

    /// API key sent as the `key` query parameter.
    pub api_key: Option<String>,

    /// OAuth access token sent as a bearer `Authorization` header.
    pub access_token: Option<String>,

    /// Timeout applied to each request, connect included.
    pub timeout: Duration,
}

impl TrialsConfig {
    /// Create a config for the given base URL with no credentials and the
    /// default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the bearer access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/security-review-issues:{method}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slashes() {
        let config = TrialsConfig::new("https://trials.example.com//");
        assert_eq!(config.base_url, "https://trials.example.com");
        assert_eq!(
            config.endpoint("verify"),
            "https://trials.example.com/v1/security-review-issues:verify"
        );
    }

    #[test]
    fn builder_methods_set_credentials_and_timeout() {
        let config = TrialsConfig::new("http://localhost")
            .with_api_key("k")
            .with_access_token("t")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.access_token.as_deref(), Some("t"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
