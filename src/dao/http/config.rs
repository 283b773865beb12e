use std::time::Duration;

use super::error::{HttpSinkError, HttpSinkResult};

/// Request timeout used when `RESULTS_TIMEOUT_MS` is not set.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration describing where finished matches are posted.
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    pub endpoint: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl HttpSinkConfig {
    /// Construct a configuration for an explicit endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach basic-auth credentials to the configuration.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Bound every submission request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> HttpSinkResult<Self> {
        let endpoint = std::env::var("RESULTS_URL").map_err(|_| HttpSinkError::MissingEnvVar {
            var: "RESULTS_URL",
        })?;

        let mut config = Self::new(endpoint);

        if let (Some(username), Some(password)) = (
            std::env::var("RESULTS_USERNAME").ok(),
            std::env::var("RESULTS_PASSWORD").ok(),
        ) {
            config = config.with_credentials(username, password);
        }

        if let Some(timeout_ms) = std::env::var("RESULTS_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_credentials_and_timeout() {
        let config = HttpSinkConfig::new("http://results.local/api/save_friendly_game/")
            .with_credentials("scorer", "secret")
            .with_timeout(Duration::from_millis(2500));

        assert_eq!(
            config.endpoint,
            "http://results.local/api/save_friendly_game/"
        );
        assert_eq!(config.username.as_deref(), Some("scorer"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn default_timeout_bounds_requests() {
        let config = HttpSinkConfig::new("http://results.local/");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.username.is_none());
    }
}
