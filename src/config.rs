//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "RALLY_SCORE_CONFIG_PATH";
/// Capacity of the public SSE broadcast channel.
const DEFAULT_SSE_CAPACITY: usize = 32;
/// Upper bound on simultaneously open scoreboards.
const DEFAULT_MAX_SESSIONS: usize = 64;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    sse_capacity: usize,
    max_sessions: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        sse_capacity = app_config.sse_capacity,
                        max_sessions = app_config.max_sessions,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Capacity of the public SSE channel.
    pub fn sse_capacity(&self) -> usize {
        self.sse_capacity
    }

    /// Maximum number of sessions kept at once.
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Override the session limit. Zero keeps the current limit.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        if max_sessions > 0 {
            self.max_sessions = max_sessions;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sse_capacity: DEFAULT_SSE_CAPACITY,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    sse_capacity: Option<usize>,
    #[serde(default)]
    max_sessions: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            sse_capacity: value
                .sse_capacity
                .filter(|&capacity| capacity > 0)
                .unwrap_or(defaults.sse_capacity),
            max_sessions: value
                .max_sessions
                .filter(|&limit| limit > 0)
                .unwrap_or(defaults.max_sessions),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
