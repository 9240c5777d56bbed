use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub bind_addr: SocketAddr,
    /// Server-side only. Never sent to clients.
    pub google_places_api_key: Option<String>,
    pub google_base_url: String,
    pub upstream_timeout_secs: u64,
    pub rate_limit_per_minute: usize,
    /// Base URL of the places proxy, including the `/api` prefix.
    pub api_url: String,
    pub client_timeout_secs: u64,
    pub search_radius_meters: u32,
    pub debounce_ms: u64,
}

impl AppConfig {
    /// The upstream key, required by the proxy server only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `GOOGLE_PLACES_API_KEY` is
    /// unset or blank.
    pub fn require_google_api_key(&self) -> Result<&str, ConfigError> {
        self.google_places_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_PLACES_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("bind_addr", &self.bind_addr)
            .field(
                "google_places_api_key",
                &self.google_places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("google_base_url", &self.google_base_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("api_url", &self.api_url)
            .field("client_timeout_secs", &self.client_timeout_secs)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("debounce_ms", &self.debounce_ms)
            .finish()
    }
}
