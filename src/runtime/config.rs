//! Site configuration.

use serde::{Deserialize, Serialize};

pub const ENV_HOST: &str = "HOMEPAGE_HOST";
pub const ENV_PORT: &str = "HOMEPAGE_PORT";
pub const ENV_TITLE: &str = "HOMEPAGE_TITLE";

/// Startup configuration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Variable that failed to load.
    pub key: String,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for the site server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Title rendered into the home page.
    pub title: String,
    /// Whether to serve `/_health`.
    pub enable_health: bool,
    /// Whether to serve the JSON route listing at `/_routes`.
    pub enable_routes: bool,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            title: "Home".to_string(),
            enable_health: true,
            enable_routes: false,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `HOMEPAGE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| ConfigError {
                key: ENV_PORT.to_string(),
                message: format!("'{}' is not a valid port", port),
            })?;
        }
        if let Some(title) = lookup(ENV_TITLE) {
            config.title = title;
        }
        Ok(config)
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn enable_health(mut self, enabled: bool) -> Self {
        self.enable_health = enabled;
        self
    }

    pub fn enable_routes(mut self, enabled: bool) -> Self {
        self.enable_routes = enabled;
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
