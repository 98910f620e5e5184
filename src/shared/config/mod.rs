//! Application configuration module
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! environment variables. Each layer only overrides the keys it sets.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_BROADCAST_CAPACITY: usize = 1000;
pub const DEFAULT_LOG_FILTER: &str = "info,boardsync=debug";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to bind
    pub port: u16,
    /// PostgreSQL URL; the in-memory store is used when absent
    pub database_url: Option<String>,
    /// Capacity of the realtime broadcast channel
    pub broadcast_capacity: usize,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Allow cross-origin requests from any origin
    pub cors_allow_any: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            database_url: None,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            cors_allow_any: true,
        }
    }
}

/// Keys accepted in the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<IpAddr>,
    port: Option<u16>,
    database_url: Option<String>,
    broadcast_capacity: Option<usize>,
    log_filter: Option<String>,
    cors_allow_any: Option<bool>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Overlay values from a TOML document.
    pub fn merge_toml(mut self, source: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(url) = file.database_url {
            self.database_url = Some(url);
        }
        if let Some(capacity) = file.broadcast_capacity {
            self.broadcast_capacity = capacity;
        }
        if let Some(filter) = file.log_filter {
            self.log_filter = filter;
        }
        if let Some(allow) = file.cors_allow_any {
            self.cors_allow_any = allow;
        }
        Ok(self)
    }

    /// Overlay values from environment variables, read through `lookup`.
    ///
    /// Recognised keys: `SERVER_HOST`, `SERVER_PORT`, `DATABASE_URL`,
    /// `BROADCAST_CAPACITY`, `RUST_LOG`, `CORS_ALLOW_ANY`.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_HOST", host))?;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port))?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(capacity) = lookup("BROADCAST_CAPACITY") {
            self.broadcast_capacity = capacity
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BROADCAST_CAPACITY", capacity))?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log_filter = filter;
        }
        if let Some(allow) = lookup("CORS_ALLOW_ANY") {
            self.cors_allow_any = matches!(allow.as_str(), "1" | "true" | "yes");
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "broadcast_capacity",
                self.broadcast_capacity.to_string(),
            ));
        }
        if let Some(url) = &self.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    port: Option<u16>,
    database_url: Option<String>,
    broadcast_capacity: Option<usize>,
    log_filter: Option<String>,
}

impl AppConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = Some(capacity);
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            port: self.port.unwrap_or(defaults.port),
            database_url: self.database_url,
            broadcast_capacity: self.broadcast_capacity.unwrap_or(defaults.broadcast_capacity),
            log_filter: self.log_filter.unwrap_or(defaults.log_filter),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse config file: {0}")]
    Parse(String),
}
