//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Configuration file read when no explicit path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "REFDATA_GATEWAY_CONFIG";

/// Prefix for structured environment overrides (`REFDATA_GATEWAY__SERVER__HOST`)
pub const ENV_PREFIX: &str = "REFDATA_GATEWAY";

/// Plain listening-port variable, applied last
pub const PORT_ENV: &str = "PORT";

/// Reference-data API the gateway proxies by default
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://test-services.interact.technology/rest/refdata";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream reference-data API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30000
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from the configured file and environment variables
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_port(path, std::env::var(PORT_ENV).ok())
    }

    /// Load settings, letting `port` (the raw `PORT` value) override `server.port`
    pub fn load_with_port<P: AsRef<Path>>(path: P, port: Option<String>) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("upstream.base_url", default_base_url())?
            .set_default("upstream.timeout_ms", default_timeout() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port.filter(|p| !p.trim().is_empty()))?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        let base_url = self.upstream.base_url.trim();
        if base_url.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Upstream base URL cannot be empty".to_string(),
            )));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Upstream base URL '{}' must use http or https",
                base_url
            ))));
        }

        if self.upstream.timeout_ms == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Upstream timeout cannot be 0".to_string(),
            )));
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Invalid log format '{}'. Must be 'json' or 'pretty'",
                self.logging.format
            ))));
        }

        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
