//! Configuration module
//!
//! Reads TOML configuration from `~/.config/roaming-hub/config.toml`
//! (override with `ROAMING_HUB_CONFIG`). Missing or malformed files fall
//! back to defaults at the call site.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub inventory: InventoryConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct InventoryConfig {
    /// JSON inventory document loaded at startup (optional)
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Attach console and disk sinks to every registered event
    pub default_sinks: bool,
    /// Directory for the disk sink's JSON-lines files
    pub log_directory: PathBuf,
    /// TCP endpoint for the network sink (optional)
    pub network_sink: Option<String>,
    /// Per-delivery timeout for the network sink
    pub network_timeout_ms: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            default_sinks: true,
            log_directory: PathBuf::from("events"),
            network_sink: None,
            network_timeout_ms: 2000,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roaming-hub")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("parses");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.events.default_sinks);
        assert!(cfg.inventory.seed_file.is_none());
    }

    #[test]
    fn partial_config_overrides_selected_fields() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [events]
            default_sinks = false
            network_sink = "127.0.0.1:5140"
            "#,
        )
        .expect("parses");

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(!cfg.events.default_sinks);
        assert_eq!(cfg.events.network_sink.as_deref(), Some("127.0.0.1:5140"));
        assert_eq!(cfg.server.address(), "0.0.0.0:9090");
    }
}
