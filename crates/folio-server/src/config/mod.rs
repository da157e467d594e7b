//! Server configuration.
//!
//! This module provides configuration management for the Folio server.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use folio_common::{FolioError, DEFAULT_HOST, DEFAULT_PORT};
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (error, warn, info, debug, trace).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Deadline in milliseconds for acquiring the store's write lock from a
    /// request. Absent means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout_ms: Option<u64>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            write_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Converts configuration to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the socket address.
    pub fn parsed_addr(&self) -> Result<SocketAddr, FolioError> {
        self.socket_addr()
            .parse()
            .map_err(|e| FolioError::invalid_config(format!("{}: {e}", self.socket_addr())))
    }

    /// Returns the write-lock deadline, if one is configured.
    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<(), FolioError> {
        self.parsed_addr()?;
        if self.write_timeout_ms == Some(0) {
            return Err(FolioError::invalid_config(
                "write_timeout_ms must be positive; omit it to wait indefinitely",
            ));
        }
        Ok(())
    }

    /// Creates a builder for configuration.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::new()
    }
}

/// Builder for server configuration.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Sets the write-lock deadline in milliseconds.
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = Some(ms);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.write_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .host("127.0.0.1")
            .port(9090)
            .log_level("debug")
            .write_timeout_ms(250)
            .build();

        assert_eq!(config.socket_addr(), "127.0.0.1:9090");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.write_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_to_toml() {
        let config = ServerConfig::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("host"));
        assert!(toml.contains("port"));
        assert!(!toml.contains("write_timeout_ms"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("foliod.toml");

        let config = ServerConfig::builder()
            .host("testhost")
            .port(9999)
            .write_timeout_ms(100)
            .build();

        config.save(&path).unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("foliod.toml");
        std::fs::write(&path, "port = 3000\n").unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.port, 3000);
        assert_eq!(loaded.host, "0.0.0.0");
        assert_eq!(loaded.log_level, "info");
    }

    #[test]
    fn test_validate() {
        let config = ServerConfig::builder().host("not a host").build();
        assert!(matches!(
            config.validate(),
            Err(FolioError::InvalidConfig { .. })
        ));

        let config = ServerConfig::builder().write_timeout_ms(0).build();
        assert!(config.validate().is_err());
    }
}
