//! Configuration management for jukebot
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use jukebot::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `JUKEBOT__<section>__<key>`
//!
//! Examples:
//! - `JUKEBOT__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `JUKEBOT__CATALOG__PLAYLIST_NAME=Office Radio`
//! - `JUKEBOT__SEARCH__DEFAULT_PAGE_SIZE=5`
//!
//! Secrets are only read from `SPOTIFY_CLIENT_SECRET`, `LINE_ACCESS_TOKEN`
//! (or `LINE_CHANNEL_ACCESS_TOKEN`) and `LINE_CHANNEL_SECRET`.
//!
//! The plain names `SPOTIFY_CLIENT_ID`, `SPOTIFY_CALLBACK`, `SPOTIFY_REDIRECT_URI`,
//! `SPOTIFY_USER_ID`, `SPOTIFY_PLAYLIST_NAME`, `LINE_MESSAGING_API` and `PORT`
//! are accepted too. They rank below the TOML file and `JUKEBOT__*`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/jukebot.toml`.
//! This can be overridden using the `JUKEBOT_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    CatalogConfig, ChatConfig, Config, SearchConfig, ServerConfig, TelemetryConfig,
};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`JUKEBOT__*`, plus the secrets)
    /// 2. TOML file (default: `config/jukebot.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - A required setting or secret is missing or invalid
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        validation::validate_secrets(&config)?;
        Ok(config)
    }

    /// Load and validate settings without requiring the secrets
    ///
    /// For commands that never talk to either upstream, such as printing the
    /// authorization URL.
    pub fn load_settings() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files. Secrets are not
    /// read or required.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[catalog]
client_id = "abc"
account_id = "owner"
redirect_uri = "http://localhost:3000/spotify"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.catalog.client_id, "abc");
        assert_eq!(config.search.default_page_size, 10);
    }

    #[test]
    fn test_validation_catches_missing_account() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[catalog]
client_id = "abc"
redirect_uri = "http://localhost:3000/spotify"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::MissingSetting {
                field: "catalog.account_id"
            })
        ));
    }

    #[test]
    fn test_full_config_example() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:8080"
max_payload_bytes = 524288
webhook_path = "/webhook"
callback_path = "/auth/callback"

[catalog]
client_id = "abc"
account_id = "owner"
redirect_uri = "https://bot.example.com/auth/callback"
playlist_name = "Anti FoMO"
scopes = "playlist-read-private playlist-modify-private"
request_timeout_secs = 5

[chat]
api_base_url = "https://api.line.me/v2/bot/message"

[search]
default_page_size = 8

[telemetry]
log_filter = "jukebot=debug,tower_http=info"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.server.max_payload_bytes, 512 * 1024);
        assert_eq!(config.server.callback_path, "/auth/callback");
        assert_eq!(config.catalog.playlist_name, "Anti FoMO");
        assert_eq!(config.catalog.request_timeout_secs, 5);
        assert_eq!(config.search.default_page_size, 8);
        assert_eq!(config.telemetry.log_filter, "jukebot=debug,tower_http=info");
    }
}
