use super::models::Config;
use crate::pagination::MAX_PAGE_SIZE;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required setting '{field}' is empty")]
    MissingSetting { field: &'static str },

    #[error("Secret '{name}' must be provided through the environment")]
    MissingSecret { name: &'static str },

    #[error("Setting '{field}' must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Route path '{field}' must start with '/', got '{value}'")]
    InvalidPath { field: &'static str, value: String },

    #[error("search.default_page_size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    InvalidPageSize(u32),

    #[error("Timeout must be positive: {field}")]
    InvalidTimeout { field: &'static str },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_catalog(config)?;
    validate_chat(config)?;
    validate_server(config)?;
    validate_search(config)?;
    Ok(())
}

/// Both secrets are needed to actually run; tests that load files directly
/// skip this.
pub fn validate_secrets(config: &Config) -> Result<(), ValidationError> {
    if config.catalog.client_secret.as_deref().is_none_or(str::is_empty) {
        return Err(ValidationError::MissingSecret {
            name: "SPOTIFY_CLIENT_SECRET",
        });
    }
    if config.chat.access_token.as_deref().is_none_or(str::is_empty) {
        return Err(ValidationError::MissingSecret {
            name: "LINE_ACCESS_TOKEN",
        });
    }
    if config.chat.channel_secret.as_deref().is_none_or(str::is_empty) {
        return Err(ValidationError::MissingSecret {
            name: "LINE_CHANNEL_SECRET",
        });
    }
    Ok(())
}

fn validate_catalog(config: &Config) -> Result<(), ValidationError> {
    let catalog = &config.catalog;

    require("catalog.client_id", &catalog.client_id)?;
    require("catalog.account_id", &catalog.account_id)?;
    require("catalog.playlist_name", &catalog.playlist_name)?;
    require_http_url("catalog.redirect_uri", &catalog.redirect_uri)?;
    require_http_url("catalog.accounts_base_url", &catalog.accounts_base_url)?;
    require_http_url("catalog.api_base_url", &catalog.api_base_url)?;

    if catalog.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "catalog.request_timeout_secs",
        });
    }
    Ok(())
}

fn validate_chat(config: &Config) -> Result<(), ValidationError> {
    require_http_url("chat.api_base_url", &config.chat.api_base_url)?;

    if config.chat.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "chat.request_timeout_secs",
        });
    }
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    require_path("server.webhook_path", &config.server.webhook_path)?;
    require_path("server.callback_path", &config.server.callback_path)?;
    Ok(())
}

fn validate_search(config: &Config) -> Result<(), ValidationError> {
    let size = config.search.default_page_size;
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(ValidationError::InvalidPageSize(size));
    }
    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingSetting { field });
    }
    Ok(())
}

fn require_http_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let valid = reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);

    if !valid {
        return Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn require_path(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !value.starts_with('/') {
        return Err(ValidationError::InvalidPath {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
