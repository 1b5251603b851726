use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "JUKEBOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/jukebot.toml";
const ENV_PREFIX: &str = "JUKEBOT";
const ENV_SEPARATOR: &str = "__";

/// Plain variable names of earlier deployments and the keys they fill.
/// Both redirect names are accepted; the later one wins.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("SPOTIFY_CLIENT_ID", "catalog.client_id"),
    ("SPOTIFY_CALLBACK", "catalog.redirect_uri"),
    ("SPOTIFY_REDIRECT_URI", "catalog.redirect_uri"),
    ("SPOTIFY_USER_ID", "catalog.account_id"),
    ("SPOTIFY_PLAYLIST_NAME", "catalog.playlist_name"),
    ("LINE_MESSAGING_API", "chat.api_base_url"),
];

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. Alias variables (`SPOTIFY_CLIENT_ID`, `PORT`, ...)
/// 3. TOML file (if exists)
/// 4. Environment variables from .env file (via dotenvy)
/// 5. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// Secrets are never stored in TOML files, only in environment
fn load_secrets(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(secret) = lookup("SPOTIFY_CLIENT_SECRET") {
        config.catalog.client_secret = Some(secret);
    }
    if let Some(token) = lookup("LINE_ACCESS_TOKEN").or_else(|| lookup("LINE_CHANNEL_ACCESS_TOKEN")) {
        config.chat.access_token = Some(token);
    }
    if let Some(secret) = lookup("LINE_CHANNEL_SECRET") {
        config.chat.channel_secret = Some(secret);
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    load_with_lookup(config_path, |name| env::var(name).ok())
}

fn load_with_lookup(
    config_path: PathBuf,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    for (name, key) in ENV_ALIASES {
        if let Some(value) = lookup(name) {
            builder = builder.set_default(*key, value)?;
        }
    }
    if let Some(port) = lookup("PORT") {
        builder = builder.set_default("server.bind_addr", format!("0.0.0.0:{port}"))?;
    }

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // JUKEBOT__CATALOG__PLAYLIST_NAME -> catalog.playlist_name
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
