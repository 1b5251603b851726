use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Largest accepted webhook body
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Path the music platform redirects to after login
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_payload_bytes: default_max_payload_bytes(),
            webhook_path: default_webhook_path(),
            callback_path: default_callback_path(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_max_payload_bytes() -> usize {
    1024 * 1024
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

fn default_callback_path() -> String {
    "/spotify".to_string()
}

/// Music catalog account and endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub client_id: String,
    /// Loaded from `SPOTIFY_CLIENT_SECRET`, never from the config file
    #[serde(skip)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: String,
    /// Account that owns the target playlist
    #[serde(default)]
    pub account_id: String,
    #[serde(default = "default_playlist_name")]
    pub playlist_name: String,
    #[serde(default = "default_accounts_base_url")]
    pub accounts_base_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    pub market: Option<String>,
    /// Space-separated OAuth scopes requested at login
    #[serde(default = "default_scopes")]
    pub scopes: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            redirect_uri: String::new(),
            account_id: String::new(),
            playlist_name: default_playlist_name(),
            accounts_base_url: default_accounts_base_url(),
            api_base_url: default_api_base_url(),
            market: None,
            scopes: default_scopes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_playlist_name() -> String {
    "Jukebox".to_string()
}

fn default_accounts_base_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_scopes() -> String {
    "playlist-read-private playlist-modify-public playlist-modify-private".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Messaging platform reply endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// Loaded from `LINE_ACCESS_TOKEN`, never from the config file
    #[serde(skip)]
    pub access_token: Option<String>,
    /// Webhook signing key, loaded from `LINE_CHANNEL_SECRET`
    #[serde(skip)]
    pub channel_secret: Option<String>,
    #[serde(default = "default_chat_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            channel_secret: None,
            api_base_url: default_chat_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_chat_api_base_url() -> String {
    "https://api.line.me/v2/bot/message".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
