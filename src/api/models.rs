//! Request and response bodies of the HTTP surface.
//!
//! The webhook body itself lives in [`crate::chat`]; this module only holds
//! what the bot's own endpoints accept and return.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::observability::MetricsSnapshot;

/// Query string the music platform appends when redirecting back after login.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the account owner declined access.
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub metrics: MetricsSnapshot,
    pub version: String,
}
