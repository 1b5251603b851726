//! Webhook request body as delivered by the messaging platform.
//!
//! ```json
//! {
//!   "destination": "U0123...",
//!   "events": [
//!     { "type": "message", "replyToken": "r1", "message": { "type": "text", "text": "daft punk" } },
//!     { "type": "postback", "replyToken": "r2", "postback": { "data": "{\"command\":\"ADD_TRACK\",\"track\":\"abc123\"}" } }
//!   ]
//! }
//! ```
//!
//! Only fields the bridge reads are modelled; other event and message types
//! deserialize to their `Other` variants.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: String,
        message: MessageContent,
    },
    Postback {
        #[serde(rename = "replyToken")]
        reply_token: String,
        postback: PostbackContent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostbackContent {
    pub data: String,
}

impl WebhookEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookEvent::Message {
                message: MessageContent::Text { .. },
                ..
            } => "text",
            WebhookEvent::Message { .. } => "message",
            WebhookEvent::Postback { .. } => "postback",
            WebhookEvent::Other => "other",
        }
    }
}
