use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ChatConfig;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("reply request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("reply rejected with {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, ChatError>;

/// Outbound side of the messaging platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Answer one event. Each reply token is good for a single call.
    async fn reply(&self, reply_token: &str, messages: Vec<Value>) -> Result<()>;
}

/// Messaging API client authenticated with the channel access token.
pub struct LineMessagingClient {
    client: Client,
    api_base_url: String,
    access_token: String,
}

impl LineMessagingClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ChatTransport for LineMessagingClient {
    async fn reply(&self, reply_token: &str, messages: Vec<Value>) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/reply", self.api_base_url))
            .bearer_auth(&self.access_token)
            .json(&json!({ "replyToken": reply_token, "messages": messages }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        debug!(reply_token, "Reply delivered");
        Ok(())
    }
}
