//! Postback payloads carried by interactive buttons.
//!
//! Every button this bridge renders embeds one [`Postback`] serialized as a
//! JSON object with a `command` discriminator:
//!
//! ```json
//! { "command": "SEARCH_MORE", "terms": "daft punk", "skip": 10, "limit": 10 }
//! { "command": "ADD_TRACK", "track": "4uLU6hMCjMI75M1A2tKUQC" }
//! ```
//!
//! A [`PaginationCursor`] holds everything needed to fetch the next page of a
//! search, so no search state is kept between webhook deliveries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upstream hard limit on search page size.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Longest postback `data` string the chat platform accepts.
pub const MAX_POSTBACK_DATA_LEN: usize = 300;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("page size {0} outside 1..={MAX_PAGE_SIZE}")]
    PageSizeOutOfRange(u32),

    #[error("empty {0}")]
    EmptyField(&'static str),

    #[error("encoded payload is {0} characters, limit is {MAX_POSTBACK_DATA_LEN}")]
    TooLong(usize),
}

/// Parameters of one catalog search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub terms: String,
    pub offset: u32,
    pub page_size: u32,
}

impl SearchQuery {
    pub fn first_page(terms: impl Into<String>, page_size: u32) -> Self {
        Self {
            terms: terms.into(),
            offset: 0,
            page_size,
        }
    }

    /// Cursor pointing at the page right after this one.
    pub fn next_cursor(&self) -> PaginationCursor {
        PaginationCursor {
            terms: self.terms.clone(),
            next_offset: self.offset.saturating_add(self.page_size),
            page_size: self.page_size,
        }
    }
}

/// "Continue search" state. Field names on the wire are kept short because of
/// the postback length limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCursor {
    pub terms: String,
    #[serde(rename = "skip")]
    pub next_offset: u32,
    #[serde(rename = "limit")]
    pub page_size: u32,
}

impl PaginationCursor {
    pub fn into_query(self) -> SearchQuery {
        SearchQuery {
            terms: self.terms,
            offset: self.next_offset,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCommand {
    #[serde(rename = "track")]
    pub track_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Postback {
    #[serde(rename = "ADD_TRACK")]
    AddTrack(QueueCommand),
    #[serde(rename = "SEARCH_MORE")]
    SearchMore(PaginationCursor),
}

impl Postback {
    fn validate(&self) -> Result<(), PayloadError> {
        match self {
            Postback::AddTrack(cmd) => {
                if cmd.track_id.trim().is_empty() {
                    return Err(PayloadError::EmptyField("track"));
                }
            }
            Postback::SearchMore(cursor) => {
                if cursor.terms.trim().is_empty() {
                    return Err(PayloadError::EmptyField("terms"));
                }
                if !(1..=MAX_PAGE_SIZE).contains(&cursor.page_size) {
                    return Err(PayloadError::PageSizeOutOfRange(cursor.page_size));
                }
            }
        }
        Ok(())
    }
}

/// Serialize a postback into button `data`.
pub fn encode(postback: &Postback) -> Result<String, PayloadError> {
    postback.validate()?;
    let data = serde_json::to_string(postback)?;
    let len = data.chars().count();
    if len > MAX_POSTBACK_DATA_LEN {
        return Err(PayloadError::TooLong(len));
    }
    Ok(data)
}

/// Parse button `data` back into a postback. Unknown `command` values and
/// missing fields are rejected.
pub fn decode(data: &str) -> Result<Postback, PayloadError> {
    let postback: Postback = serde_json::from_str(data)?;
    postback.validate()?;
    Ok(postback)
}
