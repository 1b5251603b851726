use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The authorization code was rejected. A fresh login is required.
    #[error("authorization code exchange failed: {0}")]
    AuthExchange(String),

    /// No refresh token is held, or upstream rejected it.
    #[error("credential refresh failed: {0}")]
    Refresh(String),

    #[error("target playlist has not been resolved")]
    NotResolved,

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("page size {0} outside 1..=50")]
    InvalidPageSize(u32),

    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
