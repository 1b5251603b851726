use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens returned by the upstream token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Upstream credential for the single connected account. Held in memory only.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn from_grant(grant: TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            expires_at: now + Duration::seconds(grant.expires_in),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
        }
    }

    /// Apply a refresh grant in place. The refresh token only changes when
    /// upstream rotated it.
    pub fn apply_refresh(&mut self, grant: TokenGrant, now: DateTime<Utc>) {
        self.access_token = grant.access_token;
        self.expires_at = now + Duration::seconds(grant.expires_in);
        if let Some(refresh_token) = grant.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Playlist that queued tracks are appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPlaylist {
    pub id: String,
    pub name: String,
}

/// One window of the account's playlists.
#[derive(Debug, Clone)]
pub struct PlaylistPage {
    pub items: Vec<TargetPlaylist>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub url: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub popularity: u32,
    pub artwork: Vec<Artwork>,
}

impl Track {
    pub fn uri(&self) -> String {
        track_uri(&self.id)
    }
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<Track>,
    pub total: u32,
    pub offset: u32,
    pub page_size: u32,
}

impl SearchPage {
    pub fn has_more(&self) -> bool {
        u64::from(self.total) > u64::from(self.offset) + u64::from(self.page_size)
    }
}
