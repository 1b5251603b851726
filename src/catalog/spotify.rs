//! Spotify Web API implementation of [`CatalogApi`].

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::error::{CatalogError, Result};
use super::models::{Artwork, PlaylistPage, SearchPage, TargetPlaylist, TokenGrant, Track};
use super::upstream::CatalogApi;
use crate::config::CatalogConfig;

const USER_AGENT: &str = concat!("jukebot/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the accounts service and the Web API.
pub struct SpotifyWebApi {
    client: Client,
    accounts_base_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    market: Option<String>,
}

impl SpotifyWebApi {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.request_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            accounts_base_url: config.accounts_base_url.trim_end_matches('/').to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone().unwrap_or_default(),
            redirect_uri: config.redirect_uri.clone(),
            market: config.market.clone(),
        })
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> std::result::Result<TokenGrant, String> {
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("{status}: {}", token_error_message(&body)));
        }

        response.json::<TokenGrant>().await.map_err(|e| e.to_string())
    }
}

/// Login URL the account owner visits to grant access.
pub fn authorize_url(config: &CatalogConfig, state: &str) -> Result<Url> {
    let base = format!("{}/authorize", config.accounts_base_url.trim_end_matches('/'));
    Url::parse_with_params(
        &base,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scopes.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
}

#[async_trait]
impl CatalogApi for SpotifyWebApi {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
        .map_err(CatalogError::AuthExchange)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
        .map_err(CatalogError::Refresh)
    }

    async fn search_tracks(
        &self,
        access_token: &str,
        terms: &str,
        offset: u32,
        limit: u32,
    ) -> Result<SearchPage> {
        let mut query = vec![
            ("q", terms.to_string()),
            ("type", "track".to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(market) = &self.market {
            query.push(("market", market.clone()));
        }

        let response = self
            .client
            .get(format!("{}/search", self.api_base_url))
            .bearer_auth(access_token)
            .query(&query)
            .send()
            .await?;
        let body: SearchResponse = checked(response).await?.json().await?;

        debug!(terms, offset, limit, total = body.tracks.total, "Search completed");

        Ok(SearchPage {
            items: body.tracks.items.into_iter().flatten().filter_map(into_track).collect(),
            total: body.tracks.total,
            offset,
            page_size: limit,
        })
    }

    async fn list_playlists(
        &self,
        access_token: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PlaylistPage> {
        let response = self
            .client
            .get(format!("{}/me/playlists", self.api_base_url))
            .bearer_auth(access_token)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;
        let body: PlaylistsResponse = checked(response).await?.json().await?;

        Ok(PlaylistPage {
            items: body
                .items
                .into_iter()
                .flatten()
                .map(|p| TargetPlaylist { id: p.id, name: p.name })
                .collect(),
            total: body.total,
        })
    }

    async fn create_playlist(
        &self,
        access_token: &str,
        account_id: &str,
        name: &str,
    ) -> Result<TargetPlaylist> {
        let response = self
            .client
            .post(format!("{}/users/{}/playlists", self.api_base_url, account_id))
            .bearer_auth(access_token)
            .json(&json!({ "name": name, "public": false }))
            .send()
            .await?;
        let body: PlaylistObject = checked(response).await?.json().await?;

        Ok(TargetPlaylist {
            id: body.id,
            name: body.name,
        })
    }

    async fn add_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/playlists/{}/tracks", self.api_base_url, playlist_id))
            .bearer_auth(access_token)
            .json(&json!({ "uris": uris }))
            .send()
            .await?;
        checked(response).await?;
        Ok(())
    }
}

/// Turn non-success responses into [`CatalogError::Upstream`].
async fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogError::Upstream {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// Web API errors look like `{"error": {"status": 401, "message": "..."}}`.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorObject,
    }

    #[derive(Deserialize)]
    struct ErrorObject {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Accounts service errors look like `{"error": "invalid_grant", "error_description": "..."}`.
fn token_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct TokenErrorBody {
        error: String,
        error_description: Option<String>,
    }

    match serde_json::from_str::<TokenErrorBody>(body) {
        Ok(TokenErrorBody {
            error_description: Some(description),
            ..
        }) => description,
        Ok(b) => b.error,
        Err(_) => body.to_string(),
    }
}

fn into_track(track: TrackObject) -> Option<Track> {
    Some(Track {
        id: track.id?,
        name: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        popularity: track.popularity.unwrap_or(0),
        artwork: track
            .album
            .map(|album| {
                album
                    .images
                    .into_iter()
                    .map(|image| Artwork {
                        url: image.url,
                        width: image.width.unwrap_or(0),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    })
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: TrackPaging,
}

#[derive(Deserialize)]
struct TrackPaging {
    items: Vec<Option<TrackObject>>,
    total: u32,
}

#[derive(Deserialize)]
struct TrackObject {
    id: Option<String>,
    name: String,
    popularity: Option<u32>,
    #[serde(default)]
    artists: Vec<ArtistObject>,
    album: Option<AlbumObject>,
}

#[derive(Deserialize)]
struct ArtistObject {
    name: String,
}

#[derive(Deserialize)]
struct AlbumObject {
    #[serde(default)]
    images: Vec<ImageObject>,
}

#[derive(Deserialize)]
struct ImageObject {
    url: String,
    width: Option<u32>,
}

#[derive(Deserialize)]
struct PlaylistsResponse {
    items: Vec<Option<PlaylistObject>>,
    total: u32,
}

#[derive(Deserialize)]
struct PlaylistObject {
    id: String,
    name: String,
}
