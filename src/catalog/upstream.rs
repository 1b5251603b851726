use async_trait::async_trait;

use super::error::Result;
use super::models::{PlaylistPage, SearchPage, TargetPlaylist, TokenGrant};

/// Raw capabilities of the music platform's public API.
///
/// [`CatalogClient`](super::CatalogClient) layers the credential lifecycle and
/// playlist resolution on top of this; implementations perform one HTTP call
/// per method and never retry.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant>;

    async fn search_tracks(
        &self,
        access_token: &str,
        terms: &str,
        offset: u32,
        limit: u32,
    ) -> Result<SearchPage>;

    async fn list_playlists(
        &self,
        access_token: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PlaylistPage>;

    async fn create_playlist(
        &self,
        access_token: &str,
        account_id: &str,
        name: &str,
    ) -> Result<TargetPlaylist>;

    async fn add_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()>;
}
