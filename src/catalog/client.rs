use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use super::error::{CatalogError, Result};
use super::models::{Credential, SearchPage, TargetPlaylist, track_uri};
use super::upstream::CatalogApi;
use crate::pagination::MAX_PAGE_SIZE;

/// Page size used when listing the account's playlists.
const PLAYLIST_PAGE_SIZE: u32 = 50;

/// Authenticated access to the catalog for the one connected account.
///
/// Shared by all request handlers behind an `Arc`. Two sections are
/// serialized:
/// - credential refresh: concurrent callers that find the token expired queue
///   on `refresh_gate`; the first one refreshes, the rest observe its result.
///   Redeeming a new code takes the same gate.
/// - playlist resolution: `resolve_gate` is held for the whole
///   list-then-create sequence, so late callers see the playlist the first
///   caller found or created. The result sits behind its own lock, which is
///   never held across upstream calls.
pub struct CatalogClient {
    api: Arc<dyn CatalogApi>,
    account_id: String,
    playlist_name: String,
    credential: RwLock<Option<Credential>>,
    refresh_gate: Mutex<()>,
    resolve_gate: Mutex<()>,
    playlist: RwLock<Option<TargetPlaylist>>,
}

impl CatalogClient {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        account_id: impl Into<String>,
        playlist_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            account_id: account_id.into(),
            playlist_name: playlist_name.into(),
            credential: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            resolve_gate: Mutex::new(()),
            playlist: RwLock::new(None),
        }
    }

    /// Configured name of the playlist tracks are queued into.
    pub fn playlist_name(&self) -> &str {
        &self.playlist_name
    }

    /// Trade an authorization code for tokens, then resolve the target
    /// playlist in the background. Resolution failures are logged only.
    pub async fn exchange_authorization_code(self: &Arc<Self>, code: &str) -> Result<()> {
        self.redeem_code(code).await?;

        let client = Arc::clone(self);
        tokio::spawn(async move {
            let name = client.playlist_name.clone();
            match client.resolve_playlist(&name).await {
                Ok(playlist) => {
                    info!(playlist_id = %playlist.id, name = %playlist.name, "Catalog ready")
                }
                Err(e) => error!(error = %e, name = %name, "Target playlist resolution failed"),
            }
        });

        Ok(())
    }

    /// Exchange the code and store the credential, without resolving the
    /// playlist.
    pub async fn redeem_code(&self, code: &str) -> Result<()> {
        let grant = self.api.exchange_code(code).await?;

        // An in-flight refresh must land before the new credential replaces it.
        let _gate = self.refresh_gate.lock().await;
        let credential = Credential::from_grant(grant, Utc::now());
        info!(expires_at = %credential.expires_at, "Authorization code exchanged");

        *self.credential.write().await = Some(credential);
        Ok(())
    }

    /// Whether a credential is held and not yet expired. No network call.
    pub async fn is_credential_valid(&self) -> bool {
        self.credential
            .read()
            .await
            .as_ref()
            .is_some_and(|c| c.is_valid_at(Utc::now()))
    }

    pub async fn has_credential(&self) -> bool {
        self.credential.read().await.is_some()
    }

    /// Return a usable access token, refreshing it first when expired.
    pub async fn ensure_valid_credential(&self) -> Result<String> {
        if let Some(token) = self.current_token().await {
            return Ok(token);
        }

        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while this one waited.
        if let Some(token) = self.current_token().await {
            return Ok(token);
        }

        let refresh_token = self
            .credential
            .read()
            .await
            .as_ref()
            .and_then(|c| c.refresh_token.clone())
            .ok_or_else(|| CatalogError::Refresh("no refresh token held".to_string()))?;

        let grant = match self.api.refresh_token(&refresh_token).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, "Credential refresh rejected");
                return Err(match e {
                    CatalogError::Refresh(reason) => CatalogError::Refresh(reason),
                    other => CatalogError::Refresh(other.to_string()),
                });
            }
        };

        let mut guard = self.credential.write().await;
        let credential = guard
            .as_mut()
            .ok_or_else(|| CatalogError::Refresh("credential dropped during refresh".to_string()))?;
        credential.apply_refresh(grant, Utc::now());
        info!(expires_at = %credential.expires_at, "Access token refreshed");

        Ok(credential.access_token.clone())
    }

    async fn current_token(&self) -> Option<String> {
        self.credential
            .read()
            .await
            .as_ref()
            .filter(|c| c.is_valid_at(Utc::now()))
            .map(|c| c.access_token.clone())
    }

    /// Find the playlist named `target_name` among the account's playlists,
    /// or create it (private) when absent. The first exact match wins.
    pub async fn resolve_playlist(&self, target_name: &str) -> Result<TargetPlaylist> {
        if let Some(playlist) = self.resolved(target_name).await {
            return Ok(playlist);
        }

        let _gate = self.resolve_gate.lock().await;
        if let Some(playlist) = self.resolved(target_name).await {
            return Ok(playlist);
        }

        let token = self.ensure_valid_credential().await?;

        let mut playlists = Vec::new();
        let mut offset = 0;
        loop {
            let page = self
                .api
                .list_playlists(&token, offset, PLAYLIST_PAGE_SIZE)
                .await?;
            let fetched = page.items.len();
            playlists.extend(page.items);

            offset += PLAYLIST_PAGE_SIZE;
            if fetched == 0 || offset >= page.total {
                break;
            }
        }

        let playlist = match playlists.into_iter().find(|p| p.name == target_name) {
            Some(existing) => {
                info!(playlist_id = %existing.id, name = target_name, "Adopted existing playlist");
                existing
            }
            None => {
                let created = self
                    .api
                    .create_playlist(&token, &self.account_id, target_name)
                    .await?;
                info!(playlist_id = %created.id, name = target_name, "Created playlist");
                created
            }
        };

        *self.playlist.write().await = Some(playlist.clone());
        Ok(playlist)
    }

    async fn resolved(&self, target_name: &str) -> Option<TargetPlaylist> {
        self.playlist
            .read()
            .await
            .as_ref()
            .filter(|p| p.name == target_name)
            .cloned()
    }

    /// The resolved playlist, if any. Never waits on an ongoing resolution.
    pub async fn target_playlist(&self) -> Option<TargetPlaylist> {
        self.playlist.read().await.clone()
    }

    pub async fn search(&self, terms: &str, offset: u32, page_size: u32) -> Result<SearchPage> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CatalogError::InvalidPageSize(page_size));
        }

        let token = self.ensure_valid_credential().await?;
        let mut page = self.api.search_tracks(&token, terms, offset, page_size).await?;
        page.offset = offset;
        page.page_size = page_size;
        Ok(page)
    }

    /// Append one track to the target playlist. Queueing the same track twice
    /// adds it twice.
    pub async fn queue_track(&self, track_id: &str) -> Result<TargetPlaylist> {
        let playlist = self
            .target_playlist()
            .await
            .ok_or(CatalogError::NotResolved)?;

        let token = self.ensure_valid_credential().await?;
        self.api
            .add_tracks(&token, &playlist.id, &[track_uri(track_id)])
            .await?;

        info!(track_id, playlist_id = %playlist.id, "Track queued");
        Ok(playlist)
    }
}


#[cfg(test)]
impl CatalogClient {
    /// Force the held credential past its expiry.
    pub(crate) async fn expire_credential_for_test(&self) {
        if let Some(credential) = self.credential.write().await.as_mut() {
            credential.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}
