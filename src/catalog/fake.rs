//! In-memory [`CatalogApi`] that counts calls, for unit tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use super::error::{CatalogError, Result};
use super::models::{Artwork, PlaylistPage, SearchPage, TargetPlaylist, TokenGrant, Track};
use super::upstream::CatalogApi;

#[derive(Debug, Clone)]
pub struct SearchCall {
    pub token: String,
    pub terms: String,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Default)]
pub struct FakeCatalog {
    pub refresh_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub reject_exchange: AtomicBool,
    pub reject_refresh: AtomicBool,
    pub reject_create: AtomicBool,
    pub omit_refresh_token: AtomicBool,
    exchange_expires_in: AtomicI64,
    search_total: AtomicU32,
    refresh_delay: Mutex<Duration>,
    create_delay: Mutex<Duration>,
    playlists: Mutex<Vec<TargetPlaylist>>,
    searches: Mutex<Vec<SearchCall>>,
    added: Mutex<Vec<(String, String)>>,
    add_tokens: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.exchange_expires_in.store(3600, Ordering::SeqCst);
        fake
    }

    pub fn set_exchange_expires_in(&self, seconds: i64) {
        self.exchange_expires_in.store(seconds, Ordering::SeqCst);
    }

    pub fn set_search_total(&self, total: u32) {
        self.search_total.store(total, Ordering::SeqCst);
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock().unwrap() = delay;
    }

    pub fn set_create_delay(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = delay;
    }

    /// Fill the account with `count` playlists, optionally renaming one.
    pub fn seed_playlists(&self, count: usize, named: Option<(usize, &str)>) {
        let mut playlists = self.playlists.lock().unwrap();
        for i in 0..count {
            let name = match named {
                Some((index, name)) if index == i => name.to_string(),
                _ => format!("Playlist {i}"),
            };
            playlists.push(TargetPlaylist {
                id: format!("pl-{i}"),
                name,
            });
        }
    }

    pub fn push_playlist(&self, id: &str, name: &str) {
        self.playlists.lock().unwrap().push(TargetPlaylist {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn searches(&self) -> Vec<SearchCall> {
        self.searches.lock().unwrap().clone()
    }

    pub fn added_uris(&self) -> Vec<(String, String)> {
        self.added.lock().unwrap().clone()
    }

    /// Access token presented on each `add_tracks` call.
    pub fn add_tokens(&self) -> Vec<String> {
        self.add_tokens.lock().unwrap().clone()
    }
}

/// Track `index` of a result set; popularity deliberately not monotonic.
pub fn sample_track(index: u32) -> Track {
    Track {
        id: format!("track-{index}"),
        name: format!("Song {index}"),
        artists: vec![format!("Artist {index}"), "Guest".to_string()],
        popularity: (index * 37) % 100,
        artwork: vec![
            Artwork {
                url: format!("https://img/{index}/64"),
                width: 64,
            },
            Artwork {
                url: format!("https://img/{index}/640"),
                width: 640,
            },
        ],
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        if self.reject_exchange.load(Ordering::SeqCst) {
            return Err(CatalogError::AuthExchange(format!("invalid code {code}")));
        }
        let refresh_token = if self.omit_refresh_token.load(Ordering::SeqCst) {
            None
        } else {
            Some("refresh-0".to_string())
        };
        Ok(TokenGrant {
            access_token: "access-0".to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in: self.exchange_expires_in.load(Ordering::SeqCst),
            refresh_token,
            scope: None,
        })
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<TokenGrant> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = *self.refresh_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if self.reject_refresh.load(Ordering::SeqCst) {
            return Err(CatalogError::Refresh("invalid_grant".to_string()));
        }
        Ok(TokenGrant {
            access_token: format!("refreshed-{n}"),
            token_type: Some("Bearer".to_string()),
            expires_in: 3600,
            refresh_token: None,
            scope: None,
        })
    }

    async fn search_tracks(
        &self,
        access_token: &str,
        terms: &str,
        offset: u32,
        limit: u32,
    ) -> Result<SearchPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches.lock().unwrap().push(SearchCall {
            token: access_token.to_string(),
            terms: terms.to_string(),
            offset,
            limit,
        });

        let total = self.search_total.load(Ordering::SeqCst);
        let end = total.min(offset.saturating_add(limit));
        Ok(SearchPage {
            items: (offset..end).map(sample_track).collect(),
            total,
            offset,
            page_size: limit,
        })
    }

    async fn list_playlists(
        &self,
        _access_token: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PlaylistPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let playlists = self.playlists.lock().unwrap();
        let items = playlists
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(PlaylistPage {
            items,
            total: playlists.len() as u32,
        })
    }

    async fn create_playlist(
        &self,
        _access_token: &str,
        _account_id: &str,
        name: &str,
    ) -> Result<TargetPlaylist> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.create_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if self.reject_create.load(Ordering::SeqCst) {
            return Err(CatalogError::Upstream {
                status: 403,
                message: "Insufficient client scope".to_string(),
            });
        }
        let playlist = TargetPlaylist {
            id: format!("pl-new-{n}"),
            name: name.to_string(),
        };
        self.playlists.lock().unwrap().push(playlist.clone());
        Ok(playlist)
    }

    async fn add_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()> {
        self.add_tokens.lock().unwrap().push(access_token.to_string());
        let mut added = self.added.lock().unwrap();
        for uri in uris {
            added.push((playlist_id.to_string(), uri.clone()));
        }
        Ok(())
    }
}
