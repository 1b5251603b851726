//! Upstream music catalog access.
//!
//! - [`CatalogApi`] - one method per upstream endpoint
//! - [`SpotifyWebApi`] - the HTTP implementation
//! - [`CatalogClient`] - credential lifecycle, playlist resolution, search
//!   and queueing on top of a `CatalogApi`

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod models;
mod spotify;
mod upstream;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use models::{
    Artwork, Credential, PlaylistPage, SearchPage, TargetPlaylist, TokenGrant, Track, track_uri,
};
pub use spotify::{SpotifyWebApi, authorize_url};
pub use upstream::CatalogApi;
