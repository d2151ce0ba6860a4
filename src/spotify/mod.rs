//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! playlist builder. It implements authentication, catalog search and playlist
//! mutation, and hides HTTP details behind the [`Catalog`] trait so the
//! search/filter/build workflow can run against any implementation.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, matching workflow)
//!          ↓
//! Catalog trait
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization code)
//!     ├── Search (paged track search)
//!     └── Playlist Operations (Create, Add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 authorization code flow:
//! - **Token Cache**: Reuses a cached token for the configured user
//! - **Token Refresh**: Refreshes tokens shortly before they expire
//! - **Browser Integration**: Opens the authorization URL in the default browser
//! - **Local Callback Server**: Temporary HTTP server for receiving the code
//!
//! ### Search Module
//!
//! [`search`] - Requests one page of track search results, restricted to a
//! market.
//!
//! ### Playlist Module
//!
//! [`playlist`] - Creates playlists for a user and appends tracks to them.
//!
//! ## API Coverage
//!
//! - `GET /search` - Track search with offset pagination
//! - `POST /users/{user_id}/playlists` - Create new playlists
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to playlists
//! - `POST /api/token` - Token exchange and refresh operations
//!
//! ## Error Types
//!
//! All operations return [`SpotifyError`]. Nothing in this module retries a
//! failed request; recovery decisions are made by the caller.
//!
//! ## Usage
//!
//! ```rust
//! let token = spotify::auth::authorize(&config).await?;
//! let client = SpotifyClient::from_config(&config, &token);
//! let page = client.search_tracks("track:Fall", "JP", 50, 0).await?;
//! ```

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::{
    config::Config,
    types::{AddTrackToPlaylistResponse, CreatePlaylistResponse, Token, Track},
};

pub mod auth;
pub mod playlist;
pub mod search;

/// Maximum number of tracks the API accepts in one add-tracks request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Maximum page size of the search endpoint.
pub const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug)]
pub enum SpotifyError {
    Http(reqwest::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    Auth(String),
    BatchTooLarge(usize),
    InvalidUrl(String),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Http(e) => write!(f, "HTTP error: {}", e),
            SpotifyError::Json(e) => write!(f, "JSON error: {}", e),
            SpotifyError::Io(e) => write!(f, "IO error: {}", e),
            SpotifyError::Auth(msg) => write!(f, "authorization failed: {}", msg),
            SpotifyError::BatchTooLarge(n) => write!(
                f,
                "{} tracks exceed the limit of {} per request",
                n, MAX_TRACKS_PER_REQUEST
            ),
            SpotifyError::InvalidUrl(url) => write!(f, "invalid API URL: {}", url),
        }
    }
}

impl std::error::Error for SpotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotifyError::Http(e) => Some(e),
            SpotifyError::Json(e) => Some(e),
            SpotifyError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

impl From<serde_json::Error> for SpotifyError {
    fn from(err: serde_json::Error) -> Self {
        SpotifyError::Json(err)
    }
}

impl From<std::io::Error> for SpotifyError {
    fn from(err: std::io::Error) -> Self {
        SpotifyError::Io(err)
    }
}

/// The remote catalog and playlist operations consumed by the workflow.
///
/// [`SpotifyClient`] is the production implementation; tests substitute
/// mocks or recording fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns one page of tracks for `query`.
    async fn search_tracks(
        &self,
        query: &str,
        market: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Track>, SpotifyError>;

    /// Creates an empty playlist owned by `username`.
    async fn create_playlist(
        &self,
        username: &str,
        name: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError>;

    /// Appends at most [`MAX_TRACKS_PER_REQUEST`] tracks to a playlist.
    async fn add_tracks(
        &self,
        username: &str,
        playlist_id: &str,
        ids: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError>;
}

/// Authenticated Spotify Web API client.
///
/// Constructed once per run from an access token and reused for every
/// request.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(api_url: &str, access_token: &str) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn from_config(config: &Config, token: &Token) -> Self {
        Self::new(&config.api_url, &token.access_token)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Appends `segments` to the API base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, SpotifyError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SpotifyError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn access_token(&self) -> &str {
        &self.access_token
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn search_tracks(
        &self,
        query: &str,
        market: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        search::search_tracks(self, query, market, limit, offset).await
    }

    async fn create_playlist(
        &self,
        username: &str,
        name: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        playlist::create(self, username, name).await
    }

    async fn add_tracks(
        &self,
        username: &str,
        playlist_id: &str,
        ids: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        playlist::add_tracks(self, username, playlist_id, ids).await
    }
}
