//! Configuration management for the exact-match playlist builder.
//!
//! This module handles loading configuration values from `.env` files and
//! environment variables and collecting them into a single [`Config`] value.
//! The value is built once at startup and handed by reference to everything
//! that needs credentials or endpoints.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the current working directory
//! 4. Application defaults (endpoints, market, server address)

use std::{env, path::PathBuf};

/// Default base URL of the Spotify Web API.
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
/// Default Spotify OAuth authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
/// Default Spotify OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
/// Default market used to restrict search results.
pub const DEFAULT_MARKET: &str = "JP";
/// Default bind address of the local OAuth callback server.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Loads environment variables from `.env` files.
///
/// Creates the application's local data directory if it doesn't exist and
/// loads `matchlist/.env` from it, followed by a `.env` file in the current
/// working directory. Variables that are already set in the process
/// environment are never overwritten, and a missing file is not an error.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/matchlist/.env`
/// - macOS: `~/Library/Application Support/matchlist/.env`
/// - Windows: `%LOCALAPPDATA%/matchlist/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or if an
/// existing `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use matchlist::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Returns the application's local data directory.
///
/// Token caches and the `.env` template live below this directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("matchlist");
    path
}

/// Runtime configuration.
///
/// Holds the five credentials required by the authorization flow together
/// with the endpoints and settings used by the Spotify client. Credentials
/// are passed through as read; an absent value becomes an empty string and
/// surfaces later as an authorization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub redirect_uri: String,
    pub scope: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub market: String,
    pub server_addr: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Variables
    ///
    /// | Variable                | Default                                   |
    /// |-------------------------|-------------------------------------------|
    /// | `SPOTIFY_CLIENT_ID`     | empty                                     |
    /// | `SPOTIFY_CLIENT_SECRET` | empty                                     |
    /// | `SPOTIFY_USERNAME`      | empty                                     |
    /// | `SPOTIFY_REDIRECT_URI`  | empty                                     |
    /// | `SPOTIFY_SCOPE`         | empty                                     |
    /// | `SPOTIFY_API_URL`       | `https://api.spotify.com/v1`              |
    /// | `SPOTIFY_API_AUTH_URL`  | `https://accounts.spotify.com/authorize`  |
    /// | `SPOTIFY_API_TOKEN_URL` | `https://accounts.spotify.com/api/token`  |
    /// | `SPOTIFY_MARKET`        | `JP`                                      |
    /// | `SERVER_ADDRESS`        | `127.0.0.1:8888`                          |
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_env();
    /// println!("Creating playlists for {}", config.username);
    /// ```
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Credentials fall back to empty strings; endpoints and settings fall
    /// back to their defaults when absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = |key: &str| lookup(key).unwrap_or_default();
        let setting = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            client_id: credential("SPOTIFY_CLIENT_ID"),
            client_secret: credential("SPOTIFY_CLIENT_SECRET"),
            username: credential("SPOTIFY_USERNAME"),
            redirect_uri: credential("SPOTIFY_REDIRECT_URI"),
            scope: credential("SPOTIFY_SCOPE"),
            api_url: setting("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: setting("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: setting("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            market: setting("SPOTIFY_MARKET", DEFAULT_MARKET),
            server_addr: setting("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        }
    }
}
