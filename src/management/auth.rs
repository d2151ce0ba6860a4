use std::path::PathBuf;

use crate::{
    config::{self, Config},
    spotify::{self, SpotifyError},
    types::Token,
    utils, warning,
};

/// Seconds before expiry at which a token is refreshed.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    username: String,
    token: Token,
}

impl TokenManager {
    pub fn new(username: &str, token: Token) -> Self {
        TokenManager {
            username: username.to_string(),
            token,
        }
    }

    pub async fn load(username: &str) -> Result<Self, SpotifyError> {
        let path = Self::token_path(username);
        let content = async_fs::read_to_string(&path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self::new(username, token))
    }

    pub async fn persist(&self) -> Result<(), SpotifyError> {
        let path = Self::token_path(&self.username);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&path, json).await?;
        Ok(())
    }

    /// Returns a usable token, refreshing and re-persisting it when expired.
    pub async fn get_valid_token(&mut self, config: &Config) -> Result<Token, SpotifyError> {
        if self.is_expired(utils::now_timestamp()) {
            let new_token = spotify::auth::refresh_token(config, &self.token.refresh_token).await?;
            self.token = new_token;
            if let Err(e) = self.persist().await {
                warning!("Failed to save refreshed token to cache: {}", e);
            }
        }

        Ok(self.token.clone())
    }

    pub fn is_expired(&self, now: u64) -> bool {
        let expires_at = self.token.obtained_at.saturating_add(self.token.expires_in);
        now >= expires_at.saturating_sub(EXPIRY_MARGIN_SECS)
    }

    /// Whether the cached token was granted every scope in `requested`.
    pub fn has_scope(&self, requested: &str) -> bool {
        let granted: Vec<&str> = self.token.scope.split_whitespace().collect();
        requested
            .split_whitespace()
            .all(|scope| granted.contains(&scope))
    }

    fn token_path(username: &str) -> PathBuf {
        let mut path = config::data_dir();
        path.push(format!("cache/token-{}.json", cache_key(username)));
        path
    }
}

/// Hex-encodes the username so distinct users never share a cache file.
fn cache_key(username: &str) -> String {
    username.bytes().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(scope: &str, obtained_at: u64, expires_in: u64) -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: scope.to_string(),
            expires_in,
            obtained_at,
        }
    }

    #[test]
    fn test_is_expired_respects_margin() {
        let mgr = TokenManager::new("alice", token("", 1_000, 3_600));
        assert!(!mgr.is_expired(1_000));
        assert!(!mgr.is_expired(4_359));
        assert!(mgr.is_expired(4_360));
        assert!(mgr.is_expired(10_000));
    }

    #[test]
    fn test_short_lived_token_is_expired() {
        let mgr = TokenManager::new("alice", token("", 0, 100));
        assert!(mgr.is_expired(0));
    }

    #[test]
    fn test_has_scope() {
        let mgr = TokenManager::new(
            "alice",
            token("playlist-modify-public playlist-modify-private", 0, 3_600),
        );
        assert!(mgr.has_scope("playlist-modify-public"));
        assert!(mgr.has_scope("playlist-modify-private playlist-modify-public"));
        assert!(mgr.has_scope(""));
        assert!(!mgr.has_scope("playlist-modify-public user-library-read"));
    }

    #[test]
    fn test_is_expired_saturates_on_overflow() {
        let mgr = TokenManager::new("alice", token("", u64::MAX, u64::MAX));
        assert!(!mgr.is_expired(0));
        assert!(mgr.is_expired(u64::MAX));
    }

    #[test]
    fn test_cache_key_is_hex() {
        assert_eq!(cache_key("alice"), "616c696365");
        assert_eq!(cache_key("../x"), "2e2e2f78");
        assert_eq!(cache_key(""), "");
    }

    #[test]
    fn test_token_path_distinct_per_username() {
        let dotted = TokenManager::token_path("john.doe");
        let underscored = TokenManager::token_path("john_doe");
        assert_ne!(dotted, underscored);

        let traversal = TokenManager::token_path("../etc/passwd");
        assert_eq!(traversal.parent(), dotted.parent());
    }
}
