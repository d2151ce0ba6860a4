use std::{sync::Arc, time::Duration};

use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    config::Config,
    info,
    management::TokenManager,
    server,
    spotify::SpotifyError,
    types::{AuthorizationState, Token},
    utils, warning,
};

/// Maximum time to wait for the user to finish the consent screen.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Acquires an access token for the configured user.
///
/// Uses the cached token for `config.username` when one exists and was
/// granted every requested scope, refreshing it if it is about to expire.
/// Otherwise runs the full authorization code flow and caches the result.
///
/// # Arguments
///
/// * `config` - Configuration holding client id, client secret, username,
///   redirect URI and scope
///
/// # Errors
///
/// Returns [`SpotifyError::Auth`] when credentials are missing, the user
/// denies access, the callback never arrives or the returned `state` does not
/// match, and [`SpotifyError::Http`] when the token exchange fails.
///
/// # Example
///
/// ```
/// let token = authorize(&config).await?;
/// let client = SpotifyClient::from_config(&config, &token);
/// ```
pub async fn authorize(config: &Config) -> Result<Token, SpotifyError> {
    if let Ok(mut token_mgr) = TokenManager::load(&config.username).await {
        if token_mgr.has_scope(&config.scope) {
            match token_mgr.get_valid_token(config).await {
                Ok(token) => return Ok(token),
                Err(e) => warning!("Cached token could not be refreshed: {}", e),
            }
        }
    }

    let token = prompt_for_user_token(config).await?;

    if let Err(e) = TokenManager::new(&config.username, token.clone())
        .persist()
        .await
    {
        warning!("Failed to save token to cache: {}", e);
    }

    Ok(token)
}

/// Runs the interactive OAuth 2.0 authorization code flow.
///
/// 1. **State**: Generates a random `state` value bound to this attempt
/// 2. **Server Start**: Binds the local callback server on `config.server_addr`
/// 3. **Browser Launch**: Opens the authorization URL in the default browser,
///    printing it when no browser can be launched
/// 4. **Callback Handling**: Waits up to two minutes for the redirect
/// 5. **Token Exchange**: Exchanges the code using the client credentials
///
/// The callback server is shut down before this function returns.
pub async fn prompt_for_user_token(config: &Config) -> Result<Token, SpotifyError> {
    check_credentials(config)?;

    let state = utils::generate_state();
    let auth_url = authorize_url(config, &state)?;

    let shared_state = Arc::new(Mutex::new(Some(AuthorizationState {
        state: state.clone(),
        code: None,
    })));

    let listener = TcpListener::bind(&config.server_addr).await?;
    let server_state = Arc::clone(&shared_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_api_server(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    info!("Waiting for authorization on {}", config.redirect_uri);
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let code = wait_for_code(shared_state, CALLBACK_TIMEOUT).await;
    server_handle.abort();

    match code {
        Some(Ok(code)) => exchange_code(config, &code).await,
        Some(Err(reason)) => Err(SpotifyError::Auth(reason)),
        None => Err(SpotifyError::Auth(
            "timed out waiting for the authorization callback".to_string(),
        )),
    }
}

/// Builds the URL of the consent screen for this attempt.
pub fn authorize_url(config: &Config, state: &str) -> Result<Url, SpotifyError> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("state", state),
            ("scope", config.scope.as_str()),
        ],
    )
    .map_err(|e| SpotifyError::Auth(format!("invalid authorization URL: {}", e)))
}

fn check_credentials(config: &Config) -> Result<(), SpotifyError> {
    let missing: Vec<&str> = [
        ("SPOTIFY_CLIENT_ID", &config.client_id),
        ("SPOTIFY_CLIENT_SECRET", &config.client_secret),
        ("SPOTIFY_REDIRECT_URI", &config.redirect_uri),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(key, _)| key)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SpotifyError::Auth(format!("missing {}", missing.join(", "))))
    }
}

/// Polls the shared state until the callback handler stored a result.
async fn wait_for_code(
    shared_state: Arc<Mutex<Option<AuthorizationState>>>,
    max_wait: Duration,
) -> Option<Result<String, String>> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(code) = lock.as_ref().and_then(|s| s.code.clone()) {
            return Some(code);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    None
}

/// Exchanges an authorization code for an access token.
///
/// Authenticates with HTTP basic client credentials as required for
/// confidential clients.
pub async fn exchange_code(config: &Config, code: &str) -> Result<Token, SpotifyError> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: TokenResponse = res.json().await?;
    Ok(into_token(json, ""))
}

/// Refreshes an expired access token using a refresh token.
///
/// Spotify may omit the refresh token from the response, in which case the
/// previous one stays valid and is kept.
pub async fn refresh_token(config: &Config, refresh_token: &str) -> Result<Token, SpotifyError> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: TokenResponse = res.json().await?;
    Ok(into_token(json, refresh_token))
}

fn into_token(json: TokenResponse, previous_refresh_token: &str) -> Token {
    Token {
        access_token: json.access_token,
        refresh_token: json
            .refresh_token
            .unwrap_or_else(|| previous_refresh_token.to_string()),
        scope: json.scope.unwrap_or_default(),
        expires_in: json.expires_in,
        obtained_at: utils::now_timestamp(),
    }
}
