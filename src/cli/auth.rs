use crate::{config::Config, error, spotify, success};

pub async fn auth(config: &Config) {
    match spotify::auth::authorize(config).await {
        Ok(token) => success!("Authorized as {} (scope: {})", config.username, token.scope),
        Err(e) => error!("Authorization failed. Err: {}", e),
    }
}
