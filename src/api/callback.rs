use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::AuthorizationState, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthorizationState>>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(auth_state) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&auth_state.state) {
        warning!("Ignoring callback with mismatching state");
        return Html("<h4>Invalid state.</h4>");
    }

    if let Some(error) = params.get("error") {
        auth_state.code = Some(Err(format!("authorization denied: {}", error)));
        return Html("<h4>Login failed.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            auth_state.code = Some(Ok(code.clone()));
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        None => {
            auth_state.code = Some(Err("callback without authorization code".to_string()));
            Html("<h4>Missing authorization code.</h4>")
        }
    }
}
