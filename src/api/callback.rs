use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{
    management::{AuthState, Session},
    spotify::auth::OAuthFlow,
    warning,
};

/// Shared between the callback handler and the login waiter.
#[derive(Debug, Clone)]
pub struct CallbackState {
    pub session: Arc<Mutex<Session>>,
    pub oauth: OAuthFlow,
}

/// Receives Spotify's redirect and finishes the pending login.
///
/// An `error` parameter ends the login right away, no exchange is attempted.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Html<&'static str> {
    let mut session = state.session.lock().await;

    if let Some(error) = params.get("error") {
        warning!("Spotify redirected with error: {}", error);
        session.fail_login(format!("authorization denied: {error}"));
        return Html("<h4>Login failed.</h4><p>Spotify reported an error, see the terminal.</p>");
    }

    let Some(code) = params.get("code") else {
        if session.state() == AuthState::PendingCode {
            session.fail_login("redirect carried neither code nor error");
        }
        return Html("<h4>Missing authorization code.</h4>");
    };

    if session.state() != AuthState::PendingCode {
        return Html("<h4>No login in progress.</h4>");
    }
    let Some(verifier) = session.code_verifier().map(str::to_string) else {
        return Html("<h4>Missing PKCE code verifier.</h4>");
    };

    match state.oauth.exchange_code(code, &verifier).await {
        Ok(token) => {
            session.complete_login(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            session.fail_login(e.to_string());
            Html("<h4>Login failed.</h4>")
        }
    }
}
