use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use reqwest::Client;
use tokio::sync::Mutex;
use url::Url;

use crate::{
    Res,
    api::CallbackState,
    config::Settings,
    error::ApiError,
    info,
    management::{AuthState, LibraryCache, Session},
    server,
    spotify::client::SpotifyClient,
    types::{Token, TokenResponse, UserRecord},
    warning,
};

/// How long the interactive login waits for the browser redirect.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the authorization endpoint URL for a PKCE login.
///
/// Pure and deterministic: the same inputs always yield the same URL. The
/// query carries, in this order, `client_id`, `response_type=code`, `scope`,
/// `redirect_uri`, `code_challenge_method=S256` and `code_challenge`.
pub fn build_authorization_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    code_challenge: &str,
) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("scope", scope),
            ("redirect_uri", redirect_uri),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
        ],
    )
}

/// The accounts-service half of the authorization code flow with PKCE.
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    http: Client,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl OAuthFlow {
    pub fn new(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            scope: settings.scope.clone(),
            auth_url: settings.auth_url.clone(),
            token_url: settings.token_url.clone(),
        }
    }

    pub fn authorization_url(&self, code_challenge: &str) -> Result<Url, ApiError> {
        Ok(build_authorization_url(
            &self.auth_url,
            &self.client_id,
            &self.redirect_uri,
            &self.scope,
            code_challenge,
        )?)
    }

    /// Exchanges an authorization code for a token.
    ///
    /// `code_verifier` must be the verifier whose challenge went out with the
    /// authorization request, otherwise the accounts service rejects the code.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] on a non-success status or when the reply lacks
    /// `access_token`, `refresh_token` or `expires_in`.
    pub async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, ApiError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("code_verifier", code_verifier),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let reply = self.post_token_form(&form).await?;
        let refresh_token = reply
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Auth("token reply lacks refresh_token".to_string()))?;

        token_from_reply(reply, refresh_token, None, Utc::now())
    }

    /// Trades the refresh token for a new access token.
    ///
    /// The previous refresh token (and scope) are kept unless the reply
    /// carries new ones.
    pub async fn refresh(&self, token: &Token) -> Result<Token, ApiError> {
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", token.refresh_token.as_str()),
            ("client_id", self.client_id.as_str()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let reply = self.post_token_form(&form).await?;
        let refresh_token = reply
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| token.refresh_token.clone());

        token_from_reply(reply, refresh_token, token.scope.clone(), Utc::now())
    }

    async fn post_token_form(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        let res = self.http.post(&self.token_url).form(form).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ApiError::Auth(format!(
                "token endpoint answered {status}: {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Auth(format!("unreadable token reply: {e}")))
    }
}

fn token_from_reply(
    reply: TokenResponse,
    refresh_token: String,
    previous_scope: Option<String>,
    now: DateTime<Utc>,
) -> Result<Token, ApiError> {
    let access_token = reply
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Auth("token reply lacks access_token".to_string()))?;
    let expires_in = reply
        .expires_in
        .ok_or_else(|| ApiError::Auth("token reply lacks expires_in".to_string()))?;
    if expires_in <= 0 {
        return Err(ApiError::Auth(format!(
            "token reply has non-positive expires_in: {expires_in}"
        )));
    }
    let expires_at = chrono::Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            ApiError::Auth(format!("token reply has out-of-range expires_in: {expires_in}"))
        })?;

    Ok(Token {
        access_token,
        refresh_token,
        scope: reply.scope.or(previous_scope),
        expires_at,
    })
}

/// Runs the complete interactive login.
///
/// 1. Starts a session and generates the PKCE pair
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the browser (or prints it)
/// 4. Waits until the callback has exchanged the code or reported an error
/// 5. Fetches the profile and stores it, tokens included, in the cache
pub async fn login(settings: &Settings, cache: &LibraryCache) -> Res<UserRecord> {
    let http = Client::new();
    let oauth = OAuthFlow::new(http.clone(), settings);

    let shared_session = Arc::new(Mutex::new(Session::new()));
    let challenge = {
        let mut session = shared_session.lock().await;
        session.begin_login().code_challenge
    };
    let auth_url = oauth.authorization_url(&challenge)?;

    let listener = server::bind(&settings.server_addr).await?;
    let server_state = CallbackState {
        session: Arc::clone(&shared_session),
        oauth,
    };
    let server_task = tokio::spawn(server::serve(listener, server_state));

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }
    info!("Waiting for Spotify authorization...");

    let outcome = wait_for_login(&shared_session, LOGIN_TIMEOUT).await;
    server_task.abort();
    let mut session = outcome?;

    let client = SpotifyClient::new(http, settings);
    let profile = client.current_user(&mut session).await?;
    let token = session.token().cloned().ok_or(ApiError::NotAuthenticated)?;

    let record = UserRecord {
        user_id: profile.id,
        display_name: profile.display_name,
        email: profile.email,
        token,
    };
    cache.store_user(&record).await?;

    Ok(record)
}

/// Polls the shared session until the callback moved it out of `PendingCode`.
async fn wait_for_login(
    shared_session: &Arc<Mutex<Session>>,
    max_wait: Duration,
) -> Result<Session, ApiError> {
    let start = tokio::time::Instant::now();

    while start.elapsed() < max_wait {
        {
            let session = shared_session.lock().await;
            match session.state() {
                AuthState::Authenticated => return Ok(session.clone()),
                AuthState::Unauthenticated => {
                    let reason = session.last_error().unwrap_or("login aborted");
                    return Err(ApiError::Auth(reason.to_string()));
                }
                AuthState::PendingCode | AuthState::Refreshing => {}
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err(ApiError::Auth(format!(
        "no authorization received within {} seconds",
        max_wait.as_secs()
    )))
}
