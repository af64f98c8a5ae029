use chrono::{DateTime, Utc};

use crate::{
    types::{PkcePair, Token},
    utils,
};

/// Where a session stands in the authorization code flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    PendingCode,
    Authenticated,
    Refreshing,
}

impl AuthState {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::PendingCode => "pending_code",
            AuthState::Authenticated => "authenticated",
            AuthState::Refreshing => "refreshing",
        }
    }
}

/// Tokens of a single session.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Option<Token>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, token: Token) {
        self.token = Some(token);
    }

    pub fn get(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// True once `now` is past the expiration instant. An empty store is not
    /// expired, there is simply nothing to refresh.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.token.as_ref().is_some_and(|t| now > t.expires_at)
    }
}

/// One user's login, from the authorization redirect until the process exits.
///
/// The PKCE verifier lives here while the redirect is outstanding and is
/// dropped once the code has been exchanged (or the login failed).
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    state: AuthState,
    code_verifier: Option<String>,
    tokens: TokenStore,
    last_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: utils::generate_session_id(),
            state: AuthState::Unauthenticated,
            code_verifier: None,
            tokens: TokenStore::new(),
            last_error: None,
        }
    }

    /// Session for a token loaded from the cache.
    pub fn restore(token: Token) -> Self {
        let mut session = Self::new();
        session.tokens.set(token);
        session.state = AuthState::Authenticated;
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn code_verifier(&self) -> Option<&str> {
        self.code_verifier.as_deref()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn token(&self) -> Option<&Token> {
        self.tokens.get()
    }

    /// Starts a login attempt and returns the fresh PKCE pair. Any previous
    /// tokens are dropped.
    pub fn begin_login(&mut self) -> PkcePair {
        let pair = utils::generate_pkce_pair();
        self.code_verifier = Some(pair.code_verifier.clone());
        self.tokens.clear();
        self.last_error = None;
        self.state = AuthState::PendingCode;
        pair
    }

    pub fn complete_login(&mut self, token: Token) {
        self.tokens.set(token);
        self.code_verifier = None;
        self.last_error = None;
        self.state = AuthState::Authenticated;
    }

    pub fn fail_login(&mut self, reason: impl Into<String>) {
        self.code_verifier = None;
        self.last_error = Some(reason.into());
        self.state = AuthState::Unauthenticated;
    }

    pub(crate) fn begin_refresh(&mut self) {
        self.state = AuthState::Refreshing;
    }

    /// Ends a refresh. On failure the old token stays in place.
    pub(crate) fn finish_refresh(&mut self, token: Option<Token>) {
        if let Some(token) = token {
            self.tokens.set(token);
        }
        self.state = AuthState::Authenticated;
    }
}
