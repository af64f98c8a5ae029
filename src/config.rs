//! Configuration management for the playlist genre analyzer.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Only the client id is mandatory. Everything else falls back to the public
//! Spotify endpoints and a localhost callback.

use std::{env, path::PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-read-private";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_MARKET: &str = "US";

/// Returns the application's directory inside the platform data dir.
///
/// - Linux: `~/.local/share/genrescope`
/// - macOS: `~/Library/Application Support/genrescope`
/// - Windows: `%LOCALAPPDATA%/genrescope`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("genrescope");
    path
}

/// Loads environment variables from `<data dir>/.env` when the file exists.
///
/// A missing file is not an error, variables may come from the real
/// environment instead. A file that exists but cannot be parsed is.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::EnvFile(e.to_string()))?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile(e.to_string()))?;
    }
    Ok(())
}

/// Runtime settings for the OAuth flow, the Web API client and the callback server.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    /// Optional: PKCE does not need it, but confidential apps may still send it.
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub market: String,
    pub server_addr: String,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SPOTIFY_API_AUTH_CLIENT_ID` | required |
    /// | `SPOTIFY_API_AUTH_CLIENT_SECRET` | none |
    /// | `SPOTIFY_API_REDIRECT_URI` | `http://127.0.0.1:5000/callback` |
    /// | `SPOTIFY_API_AUTH_SCOPE` | `user-read-private user-read-email playlist-read-private` |
    /// | `SPOTIFY_API_AUTH_URL` | `https://accounts.spotify.com/authorize` |
    /// | `SPOTIFY_API_TOKEN_URL` | `https://accounts.spotify.com/api/token` |
    /// | `SPOTIFY_API_URL` | `https://api.spotify.com/v1` |
    /// | `SPOTIFY_MARKET` | `US` |
    /// | `SERVER_ADDRESS` | `127.0.0.1:5000` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = non_empty("SPOTIFY_API_AUTH_CLIENT_ID")
            .ok_or(ConfigError::MissingVar("SPOTIFY_API_AUTH_CLIENT_ID"))?;

        Ok(Self {
            client_id,
            client_secret: non_empty("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            redirect_uri: or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
            market: or_default("SPOTIFY_MARKET", DEFAULT_MARKET),
            server_addr: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        })
    }

    /// Settings pointing every endpoint at `base_url`; used against mock servers.
    pub fn for_base_url(client_id: &str, base_url: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: format!("{base_url}/authorize"),
            token_url: format!("{base_url}/api/token"),
            api_url: format!("{base_url}/v1"),
            market: DEFAULT_MARKET.to_string(),
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    non_empty(key).unwrap_or_else(|| default.to_string())
}
