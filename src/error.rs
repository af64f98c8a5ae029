//! Error types shared by the Spotify integration, the local cache and the
//! configuration layer.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the accounts service or the Web API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Token exchange or refresh was rejected, or the reply lacked the token fields.
    #[error("Spotify authentication failed: {0}")]
    Auth(String),

    /// A resource endpoint answered with a non-2xx status.
    #[error("Spotify API error {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// A 2xx reply that is not JSON or misses an expected key.
    #[error("Malformed Spotify response: {0}")]
    Malformed(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Session holds no token. Please run genrescope auth")]
    NotAuthenticated,

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Failures reading or writing the JSON cache tables.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("Cannot load environment file: {0}")]
    EnvFile(String),
}
