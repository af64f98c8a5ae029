//! # CLI Module
//!
//! User-facing commands. Each command loads the configuration and the stored
//! login, drives the Spotify integration, renders tables and writes any
//! refreshed token back to the cache.
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Management Layer (Session, Cache)
//!     ↓
//! Spotify Layer (OAuth, Web API, Genre Analysis)
//! ```
//!
//! ## Commands
//!
//! - [`auth`] - interactive PKCE login, stores profile and tokens
//! - [`playlists`] - lists the user's playlists and caches their metadata;
//!   `--cached` lists the stored metadata offline
//! - [`analyze`] - genre ranking of one playlist, caches its tracks
//! - [`top_tracks`] - an artist's top tracks, by name or id
//! - [`forget`] - drops a playlist and its tracks from the cache
//!
//! Commands are the only place allowed to terminate the process; they do so
//! through the [`crate::error!`] macro after printing the cause.
//!
//! ## Usage
//!
//! ```bash
//! genrescope auth
//! genrescope playlists
//! genrescope playlists --cached
//! genrescope analyze 37i9dQZF1DXcBWIGoYBM5M --top 10
//! genrescope top-tracks "Daft Punk"
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Settings,
    error,
    management::{LibraryCache, Session},
    spotify::client::SpotifyClient,
    types::UserRecord,
    warning,
};

mod analyze;
mod auth;
mod forget;
mod playlists;
mod top_tracks;

pub use analyze::analyze;
pub use auth::auth;
pub use forget::forget;
pub use playlists::playlists;
pub use top_tracks::top_tracks;

/// Everything an authenticated command needs.
struct Context {
    cache: LibraryCache,
    client: SpotifyClient,
    user: UserRecord,
    session: Session,
}

impl Context {
    async fn load() -> Self {
        let settings = load_settings();
        let cache = LibraryCache::default_location();

        let user = match cache.active_user().await {
            Ok(Some(user)) => user,
            Ok(None) => error!("No stored login. Please run genrescope auth"),
            Err(e) => error!(
                "Failed to load stored login. Please run genrescope auth\n Error: {}",
                e
            ),
        };

        Self {
            session: Session::restore(user.token.clone()),
            client: SpotifyClient::from_settings(&settings),
            cache,
            user,
        }
    }

    /// Writes the session's token back so a refresh survives the process.
    async fn save_token(&self) {
        if let Some(token) = self.session.token() {
            if let Err(e) = self.cache.update_token(&self.user.user_id, token).await {
                warning!("Failed to save refreshed token. Err: {}", e);
            }
        }
    }
}

fn load_settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
