//! # Spotify Integration Module
//!
//! The integration layer between genrescope and the Spotify accounts service
//! and Web API.
//!
//! ```text
//! CLI Layer
//!     ↓
//! Spotify Integration Layer
//!     ├── auth    (OAuth 2.0 PKCE: authorize URL, code exchange, refresh, login)
//!     ├── client  (authenticated GETs against the Web API)
//!     └── genres  (playlist genre analysis driven by artist lookups)
//!     ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication
//!
//! [`auth::OAuthFlow`] implements the authorization code flow with PKCE:
//! 1. **Code Verifier Generation**: 128 random alphanumeric characters
//! 2. **Challenge Creation**: base64url (no padding) of the verifier's SHA-256
//! 3. **Authorization Request**: the browser goes to Spotify with the challenge
//! 4. **Local Callback**: the redirect lands on the temporary HTTP server
//! 5. **Token Exchange**: code + verifier are traded for tokens
//!
//! The tokens live in the caller's [`crate::management::Session`], never in
//! process-wide state.
//!
//! ## Token Lifecycle
//!
//! [`client::SpotifyClient`] checks the session's expiry before every request
//! and refreshes once when it has passed. There is no retry beyond that
//! single refresh and no rate-limit handling.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user's profile
//! - `GET /me/playlists` - first page of the user's playlists
//! - `GET /playlists/{id}/tracks` - first page of a playlist's tracks
//! - `GET /artists/{id}` - genres, name and popularity
//! - `GET /artists/{id}/top-tracks` - top tracks in the configured market
//! - `GET /search?type=artist` - artist lookup by name
//! - `POST /api/token` - code exchange and refresh
//!
//! ## Error Types
//!
//! Everything returns [`crate::error::ApiError`]; nothing in this module
//! terminates the process.

pub mod auth;
pub mod client;
pub mod genres;
