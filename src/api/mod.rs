//! # API Module
//!
//! HTTP endpoints of the short-lived local server that runs during
//! `genrescope auth`.
//!
//! - [`callback`] - receives the OAuth redirect, short-circuits on an
//!   `error` parameter, otherwise exchanges the code with the session's PKCE
//!   verifier and marks the session authenticated.
//! - [`health`] - service, version and the pending login's state.
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use genrescope::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```

mod callback;
mod health;

pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
