//! Playlist Genre Analyzer Library
//!
//! This library logs a user into the Spotify Web API with OAuth 2.0 PKCE,
//! fetches their playlists and ranks the genres of a playlist by how many
//! tracks carry them, with drill-down to an artist's top tracks. A local JSON
//! cache keeps the profile, tokens, playlist metadata and track rows.
//!
//! # Modules
//!
//! - `analysis` - Genre tally and ranking
//! - `api` - HTTP endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types
//! - `management` - Session, token store and the local cache
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify accounts service and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and table formatting
//!
//! # Example
//!
//! ```
//! use genrescope::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> genrescope::Res<()> {
//!     config::load_env().await?;
//!     cli::playlists(false).await;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for CLI glue and the interactive login, where errors from
/// several layers (`ApiError`, `CacheError`, I/O) meet and are only printed.
///
/// Library operations with a single failure domain return their own error
/// enum from [`mod@error`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Console output. Status lines go to stdout, warnings and errors to stderr.

/// Status line with a blue `o` marker.
///
/// ```
/// info!("Resolving genres for {} tracks...", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Completion line with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints the message with a red `!` to stderr and exits with status 1.
///
/// Only the CLI commands use this. Library code returns errors instead, so
/// the expression has type `!` and fits any match arm:
///
/// ```
/// let settings = match Settings::from_env() {
///     Ok(settings) => settings,
///     Err(e) => error!("Invalid configuration. Err: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Recoverable problem, yellow `!` on stderr.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
