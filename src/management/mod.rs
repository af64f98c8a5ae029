mod auth;
mod cache;

pub use auth::AuthState;
pub use auth::Session;
pub use auth::TokenStore;
pub use cache::LibraryCache;
pub use cache::track_rows;
