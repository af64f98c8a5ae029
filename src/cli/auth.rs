use crate::{error, management::LibraryCache, spotify, success};

pub async fn auth() {
    let settings = super::load_settings();
    let cache = LibraryCache::default_location();

    match spotify::auth::login(&settings, &cache).await {
        Ok(user) => success!(
            "Authentication successful! Logged in as {}",
            user.display_name.as_deref().unwrap_or(&user.user_id)
        ),
        Err(e) => error!("Authentication failed. Err: {}", e),
    }
}
