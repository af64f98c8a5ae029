use crate::{error, info, management::LibraryCache, success, warning};

pub async fn forget(playlist_id: String) {
    let cache = LibraryCache::default_location();

    let cached_tracks = match cache.playlist_tracks(&playlist_id).await {
        Ok(rows) => rows.len(),
        Err(e) => {
            warning!("Cached tracks are unreadable and will be dropped. Err: {}", e);
            0
        }
    };

    match cache.remove_playlist(&playlist_id).await {
        Ok(true) => success!(
            "Removed playlist {} and {} cached tracks.",
            playlist_id,
            cached_tracks
        ),
        Ok(false) => info!("Nothing cached for playlist {}.", playlist_id),
        Err(e) => error!("Failed to update cache. Err: {}", e),
    }
}
