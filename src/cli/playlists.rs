use tabled::Table;

use crate::{error, info, management::LibraryCache, success, utils, warning};

use super::{Context, spinner};

pub async fn playlists(cached: bool) {
    if cached {
        return cached_playlists().await;
    }

    let mut ctx = Context::load().await;

    let pb = spinner("Fetching playlists...");
    let result = ctx.client.current_user_playlists(&mut ctx.session).await;
    pb.finish_and_clear();
    ctx.save_token().await;

    let playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to fetch playlists. Err: {}", e),
    };

    if playlists.is_empty() {
        info!("No playlists found.");
        return;
    }

    if let Err(e) = ctx
        .cache
        .store_playlists(&ctx.user.user_id, &playlists)
        .await
    {
        warning!("Failed to cache playlists. Err: {}", e);
    }

    println!("{}", Table::new(utils::playlist_table_rows(&playlists)));
    success!("Found {} playlists.", playlists.len());
}

/// Lists what the last online run stored, without touching the network.
async fn cached_playlists() {
    let cache = LibraryCache::default_location();

    let user = match cache.active_user().await {
        Ok(Some(user)) => user,
        Ok(None) => error!("No stored login. Please run genrescope auth"),
        Err(e) => error!("Failed to read cache. Err: {}", e),
    };

    let records = match cache.playlists_for(&user.user_id).await {
        Ok(records) => records,
        Err(e) => error!("Failed to read cached playlists. Err: {}", e),
    };

    if records.is_empty() {
        info!("No cached playlists. Run genrescope playlists first.");
        return;
    }

    println!("{}", Table::new(utils::cached_playlist_table_rows(&records)));
    success!("{} cached playlists.", records.len());
}
