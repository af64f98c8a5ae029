use tabled::Table;

use crate::{error, info, utils, warning};

use super::{Context, spinner};

pub async fn top_tracks(artist: String, by_id: bool) {
    let mut ctx = Context::load().await;

    let artist_id = if by_id {
        artist.clone()
    } else {
        match resolve_artist_id(&mut ctx, &artist).await {
            Some(id) => id,
            None => {
                warning!("No artist exists with this name.");
                return;
            }
        }
    };

    let pb = spinner("Fetching top tracks...");
    let result = ctx
        .client
        .artist_top_tracks(&mut ctx.session, &artist_id)
        .await;
    pb.finish_and_clear();
    ctx.save_token().await;

    match result {
        Ok(tracks) if tracks.is_empty() => info!("No top tracks for {}.", artist),
        Ok(tracks) => println!("{}", Table::new(utils::top_track_table_rows(&tracks))),
        Err(e) => error!("Failed to fetch top tracks. Err: {}", e),
    }
}

/// Looks the name up in the last analysis first, then asks the search endpoint.
async fn resolve_artist_id(ctx: &mut Context, name: &str) -> Option<String> {
    match ctx.cache.artist_index().await {
        Ok(index) => {
            if let Some(id) = index.resolve(name) {
                return Some(id.to_string());
            }
        }
        Err(e) => warning!("Failed to read artist index. Err: {}", e),
    }

    let result = ctx.client.search_artist(&mut ctx.session, name).await;
    ctx.save_token().await;
    match result {
        Ok(found) => found.map(|artist| artist.id),
        Err(e) => error!("Artist search failed. Err: {}", e),
    }
}
