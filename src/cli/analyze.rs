use tabled::Table;

use crate::{
    error, info, management::track_rows, spotify::genres::analyze_playlist_genres, success, utils,
    warning,
};

use super::{Context, spinner};

/// Artists shown per genre row before the rest is summarized.
const ARTISTS_PER_ROW: usize = 5;

pub async fn analyze(playlist_id: String, top: Option<usize>) {
    let mut ctx = Context::load().await;

    let pb = spinner("Fetching playlist tracks...");
    let items = match ctx
        .client
        .playlist_tracks(&mut ctx.session, &playlist_id)
        .await
    {
        Ok(items) => items,
        Err(e) => {
            pb.finish_and_clear();
            ctx.save_token().await;
            error!("Failed to fetch playlist tracks. Err: {}", e);
        }
    };

    let rows = track_rows(&playlist_id, &items);
    if let Err(e) = ctx.cache.store_playlist_tracks(&playlist_id, &rows).await {
        warning!("Failed to cache playlist tracks. Err: {}", e);
    }

    pb.set_message(format!("Resolving genres for {} tracks...", rows.len()));
    let result = analyze_playlist_genres(&ctx.client, &mut ctx.session, &items).await;
    pb.finish_and_clear();
    ctx.save_token().await;

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(e) => error!("Genre analysis failed. Err: {}", e),
    };

    if let Err(e) = ctx.cache.store_artist_index(&analysis.artist_index).await {
        warning!("Failed to cache artist index. Err: {}", e);
    }

    if analysis.ranking.is_empty() {
        warning!("None of the artists in this playlist carry a genre.");
        return;
    }

    println!(
        "{}",
        Table::new(utils::genre_table_rows(
            &analysis.ranking,
            top,
            ARTISTS_PER_ROW
        ))
    );

    info!("Select an artist to view top tracks (genrescope top-tracks <name>):");
    let names: Vec<&str> = analysis.artist_index.iter().map(|(name, _)| name).collect();
    println!("{}", names.join(", "));

    success!(
        "Found {} genres across {} tracks.",
        analysis.ranking.len(),
        rows.len()
    );
}
