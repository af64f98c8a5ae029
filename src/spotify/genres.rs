use std::collections::HashMap;

use crate::{
    analysis::{GenreAnalysis, GenreTally, primary_artists},
    error::ApiError,
    management::Session,
    spotify::client::SpotifyClient,
    types::{ArtistDetail, PlaylistItem},
};

/// Ranks the genres of a playlist by the number of tracks carrying them.
///
/// Each track contributes its primary artist's genres. Artists are looked up
/// sequentially, once per distinct id, and the first failing lookup aborts
/// the whole analysis: no partial ranking is returned.
pub async fn analyze_playlist_genres(
    client: &SpotifyClient,
    session: &mut Session,
    items: &[PlaylistItem],
) -> Result<GenreAnalysis, ApiError> {
    let mut resolved: HashMap<String, ArtistDetail> = HashMap::new();
    let mut tally = GenreTally::new();

    for artist in primary_artists(items) {
        let detail = match resolved.get(artist.id) {
            Some(detail) => detail.clone(),
            None => {
                let detail = client.artist(session, artist.id).await?;
                resolved.insert(artist.id.to_string(), detail.clone());
                detail
            }
        };
        tally.record_track(artist.id, &detail);
    }

    Ok(tally.into_analysis())
}
