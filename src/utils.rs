use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{
    analysis::GenreRank,
    types::{
        GenreTableRow, PkcePair, Playlist, PlaylistRecord, PlaylistTableRow, TopTrack,
        TopTrackTableRow,
    },
};

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_pkce_pair() -> PkcePair {
    let code_verifier = generate_code_verifier();
    let code_challenge = generate_code_challenge(&code_verifier);
    PkcePair {
        code_verifier,
        code_challenge,
    }
}

pub fn generate_session_id() -> String {
    random_alphanumeric(24)
}

/// Joins artist names for the table, keeping at most `max` and noting the rest.
pub fn join_artist_names<'a>(names: impl Iterator<Item = &'a str>, max: usize) -> String {
    let names: Vec<&str> = names.collect();
    if names.len() <= max {
        return names.join(", ");
    }
    format!("{} (+{} more)", names[..max].join(", "), names.len() - max)
}

pub fn genre_table_rows(
    ranking: &[GenreRank],
    top: Option<usize>,
    max_artists: usize,
) -> Vec<GenreTableRow> {
    ranking
        .iter()
        .take(top.unwrap_or(ranking.len()))
        .enumerate()
        .map(|(i, rank)| GenreTableRow {
            rank: i + 1,
            genre: rank.genre.clone(),
            tracks: rank.count,
            artists: join_artist_names(
                rank.artists.iter().map(|a| a.name.as_str()),
                max_artists,
            ),
        })
        .collect()
}

pub fn playlist_table_rows(playlists: &[Playlist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .map(|p| PlaylistTableRow {
            id: p.id.clone(),
            name: p.name.clone(),
            tracks: p.tracks.as_ref().map_or(0, |t| t.total),
        })
        .collect()
}

/// Rows for playlists read back from the cache.
pub fn cached_playlist_table_rows(records: &[PlaylistRecord]) -> Vec<PlaylistTableRow> {
    records
        .iter()
        .map(|r| PlaylistTableRow {
            id: r.playlist_id.clone(),
            name: r.playlist_name.clone(),
            tracks: r.total_tracks,
        })
        .collect()
}

pub fn top_track_table_rows(tracks: &[TopTrack]) -> Vec<TopTrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TopTrackTableRow {
            rank: i + 1,
            name: t.name.clone(),
            popularity: t.popularity.map_or_else(|| "-".to_string(), |p| p.to_string()),
        })
        .collect()
}
