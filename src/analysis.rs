//! Genre aggregation for a playlist.
//!
//! [`GenreTally`] is fed one resolved primary artist per track and turns the
//! accumulated counts into a [`GenreAnalysis`]: genres ranked by how many
//! tracks carry them, each with its artists ranked by popularity. Both sorts
//! are stable, so equal keys keep the order they were first seen in.
//!
//! The upstream lookups that feed the tally live in
//! [`crate::spotify::genres`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{ArtistDetail, PlaylistItem};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistPopularity {
    pub name: String,
    pub popularity: u8,
}

/// Accumulated data for one genre.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreEntry {
    /// Number of tracks whose primary artist carries the genre.
    pub count: u32,
    /// Unique `(name, popularity)` pairs in first-seen order.
    pub artists: Vec<ArtistPopularity>,
}

impl GenreEntry {
    fn record(&mut self, artist: &ArtistPopularity) {
        self.count += 1;
        if !self.artists.contains(artist) {
            self.artists.push(artist.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRank {
    pub genre: String,
    pub count: u32,
    pub artists: Vec<ArtistPopularity>,
}

/// Display name to artist id, in first-seen order.
///
/// Two different ids sharing a display name overwrite each other: the last
/// id recorded for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistIndex {
    entries: Vec<(String, String)>,
}

impl ArtistIndex {
    pub fn insert(&mut self, name: &str, id: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = id.to_string(),
            None => self.entries.push((name.to_string(), id.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| id.as_str())
    }

    /// Exact match first, then a case-insensitive one.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| {
            let needle = name.to_lowercase();
            self.entries
                .iter()
                .find(|(n, _)| n.to_lowercase() == needle)
                .map(|(_, id)| id.as_str())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, id)| (n.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreAnalysis {
    pub ranking: Vec<GenreRank>,
    pub artist_index: ArtistIndex,
}

#[derive(Debug, Default)]
pub struct GenreTally {
    order: Vec<String>,
    entries: HashMap<String, GenreEntry>,
    artist_index: ArtistIndex,
}

impl GenreTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one track whose primary artist is `artist_id`, resolved to `artist`.
    ///
    /// A genre listed twice by the same artist still counts once for the track.
    pub fn record_track(&mut self, artist_id: &str, artist: &ArtistDetail) {
        self.artist_index.insert(&artist.name, artist_id);

        let who = ArtistPopularity {
            name: artist.name.clone(),
            popularity: artist.popularity,
        };

        let mut seen = HashSet::new();
        for genre in &artist.genres {
            if !seen.insert(genre.as_str()) {
                continue;
            }
            if !self.entries.contains_key(genre) {
                self.order.push(genre.clone());
            }
            self.entries.entry(genre.clone()).or_default().record(&who);
        }
    }

    pub fn entry(&self, genre: &str) -> Option<&GenreEntry> {
        self.entries.get(genre)
    }

    pub fn genre_count(&self) -> usize {
        self.order.len()
    }

    pub fn into_analysis(mut self) -> GenreAnalysis {
        let mut ranking: Vec<GenreRank> = self
            .order
            .into_iter()
            .filter_map(|genre| {
                self.entries.remove(&genre).map(|entry| {
                    let mut artists = entry.artists;
                    // sort_by is stable, ties keep first-seen order
                    artists.sort_by(|a, b| b.popularity.cmp(&a.popularity));
                    GenreRank {
                        genre,
                        count: entry.count,
                        artists,
                    }
                })
            })
            .collect();

        ranking.sort_by(|a, b| b.count.cmp(&a.count));

        GenreAnalysis {
            ranking,
            artist_index: self.artist_index,
        }
    }
}

/// Primary artist of a playlist track, with the id Spotify knows it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryArtist<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

/// Primary artists of the playlist items, skipping removed tracks, tracks
/// without any artist and local files whose primary artist has no id.
pub fn primary_artists(items: &[PlaylistItem]) -> impl Iterator<Item = PrimaryArtist<'_>> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter_map(|track| track.primary_artist())
        .filter_map(|artist| {
            Some(PrimaryArtist {
                id: artist.id.as_deref()?,
                name: &artist.name,
            })
        })
}
