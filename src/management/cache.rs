use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    analysis::ArtistIndex,
    config,
    error::CacheError,
    types::{Playlist, PlaylistItem, PlaylistRecord, Token, TrackRow, UserRecord},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersTable {
    active: Option<String>,
    users: BTreeMap<String, UserRecord>,
}

/// JSON-file cache for the user profile, playlist metadata and track rows.
///
/// Every write is an independent insert-or-replace of one table file. Nothing
/// spans several calls, so an interrupted batch leaves a partial cache that
/// the next run simply overwrites.
///
/// Layout under the root:
/// - `users.json`
/// - `playlists.json`
/// - `tracks/<playlist id>.json`
/// - `artist-index.json`
#[derive(Debug, Clone)]
pub struct LibraryCache {
    root: PathBuf,
}

impl LibraryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn default_location() -> Self {
        Self::new(config::data_dir().join("cache"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Inserts or replaces the user and makes them the active one.
    pub async fn store_user(&self, record: &UserRecord) -> Result<(), CacheError> {
        let path = self.users_path();
        let mut table: UsersTable = read_table(&path).await?;
        table.active = Some(record.user_id.clone());
        table.users.insert(record.user_id.clone(), record.clone());
        write_table(&path, &table).await
    }

    pub async fn active_user(&self) -> Result<Option<UserRecord>, CacheError> {
        let mut table: UsersTable = read_table(&self.users_path()).await?;
        Ok(table
            .active
            .take()
            .and_then(|id| table.users.remove(&id)))
    }

    /// Replaces the stored token of a known user. Returns false for unknown users.
    pub async fn update_token(&self, user_id: &str, token: &Token) -> Result<bool, CacheError> {
        let path = self.users_path();
        let mut table: UsersTable = read_table(&path).await?;
        let Some(user) = table.users.get_mut(user_id) else {
            return Ok(false);
        };
        if &user.token == token {
            return Ok(true);
        }
        user.token = token.clone();
        write_table(&path, &table).await?;
        Ok(true)
    }

    pub async fn store_playlists(
        &self,
        user_id: &str,
        playlists: &[Playlist],
    ) -> Result<(), CacheError> {
        let path = self.playlists_path();
        let mut table: BTreeMap<String, PlaylistRecord> = read_table(&path).await?;
        for playlist in playlists {
            table.insert(
                playlist.id.clone(),
                PlaylistRecord {
                    playlist_id: playlist.id.clone(),
                    user_id: user_id.to_string(),
                    playlist_name: playlist.name.clone(),
                    total_tracks: playlist.tracks.as_ref().map_or(0, |t| t.total),
                },
            );
        }
        write_table(&path, &table).await
    }

    pub async fn playlists_for(&self, user_id: &str) -> Result<Vec<PlaylistRecord>, CacheError> {
        let table: BTreeMap<String, PlaylistRecord> = read_table(&self.playlists_path()).await?;
        Ok(table
            .into_values()
            .filter(|p| p.user_id == user_id)
            .collect())
    }

    /// Inserts or replaces rows by track id, keeping the playlist's other rows.
    pub async fn store_playlist_tracks(
        &self,
        playlist_id: &str,
        rows: &[TrackRow],
    ) -> Result<(), CacheError> {
        let path = self.tracks_path(playlist_id);
        let mut table: Vec<TrackRow> = read_table(&path).await?;
        for row in rows {
            match table.iter_mut().find(|r| r.track_id == row.track_id) {
                Some(existing) => *existing = row.clone(),
                None => table.push(row.clone()),
            }
        }
        write_table(&path, &table).await
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<TrackRow>, CacheError> {
        read_table(&self.tracks_path(playlist_id)).await
    }

    /// Removes a playlist and, with it, all of its track rows.
    /// Returns whether anything was cached for it.
    pub async fn remove_playlist(&self, playlist_id: &str) -> Result<bool, CacheError> {
        let path = self.playlists_path();
        let mut table: BTreeMap<String, PlaylistRecord> = read_table(&path).await?;
        let had_playlist = table.remove(playlist_id).is_some();
        if had_playlist {
            write_table(&path, &table).await?;
        }

        let had_tracks = match async_fs::remove_file(self.tracks_path(playlist_id)).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        Ok(had_playlist || had_tracks)
    }

    pub async fn store_artist_index(&self, index: &ArtistIndex) -> Result<(), CacheError> {
        write_table(&self.artist_index_path(), index).await
    }

    pub async fn artist_index(&self) -> Result<ArtistIndex, CacheError> {
        read_table(&self.artist_index_path()).await
    }

    fn users_path(&self) -> PathBuf {
        self.root.join("users.json")
    }

    fn playlists_path(&self) -> PathBuf {
        self.root.join("playlists.json")
    }

    fn artist_index_path(&self) -> PathBuf {
        self.root.join("artist-index.json")
    }

    fn tracks_path(&self, playlist_id: &str) -> PathBuf {
        let file: String = playlist_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.root.join("tracks").join(format!("{file}.json"))
    }
}

/// Cache rows for the playlist items. Removed tracks, tracks without an id
/// or artist and local files whose primary artist has no id are left out.
pub fn track_rows(playlist_id: &str, items: &[PlaylistItem]) -> Vec<TrackRow> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter_map(|track| {
            let track_id = track.id.clone()?;
            let artist = track.primary_artist().filter(|a| a.id.is_some())?;
            Some(TrackRow {
                playlist_id: playlist_id.to_string(),
                track_id,
                track_name: track.name.clone(),
                artist_name: artist.name.clone(),
            })
        })
        .collect()
}

async fn read_table<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CacheError> {
    match async_fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_table<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(value)?;
    async_fs::write(path, json).await?;
    Ok(())
}
