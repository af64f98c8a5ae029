use chrono::{Duration, TimeZone, Utc};
use genrescope::analysis::ArtistIndex;
use genrescope::management::{LibraryCache, track_rows};
use genrescope::types::{
    Playlist, PlaylistItem, PlaylistTracksRef, Token, Track, TrackArtist, TrackRow, UserRecord,
};
use tempfile::TempDir;

fn cache() -> (TempDir, LibraryCache) {
    let dir = tempfile::tempdir().unwrap();
    let cache = LibraryCache::new(dir.path().join("cache"));
    (dir, cache)
}

fn token(access: &str) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: "refresh".to_string(),
        scope: None,
        expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn user(id: &str) -> UserRecord {
    UserRecord {
        user_id: id.to_string(),
        display_name: Some(format!("User {id}")),
        email: None,
        token: token(&format!("access-{id}")),
    }
}

fn playlist(id: &str, name: &str, total: u64) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        tracks: Some(PlaylistTracksRef { total }),
    }
}

fn row(playlist_id: &str, track_id: &str, track_name: &str) -> TrackRow {
    TrackRow {
        playlist_id: playlist_id.to_string(),
        track_id: track_id.to_string(),
        track_name: track_name.to_string(),
        artist_name: "Artist".to_string(),
    }
}

#[tokio::test]
async fn test_empty_cache_reads_as_empty() {
    let (_dir, cache) = cache();

    assert!(cache.active_user().await.unwrap().is_none());
    assert!(cache.playlists_for("anyone").await.unwrap().is_empty());
    assert!(cache.playlist_tracks("pl").await.unwrap().is_empty());
    assert!(cache.artist_index().await.unwrap().is_empty());
    assert!(!cache.remove_playlist("pl").await.unwrap());
}

#[tokio::test]
async fn test_store_user_switches_active_user() {
    let (_dir, cache) = cache();

    cache.store_user(&user("alice")).await.unwrap();
    assert_eq!(cache.active_user().await.unwrap(), Some(user("alice")));

    cache.store_user(&user("bob")).await.unwrap();
    assert_eq!(
        cache.active_user().await.unwrap().map(|u| u.user_id),
        Some("bob".to_string())
    );
}

#[tokio::test]
async fn test_update_token_replaces_stored_token() {
    let (_dir, cache) = cache();
    cache.store_user(&user("alice")).await.unwrap();

    let mut fresh = token("rotated");
    fresh.expires_at += Duration::hours(1);
    assert!(cache.update_token("alice", &fresh).await.unwrap());
    assert_eq!(cache.active_user().await.unwrap().unwrap().token, fresh);

    assert!(!cache.update_token("mallory", &fresh).await.unwrap());
}

#[tokio::test]
async fn test_playlists_are_upserted_per_user() {
    let (_dir, cache) = cache();

    cache
        .store_playlists("alice", &[playlist("p1", "Morning", 10), playlist("p2", "Night", 3)])
        .await
        .unwrap();
    cache
        .store_playlists("bob", &[playlist("p3", "Gym", 25)])
        .await
        .unwrap();
    cache
        .store_playlists("alice", &[playlist("p1", "Morning Mix", 12)])
        .await
        .unwrap();

    let alice = cache.playlists_for("alice").await.unwrap();
    assert_eq!(alice.len(), 2);
    assert_eq!(alice[0].playlist_id, "p1");
    assert_eq!(alice[0].playlist_name, "Morning Mix");
    assert_eq!(alice[0].total_tracks, 12);

    let bob = cache.playlists_for("bob").await.unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].playlist_name, "Gym");
}

#[tokio::test]
async fn test_track_rows_are_upserted_by_track_id() {
    let (_dir, cache) = cache();

    cache
        .store_playlist_tracks("pl", &[row("pl", "t1", "One"), row("pl", "t2", "Two")])
        .await
        .unwrap();
    cache
        .store_playlist_tracks("pl", &[row("pl", "t2", "Two (Remaster)"), row("pl", "t3", "Three")])
        .await
        .unwrap();

    let rows = cache.playlist_tracks("pl").await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.track_name.as_str()).collect();
    assert_eq!(names, vec!["One", "Two (Remaster)", "Three"]);
}

#[tokio::test]
async fn test_remove_playlist_drops_its_tracks() {
    let (_dir, cache) = cache();
    cache
        .store_playlists("alice", &[playlist("p1", "Keep", 1), playlist("p2", "Drop", 1)])
        .await
        .unwrap();
    cache
        .store_playlist_tracks("p2", &[row("p2", "t1", "One")])
        .await
        .unwrap();

    assert!(cache.remove_playlist("p2").await.unwrap());
    assert!(cache.playlist_tracks("p2").await.unwrap().is_empty());

    let left = cache.playlists_for("alice").await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].playlist_id, "p1");

    assert!(!cache.remove_playlist("p2").await.unwrap());
}

#[tokio::test]
async fn test_artist_index_survives_reload() {
    let (dir, cache) = cache();
    let mut index = ArtistIndex::default();
    index.insert("Daft Punk", "daft");
    index.insert("Justice", "justice");
    cache.store_artist_index(&index).await.unwrap();

    let reopened = LibraryCache::new(dir.path().join("cache"));
    let loaded = reopened.artist_index().await.unwrap();
    assert_eq!(loaded.get("Justice"), Some("justice"));
    assert_eq!(loaded.len(), 2);
}

#[test]
fn test_track_rows_skip_unusable_items() {
    let artist = TrackArtist {
        id: Some("a".to_string()),
        name: "A".to_string(),
    };
    let items = vec![
        PlaylistItem {
            track: Some(Track {
                id: Some("t1".to_string()),
                name: "Kept".to_string(),
                artists: vec![artist.clone()],
            }),
        },
        PlaylistItem { track: None },
        PlaylistItem {
            track: Some(Track {
                id: None,
                name: "Local file".to_string(),
                artists: vec![artist],
            }),
        },
        PlaylistItem {
            track: Some(Track {
                id: Some("t4".to_string()),
                name: "No artist".to_string(),
                artists: vec![],
            }),
        },
        PlaylistItem {
            track: Some(Track {
                id: Some("t5".to_string()),
                name: "Home recording".to_string(),
                artists: vec![TrackArtist {
                    id: None,
                    name: "Me".to_string(),
                }],
            }),
        },
    ];

    let rows = track_rows("pl", &items);
    assert_eq!(rows, vec![TrackRow {
        playlist_id: "pl".to_string(),
        track_id: "t1".to_string(),
        track_name: "Kept".to_string(),
        artist_name: "A".to_string(),
    }]);
}
