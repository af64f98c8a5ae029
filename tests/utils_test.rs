use chrono::{Duration, Utc};
use genrescope::analysis::{ArtistPopularity, GenreRank};
use genrescope::management::{AuthState, Session, TokenStore};
use genrescope::spotify::auth::build_authorization_url;
use genrescope::types::{PlaylistRecord, Token};
use genrescope::utils::*;
use std::collections::HashMap;

fn test_token(expires_in_secs: i64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: None,
        expires_at: Utc::now() + Duration::seconds(expires_in_secs),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters, well above the 43 character minimum
    assert_eq!(verifier.len(), 128);

    // Should contain only URL-safe characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // base64url(sha256(verifier)) without padding, computed independently
    let challenge = generate_code_challenge("genrescope-fixed-verifier-0123456789-abcdefghij");
    assert_eq!(challenge, "14VdEbb46hbZie3ESldsEG5jmXEO91ET3me-7v1w3ho");
}

#[test]
fn test_generate_code_challenge_is_unpadded_base64url() {
    let challenge = generate_code_challenge("test_verifier_123");

    // SHA-256 is 32 bytes, 43 characters once base64url encoded without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
    assert_eq!(challenge, generate_code_challenge("test_verifier_123"));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));
}

#[test]
fn test_pkce_pair_challenge_matches_verifier() {
    for _ in 0..10 {
        let pair = generate_pkce_pair();
        assert_eq!(
            pair.code_challenge,
            generate_code_challenge(&pair.code_verifier)
        );
    }
}

#[test]
fn test_authorization_url_parameters() {
    let pair = generate_pkce_pair();
    let url = build_authorization_url(
        "https://accounts.spotify.com/authorize",
        "client-123",
        "http://127.0.0.1:5000/callback",
        "user-read-private playlist-read-private",
        &pair.code_challenge,
    )
    .unwrap();

    assert_eq!(url.host_str(), Some("accounts.spotify.com"));
    assert_eq!(url.path(), "/authorize");

    let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    assert_eq!(
        keys,
        vec![
            "client_id",
            "response_type",
            "scope",
            "redirect_uri",
            "code_challenge_method",
            "code_challenge"
        ]
    );

    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "client-123");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["scope"], "user-read-private playlist-read-private");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1:5000/callback");
    assert_eq!(params["code_challenge_method"], "S256");
    assert_eq!(params["code_challenge"], pair.code_challenge);
}

#[test]
fn test_authorization_url_is_deterministic() {
    let build = || {
        build_authorization_url(
            "https://accounts.spotify.com/authorize",
            "client",
            "http://localhost/callback",
            "playlist-read-private",
            "challenge",
        )
        .unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn test_token_store_expiry() {
    let mut store = TokenStore::new();
    assert!(store.get().is_none());
    assert!(!store.is_expired());

    let token = test_token(60);
    let expires_at = token.expires_at;
    store.set(token);

    assert!(!store.is_expired());
    assert!(!store.is_expired_at(expires_at));
    assert!(store.is_expired_at(expires_at + Duration::seconds(1)));

    store.clear();
    assert!(store.get().is_none());
}

#[test]
fn test_session_login_lifecycle() {
    let mut session = Session::new();
    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(!session.id().is_empty());

    let pair = session.begin_login();
    assert_eq!(session.state(), AuthState::PendingCode);
    assert_eq!(session.code_verifier(), Some(pair.code_verifier.as_str()));

    session.complete_login(test_token(3600));
    assert_eq!(session.state(), AuthState::Authenticated);
    assert!(session.code_verifier().is_none());
    assert!(session.token().is_some());
}

#[test]
fn test_session_failed_login_returns_to_unauthenticated() {
    let mut session = Session::new();
    session.begin_login();
    session.fail_login("access_denied");

    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(session.code_verifier().is_none());
    assert_eq!(session.last_error(), Some("access_denied"));
    assert!(session.token().is_none());
}

#[test]
fn test_sessions_have_distinct_ids() {
    assert_ne!(Session::new().id(), Session::new().id());
}

#[test]
fn test_join_artist_names() {
    let names = ["A", "B", "C"];
    assert_eq!(join_artist_names(names.iter().copied(), 5), "A, B, C");
    assert_eq!(join_artist_names(names.iter().copied(), 2), "A, B (+1 more)");
    assert_eq!(join_artist_names(std::iter::empty::<&str>(), 2), "");
}

#[test]
fn test_genre_table_rows_respects_top() {
    let ranking = vec![
        GenreRank {
            genre: "rock".to_string(),
            count: 3,
            artists: vec![
                ArtistPopularity {
                    name: "A".to_string(),
                    popularity: 80,
                },
                ArtistPopularity {
                    name: "B".to_string(),
                    popularity: 60,
                },
            ],
        },
        GenreRank {
            genre: "pop".to_string(),
            count: 2,
            artists: vec![ArtistPopularity {
                name: "A".to_string(),
                popularity: 80,
            }],
        },
    ];

    let rows = genre_table_rows(&ranking, Some(1), 5);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].genre, "rock");
    assert_eq!(rows[0].tracks, 3);
    assert_eq!(rows[0].artists, "A, B");

    assert_eq!(genre_table_rows(&ranking, None, 5).len(), 2);
    assert_eq!(genre_table_rows(&ranking, Some(10), 5).len(), 2);
}

#[test]
fn test_cached_playlist_table_rows() {
    let records = vec![PlaylistRecord {
        playlist_id: "p1".to_string(),
        user_id: "alice".to_string(),
        playlist_name: "Morning".to_string(),
        total_tracks: 12,
    }];

    let rows = cached_playlist_table_rows(&records);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "p1");
    assert_eq!(rows[0].name, "Morning");
    assert_eq!(rows[0].tracks, 12);
}
