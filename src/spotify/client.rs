use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::Settings,
    error::ApiError,
    info,
    management::Session,
    spotify::auth::OAuthFlow,
    types::{
        ArtistDetail, GetUserPlaylistsResponse, Playlist, PlaylistItem, PlaylistTracksResponse,
        TopTrack, TopTracksResponse, UserProfile,
    },
};

/// Field filter for playlist tracks: only what the genre analysis needs.
const PLAYLIST_TRACK_FIELDS: &str = "items(track(name,id,artists(name,id)))";

/// Authenticated access to the Spotify Web API.
///
/// Every call takes the caller's [`Session`]; a stale access token is
/// refreshed (one attempt) before the request goes out.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    market: String,
    oauth: OAuthFlow,
}

impl SpotifyClient {
    pub fn new(http: Client, settings: &Settings) -> Self {
        Self {
            oauth: OAuthFlow::new(http.clone(), settings),
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            market: settings.market.clone(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Client::new(), settings)
    }

    pub fn oauth(&self) -> &OAuthFlow {
        &self.oauth
    }

    /// Refreshes the session's token when it is past its expiration.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotAuthenticated`] without a token, otherwise whatever the
    /// refresh returned. A failed refresh leaves the old token in place.
    pub async fn ensure_fresh_token(&self, session: &mut Session) -> Result<(), ApiError> {
        let Some(token) = session.token().cloned() else {
            return Err(ApiError::NotAuthenticated);
        };
        if !session.tokens().is_expired() {
            return Ok(());
        }

        info!("Token expired, refreshing...");
        session.begin_refresh();
        match self.oauth.refresh(&token).await {
            Ok(fresh) => {
                session.finish_refresh(Some(fresh));
                Ok(())
            }
            Err(e) => {
                session.finish_refresh(None);
                Err(e)
            }
        }
    }

    /// GET `path` (relative to the API base) with bearer auth and return the JSON body.
    pub async fn authorized_get(
        &self,
        session: &mut Session,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        self.ensure_fresh_token(session).await?;
        let token = session.token().ok_or(ApiError::NotAuthenticated)?;

        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        let res = self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ApiError::Http { status, body });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(format!("{path}: {e}")))
    }

    async fn get_as<T: DeserializeOwned>(
        &self,
        session: &mut Session,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let json = self.authorized_get(session, path, query).await?;
        decode(path, json)
    }

    pub async fn current_user(&self, session: &mut Session) -> Result<UserProfile, ApiError> {
        self.get_as(session, "me", &[]).await
    }

    /// First page of the current user's playlists.
    pub async fn current_user_playlists(
        &self,
        session: &mut Session,
    ) -> Result<Vec<Playlist>, ApiError> {
        let res: GetUserPlaylistsResponse = self.get_as(session, "me/playlists", &[]).await?;
        Ok(res.items)
    }

    /// First page of a playlist's items, limited to track id, name and artists.
    pub async fn playlist_tracks(
        &self,
        session: &mut Session,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ApiError> {
        let path = format!("playlists/{playlist_id}/tracks");
        let res: PlaylistTracksResponse = self
            .get_as(
                session,
                &path,
                &[("market", self.market.as_str()), ("fields", PLAYLIST_TRACK_FIELDS)],
            )
            .await?;
        Ok(res.items)
    }

    pub async fn artist(
        &self,
        session: &mut Session,
        artist_id: &str,
    ) -> Result<ArtistDetail, ApiError> {
        self.get_as(session, &format!("artists/{artist_id}"), &[]).await
    }

    pub async fn artist_top_tracks(
        &self,
        session: &mut Session,
        artist_id: &str,
    ) -> Result<Vec<TopTrack>, ApiError> {
        let path = format!("artists/{artist_id}/top-tracks");
        let res: TopTracksResponse = self
            .get_as(session, &path, &[("market", self.market.as_str())])
            .await?;
        Ok(res.tracks)
    }

    /// Best match for an artist name, or `None` when the search has no result.
    ///
    /// A reply without an `artists.items` list counts as no result rather
    /// than a malformed response.
    pub async fn search_artist(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<Option<ArtistDetail>, ApiError> {
        let json = self
            .authorized_get(
                session,
                "search",
                &[("q", name), ("type", "artist"), ("limit", "1")],
            )
            .await?;

        let first = json
            .get("artists")
            .and_then(|artists| artists.get("items"))
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .cloned();

        match first {
            Some(artist) => decode("search", artist).map(Some),
            None => Ok(None),
        }
    }
}

fn decode<T: DeserializeOwned>(path: &str, json: Value) -> Result<T, ApiError> {
    serde_json::from_value(json).map_err(|e| ApiError::Malformed(format!("{path}: {e}")))
}
