//! Spotify catalog client.
//!
//! A client-credentials session is established once at construction and
//! held as an explicit [`Session`] value.  Every identity resolution is
//! gated by the fuzzy match in [`crate::fuzzy`]; derived lookups (album,
//! related artists, top tracks, audio features) compose on identity
//! resolution and skip their detail fetch when the identity step fails.
//!
//! Credentials: client id + secret from `spotify_credentials.toml` (next
//! to the binary, `/etc/tabscout/`, or `~/.config/tabscout/`).

use std::path::PathBuf;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{debug, warn};
use serde::Deserialize;

use crate::error::LookupError;
use crate::fuzzy;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";
const API_BASE: &str = "https://api.spotify.com/v1";

/// Fixed regional market for top-track queries.
const TOP_TRACKS_MARKET: &str = "ES";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Credentials ──────────────────────────────────────────────────────────────

/// Client id + secret for the catalog API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Try to load credentials from known paths, return None if not found.
pub fn load_credentials() -> Option<Credentials> {
    let mut paths = vec![
        // Next to the binary / workspace root
        PathBuf::from("spotify_credentials.toml"),
        // System-wide
        PathBuf::from("/etc/tabscout/spotify_credentials.toml"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".config/tabscout/spotify_credentials.toml"));
    }

    for path in &paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            if let Ok(table) = content.parse::<toml::Table>() {
                let client_id = table.get("client_id")?.as_str()?.to_string();
                let client_secret = table.get("client_secret")?.as_str()?.to_string();
                return Some(Credentials {
                    client_id,
                    client_secret,
                });
            }
        }
    }

    None
}

// ── Session ──────────────────────────────────────────────────────────────────

/// Outcome of the construction-time credential exchange.
///
/// An unauthenticated session keeps the client usable; every lookup then
/// reports "no result" until a new client is connected.
#[derive(Debug, Clone)]
pub enum Session {
    /// Bearer token obtained from the client-credentials exchange.
    Bearer(String),
    /// The exchange could not be completed; lookups are degraded.
    Unauthenticated,
}

/// Token-endpoint payload.  A present `error` field means the credentials
/// were explicitly rejected.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── API response types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: Option<Paging<ApiArtist>>,
    #[serde(default)]
    tracks: Option<Paging<ApiTrack>>,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiArtist {
    id: String,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    images: Vec<ApiImage>,
    #[serde(default)]
    external_urls: ApiExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ApiTrackArtist>,
    album: ApiAlbumRef,
    #[serde(default)]
    popularity: u32,
}

#[derive(Debug, Deserialize)]
struct ApiTrackArtist {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiAlbumRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    name: String,
    #[serde(default)]
    artists: Vec<ApiTrackArtist>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    total_tracks: u32,
    #[serde(default)]
    images: Vec<ApiImage>,
    #[serde(default)]
    external_urls: ApiExternalUrls,
    tracks: Paging<ApiAlbumTrack>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiAlbumTrack {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RelatedArtistsResponse {
    #[serde(default)]
    artists: Vec<ApiArtist>,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiAudioFeatures {
    #[serde(default)]
    tempo: f64,
    #[serde(default)]
    key: i32,
    #[serde(default)]
    mode: i32,
    #[serde(default)]
    time_signature: i32,
    #[serde(default)]
    danceability: f64,
    #[serde(default)]
    energy: f64,
}

// ── Resolved identities and summaries ────────────────────────────────────────

/// Canonical artist record resolved from a free-text name.
#[derive(Debug, Clone)]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    /// Popularity score in [0, 100].
    pub popularity: u32,
    pub image_url: Option<String>,
    pub profile_url: Option<String>,
}

/// Canonical track record resolved from a free-text (title, artist) pair.
#[derive(Debug, Clone)]
pub struct TrackIdentity {
    pub id: String,
    /// Title as named by the catalog (edition suffix included).
    pub name: String,
    /// Primary artist as named by the catalog.
    pub artist: String,
    pub album_id: String,
    pub popularity: u32,
}

/// Album details derived from a resolved track.
#[derive(Debug, Clone)]
pub struct AlbumSummary {
    pub name: String,
    pub artist: String,
    pub label: Option<String>,
    pub popularity: u32,
    pub release_date: Option<String>,
    pub track_count: u32,
    pub tracks: Vec<String>,
    pub image_url: Option<String>,
    pub album_url: Option<String>,
}

/// Title + popularity pair from an artist's top-tracks roster.
#[derive(Debug, Clone)]
pub struct TopTrack {
    pub title: String,
    pub popularity: u32,
}

/// Audio descriptors for a resolved track.
#[derive(Debug, Clone)]
pub struct AudioFeatures {
    pub tempo: f64,
    pub key: i32,
    pub mode: i32,
    pub time_signature: i32,
    pub danceability: f64,
    pub energy: f64,
}

impl From<ApiArtist> for ArtistSummary {
    fn from(api: ApiArtist) -> Self {
        // Prefer the mid-size rendition when the catalog provides several.
        let image_url = if api.images.len() > 1 {
            Some(api.images[1].url.clone())
        } else {
            api.images.first().map(|i| i.url.clone())
        };
        ArtistSummary {
            id: api.id,
            name: api.name,
            genres: api.genres,
            popularity: api.popularity,
            image_url,
            profile_url: api.external_urls.spotify,
        }
    }
}

impl From<ApiAlbum> for AlbumSummary {
    fn from(api: ApiAlbum) -> Self {
        AlbumSummary {
            artist: api
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            name: api.name,
            label: api.label,
            popularity: api.popularity,
            release_date: api.release_date,
            track_count: api.total_tracks,
            tracks: api.tracks.items.into_iter().map(|t| t.name).collect(),
            image_url: api.images.first().map(|i| i.url.clone()),
            album_url: api.external_urls.spotify,
        }
    }
}

// ── Match gates ──────────────────────────────────────────────────────────────

/// Gate an artist candidate against the queried name.
fn artist_candidate_matches(candidate: &str, query: &str) -> bool {
    fuzzy::is_match(query, candidate, fuzzy::SIMILARITY_THRESHOLD)
}

/// Gate a track candidate against the queried title and artist.  Both the
/// title check (after edition-suffix stripping) and the primary-artist
/// check must pass independently.
fn track_candidate_matches(
    candidate_title: &str,
    candidate_artist: &str,
    title: &str,
    artist: &str,
) -> bool {
    fuzzy::is_match(artist, candidate_artist, fuzzy::SIMILARITY_THRESHOLD)
        && fuzzy::is_match(
            title,
            fuzzy::strip_edition_suffix(candidate_title),
            fuzzy::SIMILARITY_THRESHOLD,
        )
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Catalog client holding one agent and the session established at
/// construction.
pub struct Catalog {
    agent: ureq::Agent,
    session: Session,
}

impl Catalog {
    /// Exchange client credentials for a bearer session.
    ///
    /// Transport failures and non-success statuses leave the client
    /// unauthenticated rather than failing; an explicit error payload in a
    /// completed exchange is `Err(InvalidCredentials)`.
    pub fn connect(credentials: &Credentials) -> Result<Self, LookupError> {
        Self::connect_with_timeout(credentials, DEFAULT_TIMEOUT)
    }

    pub fn connect_with_timeout(
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        let basic = BASE64.encode(format!(
            "{}:{}",
            credentials.client_id, credentials.client_secret
        ));

        let response = match agent
            .post(TOKEN_URL)
            .set("Authorization", &format!("Basic {}", basic))
            .send_form(&[("grant_type", "client_credentials")])
        {
            Ok(r) => r,
            Err(e) => {
                warn!("credential exchange unavailable: {}", e);
                return Ok(Self {
                    agent,
                    session: Session::Unauthenticated,
                });
            }
        };

        let token: TokenResponse = match response.into_json() {
            Ok(t) => t,
            Err(e) => {
                warn!("credential exchange returned malformed data: {}", e);
                return Ok(Self {
                    agent,
                    session: Session::Unauthenticated,
                });
            }
        };

        if token.error.is_some() {
            return Err(LookupError::InvalidCredentials);
        }

        let session = match token.access_token {
            Some(t) => Session::Bearer(t),
            None => Session::Unauthenticated,
        };
        Ok(Self { agent, session })
    }

    /// Degraded client with no session; every lookup reports no result.
    pub fn unauthenticated() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(DEFAULT_TIMEOUT).build(),
            session: Session::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, Session::Bearer(_))
    }

    /// One authenticated GET, parsed as JSON.  `None` covers the whole
    /// absorbed-failure surface: missing session, transport error,
    /// non-success status, malformed payload.
    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Option<T> {
        let token = match &self.session {
            Session::Bearer(t) => t,
            Session::Unauthenticated => {
                debug!("catalog call skipped: unauthenticated session");
                return None;
            }
        };

        let mut request = self
            .agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", token));
        for (param, value) in query {
            request = request.query(param, value);
        }

        let response = match request.call() {
            Ok(r) => r,
            Err(e) => {
                warn!("catalog unavailable: {}", e);
                return None;
            }
        };

        match response.into_json() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("catalog returned malformed data: {}", e);
                None
            }
        }
    }

    // ── Identity resolution ──────────────────────────────────────────────

    /// Resolve an artist name to its canonical catalog record.
    pub fn resolve_artist(&self, name: &str) -> Result<Option<ArtistSummary>, LookupError> {
        if name.is_empty() {
            return Err(LookupError::InvalidInput("artist name must be non-empty"));
        }

        let response: SearchResponse =
            match self.get_json(SEARCH_URL, &[("q", name), ("type", "artist"), ("limit", "1")]) {
                Some(r) => r,
                None => return Ok(None),
            };

        let candidate = response
            .artists
            .and_then(|page| page.items.into_iter().next())
            .ok_or(LookupError::NotFound)?;

        if !artist_candidate_matches(&candidate.name, name) {
            return Err(LookupError::NotFound);
        }
        Ok(Some(candidate.into()))
    }

    /// Resolve a (title, artist) pair to its canonical track record.
    pub fn resolve_track(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<TrackIdentity>, LookupError> {
        if title.is_empty() || artist.is_empty() {
            return Err(LookupError::InvalidInput(
                "track and artist names must be non-empty",
            ));
        }

        let text = format!("{} {}", title, artist);
        let response: SearchResponse =
            match self.get_json(SEARCH_URL, &[("q", &text), ("type", "track"), ("limit", "1")]) {
                Some(r) => r,
                None => return Ok(None),
            };

        let candidate = response
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .ok_or(LookupError::NotFound)?;

        let primary_artist = candidate
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default();

        if !track_candidate_matches(&candidate.name, &primary_artist, title, artist) {
            return Err(LookupError::NotFound);
        }

        Ok(Some(TrackIdentity {
            id: candidate.id,
            name: candidate.name,
            artist: primary_artist,
            album_id: candidate.album.id,
            popularity: candidate.popularity,
        }))
    }

    // ── Derived lookups ──────────────────────────────────────────────────

    /// Album details for a resolved track.  The album fetch is skipped
    /// entirely when track resolution fails.
    pub fn resolve_album(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<AlbumSummary>, LookupError> {
        let track = match self.resolve_track(title, artist)? {
            Some(t) => t,
            None => return Ok(None),
        };

        let url = format!("{}/albums/{}", API_BASE, track.album_id);
        let album: ApiAlbum = match self.get_json(&url, &[]) {
            Some(a) => a,
            None => return Ok(None),
        };
        Ok(Some(album.into()))
    }

    /// Related-artist roster for a resolved artist.
    pub fn resolve_related_artists(
        &self,
        name: &str,
    ) -> Result<Option<Vec<ArtistSummary>>, LookupError> {
        let artist = match self.resolve_artist(name)? {
            Some(a) => a,
            None => return Ok(None),
        };

        let url = format!("{}/artists/{}/related-artists", API_BASE, artist.id);
        let response: RelatedArtistsResponse = match self.get_json(&url, &[]) {
            Some(r) => r,
            None => return Ok(None),
        };
        Ok(Some(response.artists.into_iter().map(Into::into).collect()))
    }

    /// Top tracks for a resolved artist, in the fixed regional market.
    pub fn resolve_top_tracks(&self, name: &str) -> Result<Option<Vec<TopTrack>>, LookupError> {
        let artist = match self.resolve_artist(name)? {
            Some(a) => a,
            None => return Ok(None),
        };

        let url = format!("{}/artists/{}/top-tracks", API_BASE, artist.id);
        let response: TopTracksResponse =
            match self.get_json(&url, &[("market", TOP_TRACKS_MARKET)]) {
                Some(r) => r,
                None => return Ok(None),
            };
        Ok(Some(
            response
                .tracks
                .into_iter()
                .map(|t| TopTrack {
                    title: t.name,
                    popularity: t.popularity,
                })
                .collect(),
        ))
    }

    /// Audio descriptors for a resolved track.
    pub fn resolve_audio_features(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<AudioFeatures>, LookupError> {
        let track = match self.resolve_track(title, artist)? {
            Some(t) => t,
            None => return Ok(None),
        };

        let url = format!("{}/audio-features/{}", API_BASE, track.id);
        let features: ApiAudioFeatures = match self.get_json(&url, &[]) {
            Some(f) => f,
            None => return Ok(None),
        };
        Ok(Some(AudioFeatures {
            tempo: features.tempo,
            key: features.key,
            mode: features.mode,
            time_signature: features.time_signature,
            danceability: features.danceability,
            energy: features.energy,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_gate() {
        assert!(artist_candidate_matches("Dire Straits", "dire straits"));
        assert!(artist_candidate_matches("Led Zeppelin", "Led Zeppelin"));
        assert!(!artist_candidate_matches("Lead Ziplin", "Led Zeppelin"));
    }

    #[test]
    fn test_track_gate_strips_edition_suffix() {
        assert!(track_candidate_matches(
            "Stairway to Heaven - Remaster",
            "Led Zeppelin",
            "Stairway to Heaven",
            "Led Zeppelin"
        ));
    }

    #[test]
    fn test_track_gate_requires_both_checks() {
        // Right title, wrong artist.
        assert!(!track_candidate_matches(
            "Stairway to Heaven - Remaster",
            "Lead Ziplin",
            "Stairway to Heaven",
            "Led Zeppelin"
        ));
        // Right artist, wrong title.
        assert!(!track_candidate_matches(
            "Whole Lotta Love",
            "Led Zeppelin",
            "Stairway to Heaven",
            "Led Zeppelin"
        ));
    }

    #[test]
    fn test_unauthenticated_lookups_report_no_result() {
        let catalog = Catalog::unauthenticated();
        assert!(!catalog.is_authenticated());
        assert_eq!(catalog.resolve_artist("Queen").unwrap().map(|a| a.id), None);
        assert!(catalog
            .resolve_track("Bohemian Rhapsody", "Queen")
            .unwrap()
            .is_none());
        assert!(catalog
            .resolve_top_tracks("Queen")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_album_lookup_short_circuits_on_failed_track_resolution() {
        // With no session the track step yields no identity, so the album
        // fetch must be skipped and the whole operation reports no result.
        let catalog = Catalog::unauthenticated();
        assert!(catalog
            .resolve_album("Stairway to Heaven", "Led Zeppelin")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_input_validation_precedes_session_check() {
        let catalog = Catalog::unauthenticated();
        assert!(matches!(
            catalog.resolve_artist(""),
            Err(LookupError::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.resolve_track("", "Queen"),
            Err(LookupError::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.resolve_track("Bohemian Rhapsody", ""),
            Err(LookupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_token_payload_error_field() {
        let rejected: TokenResponse =
            serde_json::from_str(r#"{"error": "invalid_client"}"#).unwrap();
        assert!(rejected.error.is_some());

        let granted: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "Bearer"}"#).unwrap();
        assert!(granted.error.is_none());
        assert_eq!(granted.access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_artist_payload_projection() {
        let payload = r#"{
            "artists": {
                "items": [{
                    "id": "0WwSkZ7LtFUFjGjMZBMt6T",
                    "name": "Dire Straits",
                    "genres": ["rock", "roots rock"],
                    "popularity": 76,
                    "images": [{"url": "large.jpg"}, {"url": "medium.jpg"}],
                    "external_urls": {"spotify": "https://open.spotify.com/artist/0WwSkZ7"}
                }]
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let api = response.artists.unwrap().items.into_iter().next().unwrap();
        let summary: ArtistSummary = api.into();
        assert_eq!(summary.name, "Dire Straits");
        assert_eq!(summary.popularity, 76);
        assert_eq!(summary.genres, vec!["rock", "roots rock"]);
        assert_eq!(summary.image_url.as_deref(), Some("medium.jpg"));
        assert_eq!(
            summary.profile_url.as_deref(),
            Some("https://open.spotify.com/artist/0WwSkZ7")
        );
    }

    #[test]
    fn test_track_payload_shape() {
        let payload = r#"{
            "tracks": {
                "items": [{
                    "id": "5CQ30WqJwcep0pYcV4AMNc",
                    "name": "Stairway to Heaven - Remaster",
                    "artists": [{"name": "Led Zeppelin"}],
                    "album": {"id": "44Ig8dzqOkvkGDzaUof9lK"},
                    "popularity": 81
                }]
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let track = response.tracks.unwrap().items.into_iter().next().unwrap();
        assert_eq!(track.album.id, "44Ig8dzqOkvkGDzaUof9lK");
        assert_eq!(track.artists[0].name, "Led Zeppelin");
    }

    #[test]
    fn test_album_payload_projection() {
        let payload = r#"{
            "name": "Led Zeppelin IV",
            "artists": [{"name": "Led Zeppelin"}],
            "label": "Atlantic Records",
            "popularity": 80,
            "release_date": "1971-11-08",
            "total_tracks": 8,
            "images": [{"url": "cover.jpg"}],
            "external_urls": {"spotify": "https://open.spotify.com/album/44Ig8"},
            "tracks": {"items": [{"name": "Black Dog"}, {"name": "Rock and Roll"}]}
        }"#;
        let api: ApiAlbum = serde_json::from_str(payload).unwrap();
        let summary: AlbumSummary = api.into();
        assert_eq!(summary.name, "Led Zeppelin IV");
        assert_eq!(summary.artist, "Led Zeppelin");
        assert_eq!(summary.label.as_deref(), Some("Atlantic Records"));
        assert_eq!(summary.track_count, 8);
        assert_eq!(summary.tracks, vec!["Black Dog", "Rock and Roll"]);
        assert_eq!(summary.image_url.as_deref(), Some("cover.jpg"));
    }

    #[test]
    fn test_audio_features_payload_shape() {
        let payload = r#"{
            "tempo": 82.433,
            "key": 9,
            "mode": 0,
            "time_signature": 4,
            "danceability": 0.338,
            "energy": 0.34,
            "loudness": -12.049
        }"#;
        let features: ApiAudioFeatures = serde_json::from_str(payload).unwrap();
        assert_eq!(features.key, 9);
        assert_eq!(features.mode, 0);
        assert_eq!(features.time_signature, 4);
        assert!((features.tempo - 82.433).abs() < f64::EPSILON);
    }
}
