//! Songsterr tab lookup client.
//!
//! Two endpoints: a best-match query that redirects to the tab page (a
//! redirect to the homepage means "no match"), and a by-artists listing
//! returning one JSON entry per available tab.  Each operation performs a
//! single best-effort request; an unreachable service degrades to "no
//! result" rather than failing.

use std::collections::BTreeSet;
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::error::LookupError;
use crate::fuzzy;

const BEST_MATCH_URL: &str = "http://www.songsterr.com/a/wa/bestMatchForQueryString";
const BY_ARTISTS_URL: &str = "http://www.songsterr.com/a/ra/songs/byartists.json";

/// Landing pages the best-match endpoint redirects to when nothing matches.
const HOMEPAGE_URLS: &[&str] = &["https://www.songsterr.com/", "http://www.songsterr.com/"];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Result types ─────────────────────────────────────────────────────────────

/// A resolved deep link to an interactive tab.
#[derive(Debug, Clone)]
pub struct TabLocation {
    /// Tab page URL after redirect resolution.
    pub url: String,
    /// Track name as queried.
    pub track: String,
    /// Artist name as queried.
    pub artist: String,
}

/// One per-track entry from the by-artists listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TabEntry {
    pub title: String,
    pub artist: TabArtist,
}

/// Nested artist record of a [`TabEntry`].
#[derive(Debug, Clone, Deserialize)]
pub struct TabArtist {
    /// Artist name with any leading "The" already removed by the service.
    #[serde(rename = "nameWithoutThePrefix")]
    pub name: String,
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Client for the tab-hosting site.
pub struct TabFinder {
    agent: ureq::Agent,
}

impl Default for TabFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl TabFinder {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Resolve the best-matching tab URL for a (track, artist) pair.
    ///
    /// Returns `Ok(None)` when the service cannot be reached; a redirect to
    /// the homepage (the service's "no match" answer) is `Err(NotFound)`.
    pub fn find_track_tab(
        &self,
        track: &str,
        artist: &str,
    ) -> Result<Option<TabLocation>, LookupError> {
        if track.is_empty() || artist.is_empty() {
            return Err(LookupError::InvalidInput(
                "track and artist names must be non-empty",
            ));
        }

        let response = match self
            .agent
            .get(BEST_MATCH_URL)
            .query("s", track)
            .query("a", artist)
            .call()
        {
            Ok(r) => r,
            Err(e) => {
                warn!("tab lookup unavailable: {}", e);
                return Ok(None);
            }
        };

        let final_url = response.get_url();
        if HOMEPAGE_URLS.contains(&final_url) {
            return Err(LookupError::NotFound);
        }

        Ok(Some(TabLocation {
            url: final_url.to_string(),
            track: track.to_string(),
            artist: artist.to_string(),
        }))
    }

    /// Fetch the raw tab entries for an artist.
    ///
    /// Returns `Ok(None)` when the service cannot be reached and
    /// `Err(NotFound)` when the service reports zero entries.
    pub fn artist_catalog(&self, artist: &str) -> Result<Option<Vec<TabEntry>>, LookupError> {
        if artist.is_empty() {
            return Err(LookupError::InvalidInput("artist name must be non-empty"));
        }

        let response = match self
            .agent
            .get(BY_ARTISTS_URL)
            .query("artists", &artists_param(artist))
            .call()
        {
            Ok(r) => r,
            Err(e) => {
                warn!("artist tab listing unavailable: {}", e);
                return Ok(None);
            }
        };

        let entries: Vec<TabEntry> = match response.into_json() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("artist tab listing returned malformed data: {}", e);
                return Ok(None);
            }
        };

        if entries.is_empty() {
            return Err(LookupError::NotFound);
        }
        Ok(Some(entries))
    }
}

/// Query parameter for the by-artists endpoint: words comma-joined,
/// apostrophes stripped.
fn artists_param(artist: &str) -> String {
    artist
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(",")
        .replace('\'', "")
}

// ── Entry filtering ──────────────────────────────────────────────────────────

/// Keep only entries whose artist fuzzy-matches the query, preserving order.
///
/// The query has its leading article stripped before comparison, matching
/// the service's `nameWithoutThePrefix` field.
pub fn filter_by_artist(entries: Vec<TabEntry>, artist: &str) -> Vec<TabEntry> {
    let query = fuzzy::strip_leading_article(artist);
    entries
        .into_iter()
        .filter(|e| fuzzy::is_match(query, &e.artist.name, fuzzy::SIMILARITY_THRESHOLD))
        .collect()
}

/// De-duplicated tab titles in ascending lexicographic order.
pub fn distinct_sorted_titles(entries: &[TabEntry]) -> Result<Vec<String>, LookupError> {
    if entries.is_empty() {
        return Err(LookupError::NotFound);
    }
    let titles: BTreeSet<String> = entries.iter().map(|e| e.title.clone()).collect();
    Ok(titles.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, artist: &str) -> TabEntry {
        TabEntry {
            title: title.to_string(),
            artist: TabArtist {
                name: artist.to_string(),
            },
        }
    }

    #[test]
    fn test_find_track_tab_rejects_empty_input() {
        let finder = TabFinder::new();
        assert!(matches!(
            finder.find_track_tab("", "Dire Straits"),
            Err(LookupError::InvalidInput(_))
        ));
        assert!(matches!(
            finder.find_track_tab("Sultans of Swing", ""),
            Err(LookupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_artist_catalog_rejects_empty_input() {
        let finder = TabFinder::new();
        assert!(matches!(
            finder.artist_catalog(""),
            Err(LookupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_artists_param() {
        assert_eq!(artists_param("Dire Straits"), "Dire,Straits");
        assert_eq!(artists_param("Guns N' Roses"), "Guns,N,Roses");
        assert_eq!(artists_param("Queen"), "Queen");
    }

    #[test]
    fn test_filter_by_artist_keeps_close_variants() {
        let entries = vec![
            entry("Sultans of Swing", "Dire Straits"),
            entry("Walk of Life", "Dire Strauts"),
            entry("Money for Nothing", "dire strait"),
            entry("Romeo and Juliet", "dire_straits"),
            entry("Telegraph Road", "Dirr Sttaats"),
        ];
        let matched = filter_by_artist(entries, "Dire Straits");
        let names: Vec<&str> = matched.iter().map(|e| e.artist.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Dire Straits", "Dire Strauts", "dire strait", "dire_straits"]
        );
    }

    #[test]
    fn test_filter_by_artist_strips_leading_article() {
        let entries = vec![
            entry("Paint It Black", "Rolling Stones"),
            entry("Creep", "Radiohead"),
        ];
        let with_article = filter_by_artist(entries.clone(), "The Rolling Stones");
        let without_article = filter_by_artist(entries, "Rolling Stones");
        assert_eq!(with_article.len(), 1);
        assert_eq!(with_article[0].title, without_article[0].title);
    }

    #[test]
    fn test_distinct_sorted_titles() {
        let entries = vec![
            entry("Sultans of Swing", "Dire Straits"),
            entry("Walk of Life", "Dire Straits"),
            entry("Money for Nothing", "Dire Straits"),
            entry("Sultans of Swing", "Dire Straits"),
        ];
        let titles = distinct_sorted_titles(&entries).unwrap();
        assert_eq!(
            titles,
            vec!["Money for Nothing", "Sultans of Swing", "Walk of Life"]
        );
    }

    #[test]
    fn test_distinct_sorted_titles_empty_is_not_found() {
        assert_eq!(distinct_sorted_titles(&[]), Err(LookupError::NotFound));
    }

    #[test]
    fn test_entry_payload_shape() {
        let payload = r#"[
            {"title": "Sultans of Swing", "artist": {"nameWithoutThePrefix": "Dire Straits"}},
            {"title": "Walk of Life", "artist": {"nameWithoutThePrefix": "Dire Straits"}}
        ]"#;
        let entries: Vec<TabEntry> = serde_json::from_str(payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].artist.name, "Dire Straits");
    }
}
