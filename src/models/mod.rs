use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;

pub mod movie;
pub mod review;

pub use movie::{format_type, Movie};
pub use review::MovieReview;

// ============================================================================
// Watchmode API Types
// ============================================================================

/// Watchmode `/autocomplete-search/` response
#[derive(Debug, Clone, Deserialize)]
pub struct WatchmodeSearchResponse {
    #[serde(default)]
    pub results: Vec<WatchmodeSearchResult>,
}

/// Watchmode autocomplete search result
#[derive(Debug, Clone, Deserialize)]
pub struct WatchmodeSearchResult {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub title_type: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<WatchmodeSearchResult> for Movie {
    fn from(result: WatchmodeSearchResult) -> Self {
        Movie {
            id: result.id,
            title: result.name,
            poster_url: result.image_url,
            year: result.year,
            content_type: result.title_type,
            imdb_id: result.imdb_id,
            tmdb_id: result.tmdb_id,
            in_watchlist: None,
            date_added: None,
        }
    }
}

/// Watchmode `/releases/` response
#[derive(Debug, Clone, Deserialize)]
pub struct WatchmodeReleasesResponse {
    #[serde(default)]
    pub releases: Vec<WatchmodeRelease>,
}

/// A single recent release on some streaming source
#[derive(Debug, Clone, Deserialize)]
pub struct WatchmodeRelease {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub title_type: String,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub source_release_date: Option<String>,
}

impl From<WatchmodeRelease> for Movie {
    fn from(release: WatchmodeRelease) -> Self {
        let year = release.source_release_date.as_deref().and_then(release_year);

        Movie {
            id: release.id,
            title: release.title,
            poster_url: release.poster_url,
            year,
            content_type: release.title_type,
            imdb_id: release.imdb_id,
            tmdb_id: release.tmdb_id,
            in_watchlist: None,
            date_added: None,
        }
    }
}

/// Extracts the calendar year from a release date string
///
/// Watchmode sends plain dates (`2021-07-04`), but full timestamps are accepted too.
pub fn release_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(day.year());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(date) {
        return Some(ts.year());
    }
    NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|ts| ts.year())
}

/// Watchmode `/title/{id}/details/` response
#[derive(Debug, Clone, Deserialize)]
pub struct WatchmodeTitleDetails {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub title_type: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub poster: Option<String>,
}

impl From<WatchmodeTitleDetails> for Movie {
    fn from(details: WatchmodeTitleDetails) -> Self {
        Movie {
            id: details.id,
            title: details.title,
            poster_url: details.poster,
            year: details.year,
            content_type: details.title_type,
            imdb_id: details.imdb_id,
            tmdb_id: details.tmdb_id,
            in_watchlist: None,
            date_added: None,
        }
    }
}
