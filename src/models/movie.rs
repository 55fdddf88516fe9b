use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized movie or TV title, regardless of which provider endpoint produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Watchmode numeric ID
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Provider content type, e.g. `movie` or `tv_series`
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_watchlist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
}

impl Movie {
    /// Copy of this movie marked as a watchlist entry added at `added_at`
    pub fn as_watchlist_entry(&self, added_at: DateTime<Utc>) -> Self {
        Self {
            in_watchlist: Some(true),
            date_added: Some(added_at),
            ..self.clone()
        }
    }

    /// Human-readable content type, e.g. `tv_series` -> `Tv Series`
    pub fn display_type(&self) -> String {
        format_type(&self.content_type)
    }
}

pub fn format_type(content_type: &str) -> String {
    content_type
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
