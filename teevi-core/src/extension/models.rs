// Host Contract Models
//
// Normalized shapes every extension returns. Field names serialize the way
// the host application reads them (camelCase, `URL` suffixes upper-cased).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Show kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowKind {
    Movie,
    Series,
}

/// Airing status of a show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowStatus {
    Upcoming,
    Airing,
    Canceled,
    Ended,
}

/// Compact show reference used in lists (search results, feeds, related shows)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowEntry {
    pub kind: ShowKind,
    pub id: String,
    pub title: String,
    #[serde(rename = "posterURL", skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Season reference inside a show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSeason {
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Full show detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub kind: ShowKind,
    pub id: String,
    pub title: String,
    pub overview: String,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Duration in seconds
    pub duration: u64,
    #[serde(rename = "posterURL", skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(rename = "cleanPosterURL", skip_serializing_if = "Option::is_none")]
    pub clean_poster_url: Option<String>,
    #[serde(rename = "backdropURL", skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
    #[serde(rename = "logoURL", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ShowStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<ShowSeason>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_shows: Option<Vec<ShowEntry>>,
}

/// Episode of a series season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowEpisode {
    pub id: String,
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(rename = "thumbnailURL", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Duration in seconds
    pub duration: u64,
}

/// Feed collection category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedCategory {
    Series,
    Movies,
    Hot,
    Recommended,
    New,
}

/// Named group of shows displayed on the host's home feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCollection {
    pub id: String,
    pub name: String,
    pub shows: Vec<ShowEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FeedCategory>,
}

/// Playable video location plus the HTTP headers required to fetch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl VideoAsset {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }
}

/// Live TV channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChannel {
    pub id: String,
    pub name: String,
    /// Always `"channel"`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "logoURL", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub language: String,
    pub geoblocked: bool,
    pub category: String,
}

/// Scheduled program on a live channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveProgram {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub channel_id: String,
}

impl LiveProgram {
    /// Whether this program overlaps the closed window `[start, end]`.
    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}
