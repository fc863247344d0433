//! TMDB Extension

use async_trait::async_trait;
use futures::future::try_join_all;
use futures::try_join;
use teevi_core::config::Config;
use teevi_core::extension::{
    Extension, FeedCategory, FeedCollection, FeedExtension, MetadataExtension, Result, Show,
    ShowEntry, ShowEpisode, ShowKind, ShowSeason, ShowStatus,
};
use tracing::debug;

use super::client::{DiscoverSorting, ImageKind, TmdbClient};
use super::error::TmdbError;
use super::types::{MediaType, ShowDetails, ShowSummary};

const DISCOVER_MAX_PAGES: u32 = 4;
const DISCOVER_MIN_VOTES: u32 = 100;

/// Home feed rows built from discover queries
struct DiscoverRow {
    id: &'static str,
    name: &'static str,
    media_type: MediaType,
    sorting: DiscoverSorting,
    category: FeedCategory,
}

static DISCOVER_ROWS: [DiscoverRow; 6] = [
    DiscoverRow {
        id: "tmdb-popular-movies",
        name: "Popular Movies",
        media_type: MediaType::Movie,
        sorting: DiscoverSorting::Popularity,
        category: FeedCategory::Hot,
    },
    DiscoverRow {
        id: "tmdb-popular-tv-shows",
        name: "Popular TV Shows",
        media_type: MediaType::Tv,
        sorting: DiscoverSorting::Popularity,
        category: FeedCategory::Hot,
    },
    DiscoverRow {
        id: "tmdb-top-rated-movies",
        name: "Top Rated Movies",
        media_type: MediaType::Movie,
        sorting: DiscoverSorting::Rating,
        category: FeedCategory::Recommended,
    },
    DiscoverRow {
        id: "tmdb-top-rated-tv-shows",
        name: "Top Rated TV Shows",
        media_type: MediaType::Tv,
        sorting: DiscoverSorting::Rating,
        category: FeedCategory::Recommended,
    },
    DiscoverRow {
        id: "tmdb-new-movies",
        name: "New Movies",
        media_type: MediaType::Movie,
        sorting: DiscoverSorting::ReleaseDate,
        category: FeedCategory::New,
    },
    DiscoverRow {
        id: "tmdb-new-tv-shows",
        name: "New TV Shows",
        media_type: MediaType::Tv,
        sorting: DiscoverSorting::ReleaseDate,
        category: FeedCategory::New,
    },
];

/// Split `movie/123` / `tv/456` into its parts.
pub fn parse_show_id(show_id: &str) -> std::result::Result<(MediaType, &str), TmdbError> {
    show_id
        .split_once('/')
        .and_then(|(kind, id)| {
            let media_type = kind.parse::<MediaType>().ok()?;
            (!id.is_empty() && !id.contains('/')).then_some((media_type, id))
        })
        .ok_or_else(|| TmdbError::InvalidShowId(show_id.to_string()))
}

fn map_status(status: Option<&str>) -> Option<ShowStatus> {
    match status?.to_lowercase().as_str() {
        "in production" | "post production" | "planned" | "pilot" | "rumored" | "announced" => {
            Some(ShowStatus::Upcoming)
        }
        "returning series" => Some(ShowStatus::Airing),
        "canceled" => Some(ShowStatus::Canceled),
        "released" | "ended" => Some(ShowStatus::Ended),
        _ => None,
    }
}

const fn show_kind(media_type: MediaType) -> ShowKind {
    match media_type {
        MediaType::Movie => ShowKind::Movie,
        MediaType::Tv => ShowKind::Series,
    }
}

/// Runtime in minutes: movie runtime, else the typical or latest episode runtime
fn runtime_minutes(details: &ShowDetails, media_type: MediaType) -> u64 {
    match media_type {
        MediaType::Movie => details.runtime.unwrap_or_default(),
        MediaType::Tv => details
            .episode_run_time
            .first()
            .copied()
            .filter(|minutes| *minutes > 0)
            .or_else(|| details.last_episode_to_air.as_ref().and_then(|e| e.runtime))
            .unwrap_or_default(),
    }
}

/// TMDB metadata and feed extension
pub struct TmdbExtension {
    client: TmdbClient,
}

impl TmdbExtension {
    #[must_use]
    pub const fn new(client: TmdbClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> std::result::Result<Self, TmdbError> {
        let user_agent = format!("{}/{}", config.client.name, config.client.version);
        Ok(Self::new(TmdbClient::from_config(&config.tmdb, &config.http, &user_agent)?))
    }

    fn map_entry(&self, show: &ShowSummary) -> ShowEntry {
        let media_type = show.media_type();
        ShowEntry {
            kind: show_kind(media_type),
            id: format!("{media_type}/{}", show.id),
            title: show.display_title().to_string(),
            poster_url: self.client.image_url(show.poster_path.as_deref(), ImageKind::Poster),
            year: show.year(),
        }
    }

    fn map_entries(&self, shows: &[ShowSummary]) -> Vec<ShowEntry> {
        shows.iter().map(|show| self.map_entry(show)).collect()
    }

    /// Every title of a TMDB user list as show entries
    pub async fn fetch_collection(&self, list_id: &str) -> Result<Vec<ShowEntry>> {
        let items = self.client.fetch_list(list_id).await?;
        Ok(self.map_entries(&items))
    }

    async fn search(&self, query: &str) -> std::result::Result<Vec<ShowEntry>, TmdbError> {
        let (movies, series) = try_join!(
            self.client.search(MediaType::Movie, query),
            self.client.search(MediaType::Tv, query),
        )?;

        let mut results: Vec<ShowSummary> = movies
            .into_iter()
            .map(|movie| ShowSummary {
                media_type: Some(MediaType::Movie),
                ..movie
            })
            .chain(series.into_iter().map(|tv| ShowSummary {
                media_type: Some(MediaType::Tv),
                ..tv
            }))
            .filter(|show| show.date().is_some() && show.vote_average.unwrap_or_default() > 0.0)
            .collect();
        results.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

        Ok(self.map_entries(&results))
    }

    async fn show(&self, show_id: &str) -> std::result::Result<Show, TmdbError> {
        let (media_type, id) = parse_show_id(show_id)?;

        let (details, images, recommendations) = try_join!(
            self.client.fetch_show(media_type, id),
            self.client.fetch_images(media_type, id, &["en", "null"]),
            self.client.fetch_recommendations(media_type, id),
        )?;

        let release_date = match media_type {
            MediaType::Movie => details.release_date.clone(),
            MediaType::Tv => details.first_air_date.clone(),
        }
        .filter(|date| !date.is_empty());

        let seasons = (media_type == MediaType::Tv).then(|| {
            details
                .seasons
                .iter()
                .filter(|season| {
                    season.season_number > 0
                        && season.air_date.is_some()
                        && season.episode_count.unwrap_or_default() > 0
                })
                .map(|season| ShowSeason {
                    number: season.season_number,
                    name: season.name.clone(),
                })
                .collect()
        });

        Ok(Show {
            kind: show_kind(media_type),
            id: show_id.to_string(),
            title: details
                .title
                .clone()
                .or_else(|| details.name.clone())
                .unwrap_or_default(),
            overview: details.overview.clone().unwrap_or_default(),
            release_date,
            genres: details.genres.iter().map(|genre| genre.name.clone()).collect(),
            duration: runtime_minutes(&details, media_type) * 60,
            poster_url: self.client.image_url(details.poster_path.as_deref(), ImageKind::Poster),
            clean_poster_url: self.client.image_url(images.best_clean_poster(), ImageKind::Poster),
            backdrop_url: self.client.image_url(details.backdrop_path.as_deref(), ImageKind::Backdrop),
            logo_url: self.client.image_url(images.best_logo(), ImageKind::Logo),
            rating: details.vote_average,
            status: map_status(details.status.as_deref()),
            seasons,
            related_shows: Some(self.map_entries(&recommendations)),
        })
    }

    async fn episodes(&self, show_id: &str, season: u32) -> std::result::Result<Vec<ShowEpisode>, TmdbError> {
        let (media_type, id) = parse_show_id(show_id)?;
        if media_type != MediaType::Tv {
            return Ok(Vec::new());
        }

        let details = self.client.fetch_season(id, season).await?;
        Ok(details
            .episodes
            .into_iter()
            .map(|episode| ShowEpisode {
                id: format!("{show_id}/season={season}&id={}", episode.id),
                number: episode.episode_number,
                title: episode.name,
                overview: episode.overview,
                thumbnail_url: self.client.image_url(episode.still_path.as_deref(), ImageKind::Still),
                duration: episode.runtime.unwrap_or_default() * 60,
            })
            .collect())
    }

    async fn feed_collections(&self) -> std::result::Result<Vec<FeedCollection>, TmdbError> {
        let rows = try_join_all(DISCOVER_ROWS.iter().map(|row| async move {
            let shows = self
                .client
                .discover(row.media_type, row.sorting, DISCOVER_MAX_PAGES, DISCOVER_MIN_VOTES)
                .await?;
            Ok::<_, TmdbError>((row, shows))
        }))
        .await?;

        Ok(rows
            .into_iter()
            .filter(|(row, shows)| {
                if shows.is_empty() {
                    debug!(collection = row.id, "Skipping empty collection");
                }
                !shows.is_empty()
            })
            .map(|(row, shows)| FeedCollection {
                id: row.id.to_string(),
                name: row.name.to_string(),
                shows: self.map_entries(&shows),
                category: Some(row.category),
            })
            .collect())
    }
}

impl Extension for TmdbExtension {
    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[async_trait]
impl MetadataExtension for TmdbExtension {
    async fn fetch_shows_by_query(&self, query: &str) -> Result<Vec<ShowEntry>> {
        Ok(self.search(query).await?)
    }

    async fn fetch_show(&self, show_id: &str) -> Result<Show> {
        Ok(self.show(show_id).await?)
    }

    async fn fetch_episodes(&self, show_id: &str, season: u32) -> Result<Vec<ShowEpisode>> {
        Ok(self.episodes(show_id, season).await?)
    }
}

#[async_trait]
impl FeedExtension for TmdbExtension {
    async fn fetch_feed_collections(&self) -> Result<Vec<FeedCollection>> {
        Ok(self.feed_collections().await?)
    }

    async fn fetch_trending_shows(&self) -> Result<Vec<Show>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::types::LastEpisode;

    #[test]
    fn test_parse_show_id() {
        assert_eq!(parse_show_id("movie/603").unwrap(), (MediaType::Movie, "603"));
        assert_eq!(parse_show_id("tv/1399").unwrap(), (MediaType::Tv, "1399"));
        for invalid in ["603", "person/1", "tv/", "movie/1/extra", ""] {
            assert!(
                matches!(parse_show_id(invalid), Err(TmdbError::InvalidShowId(_))),
                "{invalid} should be rejected"
            );
        }
    }

    #[test]
    fn test_map_status() {
        assert_eq!(map_status(Some("Returning Series")), Some(ShowStatus::Airing));
        assert_eq!(map_status(Some("Post Production")), Some(ShowStatus::Upcoming));
        assert_eq!(map_status(Some("Canceled")), Some(ShowStatus::Canceled));
        assert_eq!(map_status(Some("Released")), Some(ShowStatus::Ended));
        assert_eq!(map_status(Some("Unknown")), None);
        assert_eq!(map_status(None), None);
    }

    #[test]
    fn test_runtime_fallbacks() {
        let mut details: ShowDetails = serde_json::from_str(r#"{"id":1,"episode_run_time":[0]}"#).unwrap();
        details.last_episode_to_air = Some(LastEpisode { runtime: Some(42) });
        assert_eq!(runtime_minutes(&details, MediaType::Tv), 42);

        details.episode_run_time = vec![55];
        assert_eq!(runtime_minutes(&details, MediaType::Tv), 55);

        details.runtime = Some(136);
        assert_eq!(runtime_minutes(&details, MediaType::Movie), 136);
    }
}
