//! TMDB HTTP Client

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use teevi_core::config::{HttpConfig, TmdbConfig};
use tracing::debug;
use url::Url;

use super::error::TmdbError;
use super::types::{ImageCollection, ListPage, MediaType, Page, SeasonDetails, ShowDetails, ShowSummary};
use crate::error::{build_http_client, check_response, json_with_limit, ProviderClientError};

/// CDN rendition of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Logo,
    Backdrop,
    Still,
}

impl ImageKind {
    const fn size(self) -> &'static str {
        match self {
            Self::Poster | Self::Logo => "w500",
            Self::Backdrop => "w780",
            Self::Still => "w300",
        }
    }
}

/// Ordering of a discover query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverSorting {
    Popularity,
    Rating,
    ReleaseDate,
}

impl DiscoverSorting {
    const fn sort_by(self, media_type: MediaType) -> &'static str {
        match (self, media_type) {
            (Self::Popularity, _) => "popularity.desc",
            (Self::Rating, _) => "vote_average.desc",
            (Self::ReleaseDate, MediaType::Movie) => "primary_release_date.desc",
            (Self::ReleaseDate, MediaType::Tv) => "first_air_date.desc",
        }
    }
}

/// TMDB v3 client authenticated with a bearer read-access token
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_url: Url,
    image_base_url: String,
    token: String,
    language: String,
}

impl TmdbClient {
    pub fn new(
        client: Client,
        api_url: &str,
        image_base_url: &str,
        token: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, TmdbError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TmdbError::MissingToken);
        }

        let mut api_url = Url::parse(api_url).map_err(|e| TmdbError::InvalidUrl(format!("{api_url}: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(TmdbError::InvalidUrl(api_url.to_string()));
        }
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            client,
            api_url,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            token,
            language: language.into(),
        })
    }

    pub fn from_config(config: &TmdbConfig, http: &HttpConfig, user_agent: &str) -> Result<Self, TmdbError> {
        Self::new(
            build_http_client(http, user_agent)?,
            &config.api_url,
            &config.image_base_url,
            config.api_token.clone(),
            config.language.clone(),
        )
    }

    /// `{image_base_url}/{size}{path}`, `None` without a path
    #[must_use]
    pub fn image_url(&self, path: Option<&str>, kind: ImageKind) -> Option<String> {
        let path = path.filter(|p| !p.is_empty())?;
        let separator = if path.starts_with('/') { "" } else { "/" };
        Some(format!("{}/{}{separator}{path}", self.image_base_url, kind.size()))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TmdbError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| TmdbError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<T, TmdbError> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "TMDB request");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .query(&[("language", self.language.as_str())])
            .query(query)
            .send()
            .await
            .map_err(ProviderClientError::from)?;
        let response = check_response(response)?;
        Ok(json_with_limit(response).await?)
    }

    /// First result page of a title search
    pub async fn search(&self, media_type: MediaType, query: &str) -> Result<Vec<ShowSummary>, TmdbError> {
        let page: Page<ShowSummary> = self
            .get_json(
                &["search", media_type.as_str()],
                &[("query", query), ("include_adult", "false"), ("page", "1")],
            )
            .await?;
        Ok(page.results)
    }

    pub async fn fetch_show(&self, media_type: MediaType, id: &str) -> Result<ShowDetails, TmdbError> {
        self.get_json(&[media_type.as_str(), id], &[]).await
    }

    /// Images in the configured language plus `extra_languages`
    /// (`"null"` selects images without text).
    pub async fn fetch_images(
        &self,
        media_type: MediaType,
        id: &str,
        extra_languages: &[&str],
    ) -> Result<ImageCollection, TmdbError> {
        let languages = extra_languages.join(",");
        let mut query = Vec::new();
        if !languages.is_empty() {
            query.push(("include_image_language", languages.as_str()));
        }
        self.get_json(&[media_type.as_str(), id, "images"], &query).await
    }

    pub async fn fetch_recommendations(&self, media_type: MediaType, id: &str) -> Result<Vec<ShowSummary>, TmdbError> {
        let page: Page<ShowSummary> = self
            .get_json(&[media_type.as_str(), id, "recommendations"], &[("page", "1")])
            .await?;
        Ok(page.results)
    }

    pub async fn fetch_season(&self, series_id: &str, season: u32) -> Result<SeasonDetails, TmdbError> {
        let season = season.to_string();
        self.get_json(&["tv", series_id, "season", &season], &[]).await
    }

    /// Discover titles, reading at most `max_pages` pages.
    pub async fn discover(
        &self,
        media_type: MediaType,
        sorting: DiscoverSorting,
        max_pages: u32,
        min_votes: u32,
    ) -> Result<Vec<ShowSummary>, TmdbError> {
        let min_votes = min_votes.to_string();
        let mut shows = Vec::new();

        for page_number in 1..=max_pages {
            let page_param = page_number.to_string();
            let page: Page<ShowSummary> = self
                .get_json(
                    &["discover", media_type.as_str()],
                    &[
                        ("sort_by", sorting.sort_by(media_type)),
                        ("vote_count.gte", &min_votes),
                        ("include_adult", "false"),
                        ("page", &page_param),
                    ],
                )
                .await?;

            shows.extend(page.results);
            if page_number >= page.total_pages {
                break;
            }
        }

        Ok(shows)
    }

    /// Every item of a user list, following pagination.
    pub async fn fetch_list(&self, list_id: &str) -> Result<Vec<ShowSummary>, TmdbError> {
        let mut shows = Vec::new();
        let mut page_number = 1;

        loop {
            let page_param = page_number.to_string();
            let page: ListPage = self
                .get_json(&["list", list_id], &[("page", &page_param)])
                .await?;
            shows.extend(page.items);

            if page_number >= page.total_pages {
                break;
            }
            page_number += 1;
        }

        Ok(shows)
    }
}
