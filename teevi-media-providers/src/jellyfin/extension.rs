//! Jellyfin Extension
//!
//! Every operation signs in, runs against the resolved server and signs out
//! again, whether the operation succeeded or not.

use async_trait::async_trait;
use futures::future::{try_join, try_join_all};
use teevi_core::config::{Config, JellyfinConfig};
use teevi_core::extension::{
    Extension, FeedCategory, FeedCollection, FeedExtension, MetadataExtension, Result, Show,
    ShowEntry, ShowEpisode, VideoAsset, VideoExtension,
};
use tracing::{debug, warn};
use url::Url;

use super::client::{ClientInfo, ItemsQuery, JellyfinClient, JellyfinSession};
use super::discovery::{HttpProbe, ResolvedServer, ServerProbe, ServerResolver};
use super::error::JellyfinError;
use super::mappers::{map_episode, map_season, map_show, map_show_entries, stream_url};
use crate::error::{build_http_client, ProviderClientError};

/// Jellyfin metadata, feed and video extension
pub struct JellyfinExtension<P = HttpProbe> {
    credentials: JellyfinConfig,
    resolver: ServerResolver<P>,
    client: JellyfinClient,
}

impl JellyfinExtension<HttpProbe> {
    /// Build from application config using HTTP discovery probes.
    pub fn from_config(config: &Config) -> std::result::Result<Self, JellyfinError> {
        let user_agent = format!("{}/{}", config.client.name, config.client.version);
        let http = build_http_client(&config.http, &user_agent)?;
        let resolver = ServerResolver::with_http_probe(config.http.probe_timeout(), &user_agent)?;

        Ok(Self::new(
            config.jellyfin.clone(),
            resolver,
            JellyfinClient::new(http, ClientInfo::from(&config.client)),
        ))
    }
}

impl<P: ServerProbe> JellyfinExtension<P> {
    #[must_use]
    pub const fn new(credentials: JellyfinConfig, resolver: ServerResolver<P>, client: JellyfinClient) -> Self {
        Self {
            credentials,
            resolver,
            client,
        }
    }

    /// Resolve the configured server address without signing in.
    pub async fn resolve_server(&self) -> std::result::Result<ResolvedServer, JellyfinError> {
        Ok(self.resolver.resolve_server(&self.credentials.server).await?)
    }

    async fn open_session(&self) -> std::result::Result<JellyfinSession, JellyfinError> {
        if self.credentials.server.trim().is_empty() || self.credentials.username.trim().is_empty() {
            return Err(JellyfinError::MissingCredentials);
        }

        let resolved = self.resolve_server().await?;
        let server = Url::parse(&resolved.address)
            .map_err(|e| ProviderClientError::Parse(format!("Invalid server address {}: {e}", resolved.address)))?;

        self.client
            .authenticate_by_name(&server, &self.credentials.username, &self.credentials.password)
            .await
    }

    /// Sign out and hand back the operation's result. Logout failures are
    /// only logged.
    async fn finish<T>(
        &self,
        session: &JellyfinSession,
        result: std::result::Result<T, JellyfinError>,
    ) -> Result<T> {
        if let Err(e) = self.client.logout(session).await {
            warn!(error = %e, server = %session.server, "Failed to end Jellyfin session");
        }
        result.map_err(Into::into)
    }

    async fn search(&self, session: &JellyfinSession, query: &str) -> std::result::Result<Vec<ShowEntry>, JellyfinError> {
        let items = self
            .client
            .fetch_items(
                session,
                ItemsQuery {
                    search_term: Some(query),
                    ..ItemsQuery::default()
                },
            )
            .await?;
        Ok(map_show_entries(&items, &session.server))
    }

    async fn show(&self, session: &JellyfinSession, show_id: &str) -> std::result::Result<Show, JellyfinError> {
        let item = self.client.fetch_item(session, show_id).await?;
        let mut show = map_show(&item, &session.server);
        if show.id.is_empty() {
            show.id = show_id.to_string();
        }

        if item.is_series() {
            let seasons = self.client.fetch_seasons(session, show_id).await?;
            show.seasons = Some(seasons.iter().filter_map(map_season).collect());
        }

        let related = match self.client.fetch_similar_items(session, show_id).await {
            Ok(items) => map_show_entries(&items, &session.server),
            Err(e) => {
                warn!(show_id, error = %e, "Failed to fetch similar shows");
                Vec::new()
            }
        };
        show.related_shows = Some(related);

        Ok(show)
    }

    async fn episodes(
        &self,
        session: &JellyfinSession,
        show_id: &str,
        season: u32,
    ) -> std::result::Result<Vec<ShowEpisode>, JellyfinError> {
        let seasons = self.client.fetch_seasons(session, show_id).await?;
        let season_id = seasons
            .iter()
            .find(|s| s.index_number == Some(season))
            .and_then(|s| s.id.as_deref())
            .ok_or(JellyfinError::SeasonNotFound(season))?;

        let episodes = self
            .client
            .fetch_season_episodes(session, show_id, season_id)
            .await?;
        Ok(episodes
            .iter()
            .filter_map(|episode| map_episode(episode, &session.server))
            .collect())
    }

    async fn feed_collections(&self, session: &JellyfinSession) -> std::result::Result<Vec<FeedCollection>, JellyfinError> {
        let (views, genres) = try_join(
            self.client.fetch_user_views(session),
            self.client.fetch_genres(session),
        )
        .await?;

        let view_collections = try_join_all(views.iter().filter_map(|view| {
            let id = view.id.as_deref()?;
            Some(async move {
                let items = self
                    .client
                    .fetch_items(
                        session,
                        ItemsQuery {
                            parent_id: Some(id),
                            ..ItemsQuery::default()
                        },
                    )
                    .await?;
                let category = if view.collection_type.as_deref() == Some("tvshows") {
                    FeedCategory::Series
                } else {
                    FeedCategory::Movies
                };
                Ok::<_, JellyfinError>(FeedCollection {
                    id: format!("view-{id}"),
                    name: view
                        .name
                        .clone()
                        .or_else(|| view.collection_type.clone())
                        .unwrap_or_default(),
                    shows: map_show_entries(&items, &session.server),
                    category: Some(category),
                })
            })
        }));

        let genre_collections = try_join_all(genres.iter().filter_map(|genre| {
            let id = genre.id.as_deref()?;
            Some(async move {
                let items = self
                    .client
                    .fetch_items(
                        session,
                        ItemsQuery {
                            genre_id: Some(id),
                            ..ItemsQuery::default()
                        },
                    )
                    .await?;
                Ok::<_, JellyfinError>(FeedCollection {
                    id: format!("genre-{id}"),
                    name: genre.name.clone().unwrap_or_default(),
                    shows: map_show_entries(&items, &session.server),
                    category: None,
                })
            })
        }));

        let (mut collections, genre_collections) = try_join(view_collections, genre_collections).await?;
        collections.extend(genre_collections);
        debug!(count = collections.len(), "Built Jellyfin feed collections");
        Ok(collections)
    }

    async fn trending(&self, session: &JellyfinSession) -> std::result::Result<Vec<Show>, JellyfinError> {
        let favorites = self
            .client
            .fetch_items(
                session,
                ItemsQuery {
                    filters: Some("IsFavorite"),
                    ..ItemsQuery::default()
                },
            )
            .await?;

        Ok(favorites
            .iter()
            .map(|item| {
                let mut show = map_show(item, &session.server);
                if let Some(tagline) = item.taglines.as_ref().and_then(|t| t.first()) {
                    show.overview.clone_from(tagline);
                }
                show
            })
            .collect())
    }

    async fn video_assets(&self, session: &JellyfinSession, media_id: &str) -> std::result::Result<Vec<VideoAsset>, JellyfinError> {
        let playback = self.client.fetch_playback_info(session, media_id).await?;
        let source = playback
            .media_sources
            .first()
            .ok_or_else(|| JellyfinError::NoMediaSource(media_id.to_string()))?;

        let url = stream_url(&session.server, media_id, source)?;
        Ok(vec![VideoAsset::new(url)])
    }
}

impl<P: ServerProbe> Extension for JellyfinExtension<P> {
    fn name(&self) -> &'static str {
        "jellyfin"
    }
}

#[async_trait]
impl<P: ServerProbe> MetadataExtension for JellyfinExtension<P> {
    async fn fetch_shows_by_query(&self, query: &str) -> Result<Vec<ShowEntry>> {
        let session = self.open_session().await?;
        let result = self.search(&session, query).await;
        self.finish(&session, result).await
    }

    async fn fetch_show(&self, show_id: &str) -> Result<Show> {
        let session = self.open_session().await?;
        let result = self.show(&session, show_id).await;
        self.finish(&session, result).await
    }

    async fn fetch_episodes(&self, show_id: &str, season: u32) -> Result<Vec<ShowEpisode>> {
        let session = self.open_session().await?;
        let result = self.episodes(&session, show_id, season).await;
        self.finish(&session, result).await
    }
}

#[async_trait]
impl<P: ServerProbe> FeedExtension for JellyfinExtension<P> {
    async fn fetch_feed_collections(&self) -> Result<Vec<FeedCollection>> {
        let session = self.open_session().await?;
        let result = self.feed_collections(&session).await;
        self.finish(&session, result).await
    }

    async fn fetch_trending_shows(&self) -> Result<Vec<Show>> {
        let session = self.open_session().await?;
        let result = self.trending(&session).await;
        self.finish(&session, result).await
    }
}

#[async_trait]
impl<P: ServerProbe> VideoExtension for JellyfinExtension<P> {
    async fn fetch_video_assets(&self, media_id: &str) -> Result<Vec<VideoAsset>> {
        let session = self.open_session().await?;
        let result = self.video_assets(&session, media_id).await;
        self.finish(&session, result).await
    }
}
