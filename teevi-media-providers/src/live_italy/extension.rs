//! Live Italy Extension
//!
//! Free-to-air Italian channels from a public M3U playlist, with a program
//! guide prebuilt from XMLTV sources.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use teevi_core::config::{Config, LiveItalyConfig};
use teevi_core::extension::{Extension, LiveChannel, LiveExtension, LiveProgram, Result, VideoAsset};
use tracing::debug;

use super::channels::{channel_category, ChannelCategory};
use super::epg::{build_guide, write_guide};
use super::error::LiveItalyError;
use super::playlist::{parse_playlist, PlaylistItem};
use crate::error::{build_http_client, check_response, json_with_limit, text_with_limit, ProviderClientError};

/// Markers the playlist appends to channel names (geoblocked, subscription)
const NAME_MARKERS: [char; 2] = ['Ⓖ', 'Ⓢ'];
const GEOBLOCKED_MARKER: char = 'Ⓖ';

pub struct LiveItalyExtension {
    client: Client,
    config: LiveItalyConfig,
}

impl LiveItalyExtension {
    #[must_use]
    pub const fn new(client: Client, config: LiveItalyConfig) -> Self {
        Self { client, config }
    }

    pub fn from_config(config: &Config) -> std::result::Result<Self, LiveItalyError> {
        let user_agent = format!("{}/{}", config.client.name, config.client.version);
        Ok(Self::new(
            build_http_client(&config.http, &user_agent)?,
            config.live_italy.clone(),
        ))
    }

    async fn fetch_playlist(&self) -> std::result::Result<Vec<PlaylistItem>, LiveItalyError> {
        let response = self
            .client
            .get(&self.config.playlist_url)
            .send()
            .await
            .map_err(ProviderClientError::from)?;
        let response = check_response(response)?;
        let content = text_with_limit(response).await?;

        let items = parse_playlist(&content);
        debug!(items = items.len(), "Fetched channel playlist");
        Ok(items)
    }

    async fn fetch_guide(&self) -> std::result::Result<Vec<LiveProgram>, LiveItalyError> {
        let response = self
            .client
            .get(&self.config.guide_url)
            .send()
            .await
            .map_err(ProviderClientError::from)?;
        let response = check_response(response)?;
        Ok(json_with_limit(response).await?)
    }

    fn channel(&self, item: &PlaylistItem) -> LiveChannel {
        LiveChannel {
            id: item.channel_id(),
            name: item.name.replace(NAME_MARKERS, "").trim().to_string(),
            kind: "channel".to_string(),
            logo_url: item.tvg_logo.clone(),
            language: self.config.language.clone(),
            geoblocked: item
                .tvg_name
                .as_deref()
                .is_some_and(|name| name.contains(GEOBLOCKED_MARKER)),
            category: channel_category(item.tvg_id.as_deref()).as_str().to_string(),
        }
    }

    /// Build the program guide from the configured XMLTV sources and write it
    /// to `output`. Returns the number of programs written.
    pub async fn make_epg_guide(&self, output: &Path) -> Result<usize> {
        let programs = build_guide(&self.client, &self.config.epg_sources).await?;
        write_guide(output, &programs).await?;
        Ok(programs.len())
    }
}

impl Extension for LiveItalyExtension {
    fn name(&self) -> &'static str {
        "live-italy"
    }
}

#[async_trait]
impl LiveExtension for LiveItalyExtension {
    async fn fetch_live_channels(&self) -> Result<Vec<LiveChannel>> {
        let items = self.fetch_playlist().await?;
        Ok(items
            .iter()
            .filter(|item| channel_category(item.tvg_id.as_deref()) != ChannelCategory::RegionalDvbT)
            .map(|item| self.channel(item))
            .collect())
    }

    async fn fetch_channel_programs(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<LiveProgram>> {
        let programs = self.fetch_guide().await?;
        if start.is_none() && end.is_none() {
            return Ok(programs);
        }

        let start = start.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = end.unwrap_or(DateTime::<Utc>::MAX_UTC);
        Ok(programs
            .into_iter()
            .filter(|program| program.overlaps(start, end))
            .collect())
    }

    async fn fetch_live_video_asset(&self, channel_id: &str) -> Result<Option<VideoAsset>> {
        let items = self.fetch_playlist().await?;
        let Some(item) = items.into_iter().find(|item| item.channel_id() == channel_id) else {
            return Ok(None);
        };

        let mut asset = VideoAsset::new(item.url);
        if let Some(referrer) = item.referrer {
            asset.headers.insert("Referer".to_string(), referrer);
        }
        if let Some(user_agent) = item.user_agent {
            asset.headers.insert("User-Agent".to_string(), user_agent);
        }
        Ok(Some(asset))
    }
}
