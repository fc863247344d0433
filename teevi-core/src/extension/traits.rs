// Extension Traits
//
// Capability interfaces the host drives. An extension implements the base
// `Extension` trait plus whichever capabilities its upstream service offers.

use super::{
    FeedCollection, LiveChannel, LiveProgram, Result, Show, ShowEntry, ShowEpisode, VideoAsset,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Base trait for every extension
pub trait Extension: Send + Sync {
    /// Extension identifier (e.g., "jellyfin", "tmdb", "live-italy")
    fn name(&self) -> &'static str;
}

/// Search, show detail and episode listing
///
/// Implemented by: Jellyfin, TMDB
#[async_trait]
pub trait MetadataExtension: Extension {
    /// Free-text search returning compact show entries
    async fn fetch_shows_by_query(&self, query: &str) -> Result<Vec<ShowEntry>>;

    /// Full detail of a single show
    async fn fetch_show(&self, show_id: &str) -> Result<Show>;

    /// Episodes of one season of a series
    async fn fetch_episodes(&self, show_id: &str, season: u32) -> Result<Vec<ShowEpisode>>;
}

/// Home feed content
///
/// Implemented by: Jellyfin, TMDB
#[async_trait]
pub trait FeedExtension: Extension {
    async fn fetch_feed_collections(&self) -> Result<Vec<FeedCollection>>;

    /// Highlighted shows. Extensions without a notion of trending return an
    /// empty list.
    async fn fetch_trending_shows(&self) -> Result<Vec<Show>>;
}

/// Playable asset resolution for on-demand media
///
/// Implemented by: Jellyfin
#[async_trait]
pub trait VideoExtension: Extension {
    async fn fetch_video_assets(&self, media_id: &str) -> Result<Vec<VideoAsset>>;
}

/// Live TV channels and their program guide
///
/// Implemented by: Live Italy
#[async_trait]
pub trait LiveExtension: Extension {
    async fn fetch_live_channels(&self) -> Result<Vec<LiveChannel>>;

    /// Programs overlapping `[start, end]`. A missing bound is open-ended;
    /// with neither bound the full guide is returned.
    async fn fetch_channel_programs(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<LiveProgram>>;

    /// Stream for a channel, `None` when the channel is unknown
    async fn fetch_live_video_asset(&self, channel_id: &str) -> Result<Option<VideoAsset>>;
}
