//! Jellyfin item to host model mapping

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use teevi_core::extension::{Show, ShowEntry, ShowEpisode, ShowKind, ShowSeason};
use url::Url;

use super::client::JellyfinClient;
use super::error::JellyfinError;
use super::types::{BaseItem, MediaSource};
use crate::error::ProviderClientError;

const TICKS_PER_SECOND: u64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Primary,
    Backdrop,
    Logo,
}

impl ImageType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Backdrop => "Backdrop",
            Self::Logo => "Logo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageQuality {
    Low,
    Medium,
    High,
    Original,
}

impl ImageQuality {
    /// `(quality, maxWidth)`, `None` for the untouched original
    const fn resize(self) -> Option<(u32, u32)> {
        match self {
            Self::Low => Some((70, 200)),
            Self::Medium => Some((80, 500)),
            Self::High => Some((90, 1000)),
            Self::Original => None,
        }
    }
}

/// Image URL for an item, `None` when the item has no image of that type.
#[must_use]
pub fn image_url(server: &Url, item: &BaseItem, image_type: ImageType, quality: ImageQuality) -> Option<String> {
    let id = item.id.as_deref()?;
    let tag = match image_type {
        ImageType::Backdrop => item.backdrop_image_tags.as_ref()?.first()?,
        _ => item.image_tags.as_ref()?.get(image_type.as_str())?,
    };

    let mut url = JellyfinClient::endpoint(server, &["Items", id, "Images", image_type.as_str()]).ok()?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("tag", tag);
        if let Some((quality, max_width)) = quality.resize() {
            query.append_pair("quality", &quality.to_string());
            query.append_pair("maxWidth", &max_width.to_string());
        }
    }
    Some(url.into())
}

fn kind(item: &BaseItem) -> ShowKind {
    if item.is_movie() {
        ShowKind::Movie
    } else {
        ShowKind::Series
    }
}

/// Runtime in whole seconds, rounded
fn duration(item: &BaseItem) -> u64 {
    item.run_time_ticks
        .map_or(0, |ticks| (ticks + TICKS_PER_SECOND / 2) / TICKS_PER_SECOND)
}

fn premiere_date(item: &BaseItem) -> Option<NaiveDate> {
    let raw = item.premiere_date.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok())
}

fn year(item: &BaseItem) -> Option<i32> {
    premiere_date(item)
        .map(|date| date.year())
        .or(item.production_year)
}

/// Compact entry; items without id or name are skipped.
#[must_use]
pub fn map_show_entry(item: &BaseItem, server: &Url) -> Option<ShowEntry> {
    Some(ShowEntry {
        kind: kind(item),
        id: item.id.clone()?,
        title: item.name.clone()?,
        poster_url: image_url(server, item, ImageType::Primary, ImageQuality::Low),
        year: year(item),
    })
}

#[must_use]
pub fn map_show_entries(items: &[BaseItem], server: &Url) -> Vec<ShowEntry> {
    items
        .iter()
        .filter_map(|item| map_show_entry(item, server))
        .collect()
}

#[must_use]
pub fn map_show(item: &BaseItem, server: &Url) -> Show {
    let release_date = premiere_date(item).unwrap_or_else(|| Utc::now().date_naive());

    Show {
        kind: kind(item),
        id: item.id.clone().unwrap_or_default(),
        title: item.name.clone().unwrap_or_default(),
        overview: item.overview.clone().unwrap_or_default(),
        release_date: Some(release_date.format("%Y-%m-%d").to_string()),
        genres: item.genres.clone().unwrap_or_default(),
        duration: duration(item),
        poster_url: image_url(server, item, ImageType::Primary, ImageQuality::High),
        clean_poster_url: None,
        backdrop_url: image_url(server, item, ImageType::Backdrop, ImageQuality::High),
        logo_url: image_url(server, item, ImageType::Logo, ImageQuality::High),
        rating: item.community_rating,
        status: None,
        seasons: None,
        related_shows: None,
    }
}

#[must_use]
pub fn map_season(item: &BaseItem) -> Option<ShowSeason> {
    Some(ShowSeason {
        number: item.index_number?,
        name: item.name.clone(),
    })
}

#[must_use]
pub fn map_episode(item: &BaseItem, server: &Url) -> Option<ShowEpisode> {
    Some(ShowEpisode {
        id: item.id.clone()?,
        number: item.index_number.unwrap_or_default(),
        title: item.name.clone(),
        overview: Some(item.overview.clone().unwrap_or_default()),
        thumbnail_url: image_url(server, item, ImageType::Primary, ImageQuality::Medium),
        duration: duration(item),
    })
}

/// Playable URL for a media source: the static stream when direct streaming
/// is supported, otherwise the server-provided transcoding URL.
pub fn stream_url(server: &Url, item_id: &str, source: &MediaSource) -> Result<String, JellyfinError> {
    if source.supports_direct_stream {
        let mut url = JellyfinClient::endpoint(server, &["Videos", item_id, "stream"])?;
        if let Some(container) = source.container.as_deref().filter(|c| !c.is_empty()) {
            let path = format!("{}.{container}", url.path());
            url.set_path(&path);
        }
        url.query_pairs_mut().append_pair("Static", "true");
        return Ok(url.into());
    }

    if let Some(transcoding_url) = source.transcoding_url.as_deref() {
        return server
            .join(transcoding_url)
            .map(Into::into)
            .map_err(|e| ProviderClientError::Parse(format!("Invalid transcoding URL: {e}")).into());
    }

    Err(JellyfinError::VideoSourceConfig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn server() -> Url {
        Url::parse("https://media.example.com/jf/").unwrap()
    }

    fn movie() -> BaseItem {
        BaseItem {
            id: Some("m1".to_string()),
            name: Some("Heat".to_string()),
            item_type: Some("Movie".to_string()),
            run_time_ticks: Some(102_450_000_000),
            premiere_date: Some("1995-12-15T00:00:00.0000000Z".to_string()),
            production_year: Some(1994),
            image_tags: Some(HashMap::from([("Primary".to_string(), "ptag".to_string())])),
            backdrop_image_tags: Some(vec!["btag".to_string(), "other".to_string()]),
            ..BaseItem::default()
        }
    }

    #[test]
    fn test_image_url_presets() {
        let item = movie();
        assert_eq!(
            image_url(&server(), &item, ImageType::Primary, ImageQuality::Low).as_deref(),
            Some("https://media.example.com/jf/Items/m1/Images/Primary?tag=ptag&quality=70&maxWidth=200")
        );
        assert_eq!(
            image_url(&server(), &item, ImageType::Backdrop, ImageQuality::High).as_deref(),
            Some("https://media.example.com/jf/Items/m1/Images/Backdrop?tag=btag&quality=90&maxWidth=1000")
        );
        assert_eq!(
            image_url(&server(), &item, ImageType::Primary, ImageQuality::Original).as_deref(),
            Some("https://media.example.com/jf/Items/m1/Images/Primary?tag=ptag")
        );
        assert!(image_url(&server(), &item, ImageType::Logo, ImageQuality::High).is_none());
    }

    #[test]
    fn test_map_show_entry() {
        let entry = map_show_entry(&movie(), &server()).unwrap();
        assert_eq!(entry.kind, ShowKind::Movie);
        assert_eq!(entry.year, Some(1995));
        assert!(entry.poster_url.unwrap().contains("maxWidth=200"));

        let nameless = BaseItem {
            id: Some("x".to_string()),
            ..BaseItem::default()
        };
        assert!(map_show_entry(&nameless, &server()).is_none());
    }

    #[test]
    fn test_map_show() {
        let show = map_show(&movie(), &server());
        assert_eq!(show.duration, 10245);
        assert_eq!(show.release_date.as_deref(), Some("1995-12-15"));
        assert!(show.overview.is_empty());
        assert!(show.logo_url.is_none());
        assert!(show.backdrop_url.is_some());
    }

    #[test]
    fn test_year_falls_back_to_production_year() {
        let item = BaseItem {
            item_type: Some("Series".to_string()),
            production_year: Some(2008),
            ..BaseItem::default()
        };
        assert_eq!(year(&item), Some(2008));
        assert_eq!(kind(&item), ShowKind::Series);
        assert_eq!(duration(&item), 0);
    }

    #[test]
    fn test_duration_rounds() {
        let item = BaseItem {
            run_time_ticks: Some(15_000_000),
            ..BaseItem::default()
        };
        assert_eq!(duration(&item), 2);
    }

    #[test]
    fn test_stream_url_direct() {
        let source = MediaSource {
            id: "s".to_string(),
            container: Some("mkv".to_string()),
            supports_transcoding: true,
            supports_direct_stream: true,
            supports_direct_play: false,
            transcoding_url: None,
        };
        assert_eq!(
            stream_url(&server(), "m1", &source).unwrap(),
            "https://media.example.com/jf/Videos/m1/stream.mkv?Static=true"
        );
    }

    #[test]
    fn test_stream_url_transcoding_and_missing() {
        let mut source = MediaSource {
            id: "s".to_string(),
            container: None,
            supports_transcoding: true,
            supports_direct_stream: false,
            supports_direct_play: false,
            transcoding_url: Some("videos/m1/master.m3u8?MediaSourceId=s".to_string()),
        };
        assert_eq!(
            stream_url(&server(), "m1", &source).unwrap(),
            "https://media.example.com/jf/videos/m1/master.m3u8?MediaSourceId=s"
        );

        source.transcoding_url = None;
        assert!(matches!(
            stream_url(&server(), "m1", &source),
            Err(JellyfinError::VideoSourceConfig)
        ));
    }
}
