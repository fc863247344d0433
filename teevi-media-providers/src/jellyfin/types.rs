//! Jellyfin API Data Structures

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Unauthenticated server status (`System/Info/Public`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicSystemInfo {
    /// Address the server advertises for itself
    #[serde(rename = "LocalAddress", default)]
    pub local_address: String,
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "ServerName", default)]
    pub server_name: String,
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "ProductName", default)]
    pub product_name: Option<String>,
}

/// Authentication response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "AccessToken", default)]
    pub access_token: Option<String>,
    #[serde(rename = "User", default)]
    pub user: Option<User>,
}

/// User information (for authentication response)
#[derive(Debug, Deserialize)]
pub struct User {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

/// Library item (movie, series, season, episode, view or genre)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaseItem {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    #[serde(rename = "Overview", default)]
    pub overview: Option<String>,
    #[serde(rename = "Genres", default)]
    pub genres: Option<Vec<String>>,
    #[serde(rename = "Taglines", default)]
    pub taglines: Option<Vec<String>>,
    #[serde(rename = "RunTimeTicks", default)]
    pub run_time_ticks: Option<u64>,
    #[serde(rename = "PremiereDate", default)]
    pub premiere_date: Option<String>,
    #[serde(rename = "ProductionYear", default)]
    pub production_year: Option<i32>,
    #[serde(rename = "CommunityRating", default)]
    pub community_rating: Option<f64>,
    #[serde(rename = "IndexNumber", default)]
    pub index_number: Option<u32>,
    #[serde(rename = "CollectionType", default)]
    pub collection_type: Option<String>,
    #[serde(rename = "ImageTags", default)]
    pub image_tags: Option<HashMap<String, String>>,
    #[serde(rename = "BackdropImageTags", default)]
    pub backdrop_image_tags: Option<Vec<String>>,
}

impl BaseItem {
    #[must_use]
    pub fn is_movie(&self) -> bool {
        self.item_type.as_deref() == Some("Movie")
    }

    #[must_use]
    pub fn is_series(&self) -> bool {
        self.item_type.as_deref() == Some("Series")
    }
}

/// Paged item list
#[derive(Debug, Deserialize)]
pub struct ItemsResponse {
    #[serde(rename = "Items", default)]
    pub items: Option<Vec<BaseItem>>,
    #[serde(rename = "TotalRecordCount", default)]
    pub total_record_count: u64,
}

/// Playback information response
#[derive(Debug, Deserialize)]
pub struct PlaybackInfoResponse {
    #[serde(rename = "MediaSources", default)]
    pub media_sources: Vec<MediaSource>,
}

/// Media source with playback capabilities
#[derive(Debug, Deserialize, Clone)]
pub struct MediaSource {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Container", default)]
    pub container: Option<String>,
    #[serde(rename = "SupportsTranscoding", default)]
    pub supports_transcoding: bool,
    #[serde(rename = "SupportsDirectStream", default)]
    pub supports_direct_stream: bool,
    #[serde(rename = "SupportsDirectPlay", default)]
    pub supports_direct_play: bool,
    #[serde(rename = "TranscodingUrl", default)]
    pub transcoding_url: Option<String>,
}

/// Device profile for codec negotiation (Apple-class video player)
pub fn default_device_profile() -> Value {
    serde_json::json!({
        "DirectPlayProfiles": [
            {
                "Container": "mp4",
                "Type": "Video",
                "VideoCodec": "h261,hevc,mpeg4,h264",
                "AudioCodec": "aac,ac3,eac3,flac,alac"
            },
            {
                "Container": "m4v",
                "Type": "Video",
                "VideoCodec": "h264,mpeg4",
                "AudioCodec": "aac,ac3,alac"
            },
            {
                "Container": "mov",
                "Type": "Video",
                "VideoCodec": "h264,hevc,mjpeg4,mpeg4",
                "AudioCodec": "aac,ac3,alac,eac3,mp3,pcm_s16be,pcm_s16le,pcm_s24be,pcm_s24le"
            },
            {
                "Container": "mpegts",
                "Type": "Video",
                "VideoCodec": "h264",
                "AudioCodec": "aac,ac3,eac3,mp3"
            },
            {
                "Container": "3gp",
                "Type": "Video",
                "VideoCodec": "h264,mpeg4",
                "AudioCodec": "aac,amr_nb"
            },
            {
                "Container": "3g2",
                "Type": "Video",
                "VideoCodec": "h264,mpeg4",
                "AudioCodec": "aac,amr_nb"
            },
            {
                "Container": "avi",
                "Type": "Video",
                "VideoCodec": "mjpeg",
                "AudioCodec": "pcm_mulaw,pcm_s16le"
            }
        ],
        "TranscodingProfiles": [
            {
                "Container": "mp4",
                "Type": "Video",
                "AudioCodec": "aac,ac3,alac,eac3,flac",
                "VideoCodec": "hevc,h264,mpeg4",
                "Context": "Streaming",
                "Protocol": "hls",
                "MaxAudioChannels": "8",
                "MinSegments": "2",
                "BreakOnNonKeyFrames": true,
                "EnableSubtitlesInManifest": true
            }
        ],
        "SubtitleProfiles": [
            { "Format": "cc_dec", "Method": "Embed" },
            { "Format": "ttml", "Method": "Embed" },
            { "Format": "dvbsub", "Method": "Encode" },
            { "Format": "dvdsub", "Method": "Encode" },
            { "Format": "pgssub", "Method": "Encode" },
            { "Format": "xsub", "Method": "Encode" },
            { "Format": "vtt", "Method": "Hls" }
        ]
    })
}
