//! Program guide builder
//!
//! Merges XMLTV guides into the JSON guide the live extension publishes:
//! only channels with a known alias are kept, ids are rewritten to playlist
//! channel ids and duplicates across sources are dropped (first source wins).

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use futures::future::try_join_all;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use teevi_core::extension::LiveProgram;
use tracing::{debug, info, warn};

use super::channels::canonical_channel_id;
use super::error::LiveItalyError;
use crate::error::{check_response, text_with_limit, ProviderClientError};

static XMLTV_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})(\d{2})").expect("Invalid XMLTV date pattern")
});

/// `<tv>` root; `<channel>` elements are not needed
#[derive(Debug, Default, Deserialize)]
pub struct Xmltv {
    #[serde(rename = "programme", default)]
    pub programmes: Vec<Programme>,
}

#[derive(Debug, Deserialize)]
pub struct Programme {
    #[serde(rename = "@start")]
    pub start: String,
    #[serde(rename = "@stop")]
    pub stop: String,
    #[serde(rename = "@channel")]
    pub channel: String,
    #[serde(rename = "title", default)]
    pub titles: Vec<Text>,
    #[serde(rename = "desc", default)]
    pub descriptions: Vec<Text>,
}

/// Text element, attributes such as `lang` are ignored
#[derive(Debug, Deserialize)]
pub struct Text {
    #[serde(rename = "$text", default)]
    pub value: String,
}

pub fn parse_xmltv(xml: &str) -> Result<Xmltv, LiveItalyError> {
    Ok(quick_xml::de::from_str(xml)?)
}

/// Parse `YYYYMMDDhhmmss [±zzzz]`. The wall-clock time is taken as UTC and
/// the offset is ignored.
pub fn parse_xmltv_date(input: &str) -> Result<DateTime<Utc>, LiveItalyError> {
    let invalid = || LiveItalyError::InvalidDate(input.to_string());
    let captures = XMLTV_DATE.captures(input.trim()).ok_or_else(invalid)?;
    let field = |idx: usize| captures[idx].parse::<u32>().map_err(|_| invalid());

    let year = captures[1].parse::<i32>().map_err(|_| invalid())?;
    Utc.with_ymd_and_hms(year, field(2)?, field(3)?, field(4)?, field(5)?, field(6)?)
        .single()
        .ok_or_else(invalid)
}

/// Map one programme; `None` when its channel has no alias.
pub fn convert_programme(programme: &Programme) -> Result<Option<LiveProgram>, LiveItalyError> {
    let Some(channel_id) = canonical_channel_id(&programme.channel) else {
        return Ok(None);
    };

    let start_date = parse_xmltv_date(&programme.start)?;
    let end_date = parse_xmltv_date(&programme.stop)?;

    let title = programme
        .titles
        .first()
        .map(|text| text.value.trim().to_string())
        .unwrap_or_default();
    let description = programme
        .descriptions
        .first()
        .map(|text| text.value.trim())
        .filter(|desc| !desc.is_empty() && *desc != "-")
        .map(str::to_string);

    Ok(Some(LiveProgram {
        id: format!("{channel_id}-{}", start_date.format("%Y-%m-%dT%H:%M")),
        title,
        description,
        start_date,
        end_date,
        channel_id: channel_id.to_string(),
    }))
}

/// Supported programmes of one guide. Programmes with unreadable dates are
/// skipped.
#[must_use]
pub fn convert_guide(guide: &Xmltv) -> Vec<LiveProgram> {
    guide
        .programmes
        .iter()
        .filter_map(|programme| match convert_programme(programme) {
            Ok(program) => program,
            Err(e) => {
                warn!(channel = %programme.channel, error = %e, "Skipping programme");
                None
            }
        })
        .collect()
}

/// Merge guides in priority order: first occurrence of an id wins, result is
/// ordered by channel then start time.
#[must_use]
pub fn merge_guides(guides: impl IntoIterator<Item = Vec<LiveProgram>>) -> Vec<LiveProgram> {
    let mut seen = HashSet::new();
    let mut programs: Vec<LiveProgram> = guides
        .into_iter()
        .flatten()
        .filter(|program| seen.insert(program.id.clone()))
        .collect();
    programs.sort_by(|a, b| {
        a.channel_id
            .cmp(&b.channel_id)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });
    programs
}

async fn fetch_guide(client: &Client, url: &str) -> Result<Xmltv, LiveItalyError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(ProviderClientError::from)?;
    let response = check_response(response)?;
    let xml = text_with_limit(response).await?;
    let guide = parse_xmltv(&xml)?;
    debug!(url, programmes = guide.programmes.len(), "Fetched XMLTV guide");
    Ok(guide)
}

/// Fetch every source and merge them into one guide.
pub async fn build_guide(client: &Client, sources: &[String]) -> Result<Vec<LiveProgram>, LiveItalyError> {
    let guides = try_join_all(sources.iter().map(|url| fetch_guide(client, url))).await?;
    Ok(merge_guides(guides.iter().map(convert_guide)))
}

/// Write the guide as pretty-printed JSON, creating parent directories.
pub async fn write_guide(path: &Path, programs: &[LiveProgram]) -> Result<(), LiveItalyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(programs)?;
    tokio::fs::write(path, json).await?;
    info!(path = %path.display(), programs = programs.len(), "Wrote program guide");
    Ok(())
}
