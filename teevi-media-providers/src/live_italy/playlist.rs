//! Extended M3U playlist parsing
//!
//! Understands the subset used by IPTV channel lists:
//!
//! ```text
//! #EXTM3U
//! #EXTINF:-1 tvg-id="Rai1.it" tvg-name="Rai 1 Ⓖ" tvg-logo="https://..." group-title="Rai",Rai 1 Ⓖ
//! #EXTVLCOPT:http-referrer=https://www.raiplay.it/
//! https://example.com/rai1.m3u8
//! ```

use std::sync::LazyLock;

use regex::Regex;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_-]+)="([^"]*)""#).expect("Invalid attribute pattern")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"));

const EXTINF: &str = "#EXTINF:";
const EXTVLCOPT: &str = "#EXTVLCOPT:";

/// One playable entry of a playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistItem {
    /// Display name (text after the attribute list)
    pub name: String,
    pub tvg_id: Option<String>,
    pub tvg_name: Option<String>,
    pub tvg_logo: Option<String>,
    pub group_title: Option<String>,
    pub url: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

impl PlaylistItem {
    /// `tvg-id`, else the display name with whitespace runs replaced by `.`,
    /// lower-cased
    #[must_use]
    pub fn channel_id(&self) -> String {
        match self.tvg_id.as_deref() {
            Some(id) => id.to_string(),
            None => WHITESPACE.replace_all(&self.name, ".").to_lowercase(),
        }
    }
}

/// Parse playlist text. Entries without a URL line are dropped.
#[must_use]
pub fn parse_playlist(content: &str) -> Vec<PlaylistItem> {
    let mut items = Vec::new();
    let mut pending: Option<PlaylistItem> = None;

    for line in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(info) = line.strip_prefix(EXTINF) {
            pending = Some(parse_extinf(info));
        } else if let Some(option) = line.strip_prefix(EXTVLCOPT) {
            if let Some(item) = pending.as_mut() {
                apply_vlc_option(item, option);
            }
        } else if line.starts_with('#') {
            continue;
        } else if let Some(mut item) = pending.take() {
            item.url = line.to_string();
            items.push(item);
        }
    }

    items
}

fn parse_extinf(info: &str) -> PlaylistItem {
    let (attributes, name) = split_display_name(info);
    let mut item = PlaylistItem {
        name: name.trim().to_string(),
        ..PlaylistItem::default()
    };

    for capture in ATTRIBUTE.captures_iter(attributes) {
        let value = capture[2].trim();
        if value.is_empty() {
            continue;
        }
        let value = Some(value.to_string());
        match &capture[1] {
            "tvg-id" => item.tvg_id = value,
            "tvg-name" => item.tvg_name = value,
            "tvg-logo" => item.tvg_logo = value,
            "group-title" => item.group_title = value,
            _ => {}
        }
    }

    item
}

/// Split at the first comma outside a quoted attribute value.
fn split_display_name(info: &str) -> (&str, &str) {
    let mut quoted = false;
    for (idx, c) in info.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => return (&info[..idx], &info[idx + 1..]),
            _ => {}
        }
    }
    (info, "")
}

fn apply_vlc_option(item: &mut PlaylistItem, option: &str) {
    let Some((key, value)) = option.split_once('=') else {
        return;
    };
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    match key.trim() {
        "http-referrer" => item.referrer = Some(value.to_string()),
        "http-user-agent" => item.user_agent = Some(value.to_string()),
        _ => {}
    }
}
