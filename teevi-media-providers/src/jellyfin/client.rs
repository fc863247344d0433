//! Jellyfin HTTP Client

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use teevi_core::config::ClientConfig;
use tracing::debug;
use url::Url;

use super::error::JellyfinError;
use super::types::{default_device_profile, AuthResponse, BaseItem, ItemsResponse, PlaybackInfoResponse};
use crate::error::{check_response, json_with_limit, ProviderClientError};

/// Characters escaped inside `Authorization` header values (non-ASCII is
/// always escaped)
const HEADER_VALUE: &AsciiSet = &CONTROLS.add(b'"').add(b',').add(b'%');

const ITEM_TYPES: &str = "Movie,Series";

/// Identity announced in the `Authorization: MediaBrowser ...` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
    pub device_name: String,
    pub device_id: String,
}

impl From<&ClientConfig> for ClientInfo {
    fn from(config: &ClientConfig) -> Self {
        Self {
            name: config.name.clone(),
            version: config.version.clone(),
            device_name: config.device_name.clone(),
            device_id: config.device_id.clone(),
        }
    }
}

impl ClientInfo {
    /// `MediaBrowser` authorization header value, with `Token` when signed in
    #[must_use]
    pub fn authorization_header(&self, token: Option<&str>) -> String {
        let mut header = format!(
            "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
            encode_header_value(&self.name),
            encode_header_value(&self.device_name),
            encode_header_value(&self.device_id),
            encode_header_value(&self.version),
        );
        if let Some(token) = token {
            header.push_str(&format!(", Token=\"{}\"", encode_header_value(token)));
        }
        header
    }
}

fn encode_header_value(value: &str) -> String {
    utf8_percent_encode(value, HEADER_VALUE).to_string()
}

/// Signed-in user on a resolved server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinSession {
    /// Server base URL, always ending with `/`
    pub server: Url,
    pub token: String,
    pub user_id: String,
}

/// Optional filters for `Items` queries
#[derive(Debug, Default, Clone, Copy)]
pub struct ItemsQuery<'a> {
    pub filters: Option<&'a str>,
    pub genre_id: Option<&'a str>,
    pub parent_id: Option<&'a str>,
    pub search_term: Option<&'a str>,
}

/// Jellyfin REST client. Stateless: every call takes the session it acts for.
#[derive(Debug, Clone)]
pub struct JellyfinClient {
    client: Client,
    info: ClientInfo,
}

impl JellyfinClient {
    #[must_use]
    pub const fn new(client: Client, info: ClientInfo) -> Self {
        Self { client, info }
    }

    /// Join path segments onto the server base URL, escaping each segment.
    pub fn endpoint(server: &Url, segments: &[&str]) -> Result<Url, ProviderClientError> {
        let mut url = server.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| ProviderClientError::InvalidConfig(format!("Invalid server URL: {server}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, token: Option<&str>) -> Result<RequestBuilder, ProviderClientError> {
        let header = HeaderValue::from_str(&self.info.authorization_header(token))?;
        Ok(request
            .header(AUTHORIZATION, header)
            .header(ACCEPT, "application/json"))
    }

    /// Sign in with username and password.
    pub async fn authenticate_by_name(
        &self,
        server: &Url,
        username: &str,
        password: &str,
    ) -> Result<JellyfinSession, JellyfinError> {
        let url = Self::endpoint(server, &["Users", "AuthenticateByName"])?;
        let body = json!({
            "Username": username,
            "Pw": password,
        });

        let response = self
            .authorized(self.client.post(url), None)?
            .json(&body)
            .send()
            .await
            .map_err(ProviderClientError::from)?;

        if !response.status().is_success() {
            return Err(JellyfinError::Auth(format!("Login failed: {}", response.status())));
        }

        let auth: AuthResponse = json_with_limit(response).await?;
        let user_id = auth.user.and_then(|user| user.id).filter(|id| !id.is_empty());
        match (auth.access_token.filter(|token| !token.is_empty()), user_id) {
            (Some(token), Some(user_id)) => {
                debug!(server = %server, user_id = %user_id, "Signed in to Jellyfin");
                Ok(JellyfinSession {
                    server: server.clone(),
                    token,
                    user_id,
                })
            }
            _ => Err(JellyfinError::Auth("Authentication failed".to_string())),
        }
    }

    /// End the session on the server.
    pub async fn logout(&self, session: &JellyfinSession) -> Result<(), JellyfinError> {
        let url = Self::endpoint(&session.server, &["Sessions", "Logout"])?;
        let response = self
            .authorized(self.client.post(url), Some(&session.token))?
            .send()
            .await
            .map_err(ProviderClientError::from)?;
        check_response(response)?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &JellyfinSession,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, JellyfinError> {
        let url = Self::endpoint(&session.server, segments)?;
        let response = self
            .authorized(self.client.get(url), Some(&session.token))?
            .query(query)
            .send()
            .await
            .map_err(ProviderClientError::from)?;
        let response = check_response(response)?;
        Ok(json_with_limit(response).await?)
    }

    async fn get_items(
        &self,
        session: &JellyfinSession,
        target: &'static str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<BaseItem>, JellyfinError> {
        let response: ItemsResponse = self.get_json(session, segments, query).await?;
        response.items.ok_or_else(|| JellyfinError::Fetch {
            target,
            reason: "response has no Items".to_string(),
        })
    }

    /// Libraries of the signed-in user, limited to movies and TV shows
    pub async fn fetch_user_views(&self, session: &JellyfinSession) -> Result<Vec<BaseItem>, JellyfinError> {
        let views = self
            .get_items(session, "user views", &["UserViews"], &[("userId", session.user_id.as_str())])
            .await?;
        Ok(views
            .into_iter()
            .filter(|view| matches!(view.collection_type.as_deref(), Some("tvshows" | "movies")))
            .collect())
    }

    pub async fn fetch_items(
        &self,
        session: &JellyfinSession,
        filter: ItemsQuery<'_>,
    ) -> Result<Vec<BaseItem>, JellyfinError> {
        let mut query = vec![
            ("userId", session.user_id.as_str()),
            ("recursive", "true"),
            ("includeItemTypes", ITEM_TYPES),
            ("sortBy", "Name"),
            ("sortOrder", "Descending"),
            ("enableImageTypes", "Primary,Backdrop,Logo,Banner"),
            ("fields", "Genres,Overview,Taglines"),
        ];
        if let Some(filters) = filter.filters {
            query.push(("filters", filters));
        }
        if let Some(genre_id) = filter.genre_id {
            query.push(("genreIds", genre_id));
        }
        if let Some(parent_id) = filter.parent_id {
            query.push(("parentId", parent_id));
        }
        if let Some(search_term) = filter.search_term {
            query.push(("searchTerm", search_term));
        }

        self.get_items(session, "items", &["Items"], &query).await
    }

    pub async fn fetch_item(&self, session: &JellyfinSession, item_id: &str) -> Result<BaseItem, JellyfinError> {
        self.get_json(session, &["Items", item_id], &[("userId", session.user_id.as_str())])
            .await
    }

    pub async fn fetch_genres(&self, session: &JellyfinSession) -> Result<Vec<BaseItem>, JellyfinError> {
        self.get_items(
            session,
            "genres",
            &["Genres"],
            &[
                ("userId", session.user_id.as_str()),
                ("sortBy", "SortName"),
                ("sortOrder", "Ascending"),
                ("enableTotalRecordCount", "false"),
                ("includeItemTypes", ITEM_TYPES),
            ],
        )
        .await
    }

    /// Seasons of a series; specials without an index number are dropped.
    pub async fn fetch_seasons(
        &self,
        session: &JellyfinSession,
        series_id: &str,
    ) -> Result<Vec<BaseItem>, JellyfinError> {
        let seasons = self
            .get_items(
                session,
                "seasons",
                &["Shows", series_id, "Seasons"],
                &[("userId", session.user_id.as_str())],
            )
            .await?;
        Ok(seasons
            .into_iter()
            .filter(|season| season.index_number.is_some_and(|n| n > 0))
            .collect())
    }

    pub async fn fetch_season_episodes(
        &self,
        session: &JellyfinSession,
        series_id: &str,
        season_id: &str,
    ) -> Result<Vec<BaseItem>, JellyfinError> {
        self.get_items(
            session,
            "episodes",
            &["Shows", series_id, "Episodes"],
            &[
                ("seasonId", season_id),
                ("fields", "Overview"),
                ("userId", session.user_id.as_str()),
                ("sortBy", "IndexNumber"),
            ],
        )
        .await
    }

    pub async fn fetch_similar_items(
        &self,
        session: &JellyfinSession,
        item_id: &str,
    ) -> Result<Vec<BaseItem>, JellyfinError> {
        self.get_items(
            session,
            "similar items",
            &["Items", item_id, "Similar"],
            &[("userId", session.user_id.as_str()), ("limit", "12")],
        )
        .await
    }

    /// Negotiate playback for an item against the built-in device profile.
    pub async fn fetch_playback_info(
        &self,
        session: &JellyfinSession,
        item_id: &str,
    ) -> Result<PlaybackInfoResponse, JellyfinError> {
        let url = Self::endpoint(&session.server, &["Items", item_id, "PlaybackInfo"])?;
        let body = json!({
            "UserId": session.user_id,
            "AlwaysBurnInSubtitleWhenTranscoding": false,
            "DeviceProfile": default_device_profile(),
            "EnableDirectPlay": true,
            "EnableDirectStream": true,
            "EnableTranscoding": true,
        });

        let response = self
            .authorized(self.client.post(url), Some(&session.token))?
            .json(&body)
            .send()
            .await
            .map_err(ProviderClientError::from)?;
        let response = check_response(response)?;
        Ok(json_with_limit(response).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ClientInfo {
        ClientInfo::from(&ClientConfig {
            name: "Teevi for Jellyfin".to_string(),
            version: "1.0.0".to_string(),
            device_name: "Teevi Client".to_string(),
            device_id: "tv-id".to_string(),
        })
    }

    #[test]
    fn test_authorization_header_without_token() {
        assert_eq!(
            info().authorization_header(None),
            r#"MediaBrowser Client="Teevi for Jellyfin", Device="Teevi Client", DeviceId="tv-id", Version="1.0.0""#
        );
    }

    #[test]
    fn test_authorization_header_with_token() {
        let header = info().authorization_header(Some("abc123"));
        assert!(header.ends_with(r#", Token="abc123""#));
    }

    #[test]
    fn test_authorization_header_escapes_values() {
        let mut info = info();
        info.device_name = "Salotto \"TV\", 100%".to_string();
        info.name = "Téevi".to_string();
        let header = info.authorization_header(None);
        assert!(header.contains(r#"Device="Salotto %22TV%22%2C 100%25""#));
        assert!(header.contains(r#"Client="T%C3%A9evi""#));
        assert!(HeaderValue::from_str(&header).is_ok());
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_escapes_segments() {
        let server = Url::parse("https://example.com/jellyfin/").unwrap();
        let url = JellyfinClient::endpoint(&server, &["Items", "a b/c", "PlaybackInfo"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/jellyfin/Items/a%20b%2Fc/PlaybackInfo");

        let root = Url::parse("http://10.0.0.2:8096/").unwrap();
        let url = JellyfinClient::endpoint(&root, &["Sessions", "Logout"]).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2:8096/Sessions/Logout");
    }
}
