//! Shared provider client error types
//!
//! Common error enum and HTTP helpers used by all provider clients (Jellyfin, TMDB, Live Italy).

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use teevi_core::config::HttpConfig;
use teevi_core::ExtensionError;
use thiserror::Error;

/// Maximum response body size for provider HTTP calls (16 MB).
/// Prevents OOM from malicious or misconfigured upstream servers.
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Common error type for all provider HTTP clients.
#[derive(Debug, Error)]
pub enum ProviderClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

/// Build the HTTP client shared by one extension instance.
///
/// Redirects are followed (reverse proxies commonly redirect `http` to
/// `https`), but bounded.
pub fn build_http_client(
    config: &HttpConfig,
    user_agent: &str,
) -> Result<Client, ProviderClientError> {
    build_client_with_timeouts(config.connect_timeout(), config.request_timeout(), user_agent)
}

pub(crate) fn build_client_with_timeouts(
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: &str,
) -> Result<Client, ProviderClientError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .redirect(reqwest::redirect::Policy::limited(5))
        .user_agent(user_agent)
        .build()
        .map_err(Into::into)
}

/// Read a response body with size limit.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes.
pub async fn bytes_with_limit(
    response: reqwest::Response,
) -> Result<Bytes, ProviderClientError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(ProviderClientError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(ProviderClientError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    Ok(bytes)
}

/// Read a response body with size limit and deserialize as JSON.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderClientError> {
    let bytes = bytes_with_limit(response).await?;
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Read a response body with size limit as UTF-8 text (lossy).
pub async fn text_with_limit(response: reqwest::Response) -> Result<String, ProviderClientError> {
    let bytes = bytes_with_limit(response).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ProviderClientError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(ProviderClientError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

impl From<reqwest::Error> for ProviderClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ProviderClientError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<ProviderClientError> for ExtensionError {
    fn from(err: ProviderClientError) -> Self {
        match err {
            ProviderClientError::Network(msg) => Self::NetworkError(msg),
            ProviderClientError::Http { status, url } => {
                Self::ApiError(format!("HTTP {status} for {url}"))
            }
            ProviderClientError::Parse(msg) => Self::ParseError(msg),
            ProviderClientError::Auth(msg) => Self::AuthFailed(msg),
            ProviderClientError::InvalidConfig(msg) | ProviderClientError::InvalidHeader(msg) => {
                Self::InvalidConfig(msg)
            }
            err @ ProviderClientError::ResponseTooLarge { .. } => Self::ApiError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_network() {
        let err = ProviderClientError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_error_display_http() {
        let err = ProviderClientError::Http {
            status: reqwest::StatusCode::NOT_FOUND,
            url: "https://example.com/api".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 Not Found for https://example.com/api");
    }

    #[test]
    fn test_error_display_response_too_large() {
        let err = ProviderClientError::ResponseTooLarge { size: 20_000_000 };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains(&MAX_RESPONSE_SIZE.to_string()));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ProviderClientError = json_err.into();
        assert!(matches!(err, ProviderClientError::Parse(_)));
    }

    #[test]
    fn test_into_extension_error() {
        let err: ExtensionError = ProviderClientError::Auth("bad password".to_string()).into();
        assert!(matches!(err, ExtensionError::AuthFailed(_)));

        let err: ExtensionError = ProviderClientError::Http {
            status: reqwest::StatusCode::UNAUTHORIZED,
            url: "https://example.com/Items".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Provider API error: HTTP 401 Unauthorized for https://example.com/Items"
        );
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&HttpConfig::default(), "teevi-test/1.0").is_ok());
    }
}
