//! Jellyfin Provider Error Types

use teevi_core::ExtensionError;
use thiserror::Error;

use crate::error::ProviderClientError;

/// One candidate that did not answer the status probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    pub url: String,
    pub reason: String,
}

/// Server discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid server address \"{input}\": {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("No valid server candidates found for input \"{input}\". Please verify the URL format.")]
    NoCandidates { input: String },

    #[error("No server found for input \"{input}\" ({} candidate(s) tried). Please verify the URL format and try again.", .failures.len())]
    ServerNotFound {
        input: String,
        failures: Vec<CandidateFailure>,
    },
}

impl DiscoveryError {
    pub(crate) fn invalid_input(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JellyfinError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Client(#[from] ProviderClientError),

    #[error("Server and Username are required")]
    MissingCredentials,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to fetch {target}: {reason}")]
    Fetch { target: &'static str, reason: String },

    #[error("Season {0} not found")]
    SeasonNotFound(u32),

    #[error("No media source found for item: {0}")]
    NoMediaSource(String),

    #[error("Video source configuration error: direct stream support is disabled and no transcoding URL was provided")]
    VideoSourceConfig,
}

impl From<JellyfinError> for ExtensionError {
    fn from(err: JellyfinError) -> Self {
        match err {
            JellyfinError::Discovery(DiscoveryError::InvalidInput { .. }) => {
                Self::InvalidInput(err.to_string())
            }
            JellyfinError::Discovery(e) => Self::Discovery(e.to_string()),
            JellyfinError::Client(e) => e.into(),
            JellyfinError::MissingCredentials => Self::InvalidConfig(err.to_string()),
            JellyfinError::Auth(msg) => Self::AuthFailed(msg),
            JellyfinError::Fetch { .. } | JellyfinError::VideoSourceConfig => {
                Self::ApiError(err.to_string())
            }
            JellyfinError::SeasonNotFound(_) | JellyfinError::NoMediaSource(_) => {
                Self::NotFound(err.to_string())
            }
        }
    }
}
