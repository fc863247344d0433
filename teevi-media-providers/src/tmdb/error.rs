//! TMDB Provider Error Types

use teevi_core::ExtensionError;
use thiserror::Error;

use crate::error::ProviderClientError;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error(transparent)]
    Client(#[from] ProviderClientError),

    #[error("API token is not defined")]
    MissingToken,

    #[error("Invalid showId format: {0}. Expected format: \"movie/123\" or \"tv/456\"")]
    InvalidShowId(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl From<TmdbError> for ExtensionError {
    fn from(err: TmdbError) -> Self {
        match err {
            TmdbError::Client(e) => e.into(),
            TmdbError::MissingToken | TmdbError::InvalidUrl(_) => Self::InvalidConfig(err.to_string()),
            TmdbError::InvalidShowId(_) => Self::InvalidInput(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_show_id_is_invalid_input() {
        let err: ExtensionError = TmdbError::InvalidShowId("person/1".to_string()).into();
        assert!(matches!(err, ExtensionError::InvalidInput(_)));
        assert!(err.to_string().contains("person/1"));
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err: ExtensionError = TmdbError::MissingToken.into();
        assert!(matches!(err, ExtensionError::InvalidConfig(_)));
    }
}
