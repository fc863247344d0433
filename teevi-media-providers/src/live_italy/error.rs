//! Live Italy Error Types

use teevi_core::ExtensionError;
use thiserror::Error;

use crate::error::ProviderClientError;

#[derive(Debug, Error)]
pub enum LiveItalyError {
    #[error(transparent)]
    Client(#[from] ProviderClientError),

    #[error("Invalid XMLTV document: {0}")]
    Xmltv(String),

    #[error("Invalid date format in input: {0}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::DeError> for LiveItalyError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::Xmltv(err.to_string())
    }
}

impl From<LiveItalyError> for ExtensionError {
    fn from(err: LiveItalyError) -> Self {
        match err {
            LiveItalyError::Client(e) => e.into(),
            LiveItalyError::Xmltv(_) | LiveItalyError::InvalidDate(_) => Self::ParseError(err.to_string()),
            LiveItalyError::Io(e) => Self::IoError(e),
            LiveItalyError::Json(e) => Self::JsonError(e),
        }
    }
}
