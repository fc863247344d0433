// Extension Error Types

/// Errors surfaced to the host by any extension operation
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Server discovery failed: {0}")]
    Discovery(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtensionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtensionError::NotFound("Season 3".to_string());
        assert_eq!(err.to_string(), "Not found: Season 3");

        let err = ExtensionError::Discovery("no server".to_string());
        assert_eq!(err.to_string(), "Server discovery failed: no server");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ExtensionError = json_err.into();
        assert!(matches!(err, ExtensionError::JsonError(_)));
    }
}
