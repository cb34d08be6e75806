//! Error types for the storaudit CLI

use std::fmt;
use thiserror::Error;

/// Result type alias for storaudit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Could not determine home directory")]
    NoHome,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Which JWT segment a decode failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtSegment {
    Header,
    Payload,
}

impl fmt::Display for JwtSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JwtSegment::Header => write!(f, "header"),
            JwtSegment::Payload => write!(f, "payload"),
        }
    }
}

/// JWT decoding errors
///
/// These are surfaced to the caller as structured results; a malformed token
/// in the middle of a batch never aborts the surrounding operation.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("not a well-formed JWT: expected 3 dot-separated segments, found {0}")]
    Format(usize),

    #[error("failed to decode {segment} segment: {reason}")]
    Segment { segment: JwtSegment, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_error_format_message() {
        let err = JwtError::Format(2);
        let msg = err.to_string();
        assert!(msg.contains("3 dot-separated segments"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_jwt_error_segment_names_segment() {
        let err = JwtError::Segment {
            segment: JwtSegment::Payload,
            reason: "invalid JSON".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("payload"));
        assert!(msg.contains("invalid JSON"));
    }

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound("/tmp/missing.yaml".to_string());
        assert!(err.to_string().contains("/tmp/missing.yaml"));
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }

    #[test]
    fn test_error_from_jwt_error() {
        let jwt_err = JwtError::Format(1);
        let err: Error = jwt_err.into();

        match err {
            Error::Jwt(JwtError::Format(1)) => (),
            _ => panic!("Expected Error::Jwt(JwtError::Format(1))"),
        }
    }

    #[test]
    fn test_error_other() {
        let err = Error::Other("Custom error".to_string());
        assert!(err.to_string().contains("Custom error"));
    }
}
