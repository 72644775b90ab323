// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, XchembkuError>;

#[derive(Error, Debug)]
pub enum XchembkuError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file {path} could not be read: {source}")]
    ConfigFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote dataface returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Soakdb3 error: {0}")]
    Soakdb3(String),
}

impl XchembkuError {
    /// HTTP status the service answers with when an operation fails.
    pub fn status_code(&self) -> u16 {
        match self {
            XchembkuError::Validation(_) => 400,
            XchembkuError::NotFound(_) => 404,
            XchembkuError::Remote { status, .. } => *status,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(XchembkuError::Validation("x".into()).status_code(), 400);
        assert_eq!(XchembkuError::NotFound("x".into()).status_code(), 404);
        assert_eq!(XchembkuError::Database("x".into()).status_code(), 500);
        assert_eq!(
            XchembkuError::Remote {
                status: 503,
                message: "busy".into()
            }
            .status_code(),
            503
        );
    }

    #[test]
    fn test_display_includes_detail() {
        let err = XchembkuError::Database("table crystal_wells missing".to_string());
        assert_eq!(err.to_string(), "Database error: table crystal_wells missing");
    }
}
