//! Error types for satgraffin-api

use thiserror::Error;

/// Result type alias using satgraffin-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying the backend
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure (unreachable host, connection reset, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with a non-success HTTP status
    #[error("Request failed with status {0}")]
    Status(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_carries_code() {
        let e = Error::Status(500);
        assert_eq!(e.to_string(), "Request failed with status 500");
    }

    #[test]
    fn test_json_display_names_fault() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e = Error::Json(parse_err);
        assert!(e.to_string().starts_with("JSON error:"));
    }
}
