// src/error.rs

//! Unified error handling for the rotation pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Only the fetch stage produces `Fetch` and `Timeout`. Extraction never
/// fails; missing page content degrades to empty text instead.
#[derive(Error, Debug)]
pub enum AppError {
    /// Navigation or transport failure (DNS, connection, HTTP status >= 400)
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Rendered page never reached the ready condition
    #[error("Timed out after {waited_ms}ms waiting for {url} to finish loading")]
    Timeout { url: String, waited_ms: u64 },

    /// Headless browser could not be started
    #[error("Browser error: {0}")]
    Browser(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a timeout error for the given URL.
    pub fn timeout(url: impl Into<String>, waited_ms: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            waited_ms,
        }
    }

    /// Create a browser launch error.
    pub fn browser(message: impl fmt::Display) -> Self {
        Self::Browser(message.to_string())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error came from the ready-condition bound.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = AppError::fetch("https://example.com", "connection refused");
        assert_eq!(
            err.to_string(),
            "Fetch error for https://example.com: connection refused"
        );
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_error() {
        let err = AppError::timeout("https://example.com", 20000);
        assert!(err.is_timeout());
        assert!(err.to_string().contains("20000ms"));
    }

    #[test]
    fn test_config_errors_use_ambient_variants() {
        let err: AppError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, AppError::Toml(_)));
        assert!(matches!(AppError::validation("empty"), AppError::Validation(_)));
    }
}
