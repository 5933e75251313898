//! Error types for Reagent
//!
//! This module defines the error types used throughout the crate.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.

use std::fmt;
use thiserror::Error;

// ============================================================================
// Provider Error Classification
// ============================================================================

/// Structured provider error classification.
///
/// Categorizes LLM provider HTTP failures so callers can tell an
/// authentication problem from a transient outage without string matching.
/// The reasoning loop itself never retries; the classification is surfaced
/// to whoever sits above it.
#[derive(Debug)]
pub enum ProviderError {
    /// 401: Invalid API key or authentication failure
    Auth(String),
    /// 429: Rate limit or quota exceeded
    RateLimit(String),
    /// 402: Payment required or billing issue
    Billing(String),
    /// 500/502/503/504: Server-side errors
    ServerError(String),
    /// 400: Bad request, invalid JSON, malformed parameters
    InvalidRequest(String),
    /// 404: Model not found or endpoint not available
    ModelNotFound(String),
    /// Connection or read timeout
    Timeout(String),
    /// Catch-all for unrecognized errors
    Unknown(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Auth(msg) => write!(f, "Authentication error: {}", msg),
            ProviderError::RateLimit(msg) => write!(f, "Rate limit error: {}", msg),
            ProviderError::Billing(msg) => write!(f, "Billing error: {}", msg),
            ProviderError::ServerError(msg) => write!(f, "Server error: {}", msg),
            ProviderError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ProviderError::ModelNotFound(msg) => write!(f, "Model not found: {}", msg),
            ProviderError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ProviderError::Unknown(msg) => write!(f, "Unknown provider error: {}", msg),
        }
    }
}

impl From<ProviderError> for ReagentError {
    fn from(err: ProviderError) -> Self {
        ReagentError::ProviderTyped(err)
    }
}

// ============================================================================
// Primary Error Type
// ============================================================================

/// The primary error type for Reagent operations.
#[derive(Error, Debug)]
pub enum ReagentError {
    /// Configuration-related errors (invalid config, missing API keys, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider errors that carry no HTTP classification (malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Structured provider error with HTTP classification.
    #[error("Provider error: {0}")]
    ProviderTyped(ProviderError),

    /// Tool domain errors (empty query, upstream service failure, etc.)
    #[error("Tool error: {0}")]
    Tool(String),

    /// Prompt template errors (unreadable file, missing placeholder)
    #[error("Template error: {0}")]
    Template(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found (conversations, config files, etc.)
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ReagentError {
    /// Returns `true` for failures of an outbound call (LLM or HTTP).
    ///
    /// Service wrappers map these to a generic failure response instead of
    /// echoing provider details back to the user.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ReagentError::Provider(_) | ReagentError::ProviderTyped(_) | ReagentError::Http(_)
        )
    }
}

/// A specialized `Result` type for Reagent operations.
pub type Result<T> = std::result::Result<T, ReagentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReagentError::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReagentError = io_err.into();
        assert!(matches!(err, ReagentError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ReagentError = json_err.into();
        assert!(matches!(err, ReagentError::Json(_)));
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_tool_error_display() {
        let err = ReagentError::Tool("City cannot be empty.".to_string());
        assert_eq!(err.to_string(), "Tool error: City cannot be empty.");
    }

    #[test]
    fn test_is_upstream() {
        assert!(ReagentError::Provider("boom".into()).is_upstream());
        assert!(ReagentError::ProviderTyped(ProviderError::Timeout("30s".into())).is_upstream());
        assert!(!ReagentError::Tool("empty".into()).is_upstream());
        assert!(!ReagentError::Config("bad".into()).is_upstream());
    }

    // ====================================================================
    // ProviderError tests
    // ====================================================================

    #[test]
    fn test_provider_error_display() {
        assert!(ProviderError::Auth("bad key".into())
            .to_string()
            .contains("Authentication error"));
        assert!(ProviderError::RateLimit("quota".into())
            .to_string()
            .contains("Rate limit error"));
        assert!(ProviderError::ServerError("500".into())
            .to_string()
            .contains("Server error"));
        assert!(ProviderError::Unknown("???".into())
            .to_string()
            .contains("Unknown provider error"));
    }

    #[test]
    fn test_provider_typed_display() {
        let err = ReagentError::ProviderTyped(ProviderError::Auth("invalid key".into()));
        assert_eq!(
            err.to_string(),
            "Provider error: Authentication error: invalid key"
        );
    }
}
