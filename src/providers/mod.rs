//! Providers module - LLM completion backends
//!
//! This module defines the `LLMProvider` trait and common types for talking to
//! a language model. The reasoning loop only sees the trait; `OpenAIProvider`
//! is the bundled implementation for Chat Completions endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use reagent::providers::{ChatOptions, LLMProvider, OpenAIProvider};
//! use reagent::session::Message;
//!
//! async fn example() {
//!     let provider = OpenAIProvider::new("your-api-key");
//!     let messages = vec![Message::user("Hello!")];
//!     let options = ChatOptions::new().with_max_tokens(500);
//!
//!     let response = provider.chat(messages, options).await.unwrap();
//!     println!("Response: {}", response.content);
//! }
//! ```

pub mod openai;
mod types;

use crate::error::ProviderError;

pub use openai::OpenAIProvider;
pub use types::{ChatOptions, LLMProvider, LLMResponse, Usage};

/// Parse an HTTP status code and response body into a structured [`ProviderError`].
pub fn parse_provider_error(status: u16, body: &str) -> ProviderError {
    match status {
        401 => ProviderError::Auth(body.to_string()),
        402 => ProviderError::Billing(body.to_string()),
        404 => ProviderError::ModelNotFound(body.to_string()),
        429 => ProviderError::RateLimit(body.to_string()),
        400 => ProviderError::InvalidRequest(body.to_string()),
        408 => ProviderError::Timeout(body.to_string()),
        500..=599 => ProviderError::ServerError(body.to_string()),
        _ => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_error_401() {
        let err = parse_provider_error(401, "invalid api key");
        assert!(matches!(err, ProviderError::Auth(_)));
    }

    #[test]
    fn test_parse_provider_error_402() {
        let err = parse_provider_error(402, "payment required");
        assert!(matches!(err, ProviderError::Billing(_)));
    }

    #[test]
    fn test_parse_provider_error_404() {
        let err = parse_provider_error(404, "model not found");
        assert!(matches!(err, ProviderError::ModelNotFound(_)));
    }

    #[test]
    fn test_parse_provider_error_408() {
        let err = parse_provider_error(408, "request timeout");
        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[test]
    fn test_parse_provider_error_429() {
        let err = parse_provider_error(429, "rate limited");
        assert!(matches!(err, ProviderError::RateLimit(_)));
    }

    #[test]
    fn test_parse_provider_error_400() {
        let err = parse_provider_error(400, "bad json");
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn test_parse_provider_error_5xx() {
        for status in [500, 502, 503, 504] {
            let err = parse_provider_error(status, "server trouble");
            assert!(matches!(err, ProviderError::ServerError(_)));
        }
    }

    #[test]
    fn test_parse_provider_error_unknown() {
        let err = parse_provider_error(418, "i'm a teapot");
        assert!(matches!(err, ProviderError::Unknown(_)));
        assert!(err.to_string().contains("HTTP 418"));
    }
}
