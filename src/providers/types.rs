//! Provider types for Reagent
//!
//! This module defines the `LLMProvider` trait, chat options, and response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::Message;

/// Trait for LLM completion backends.
///
/// A provider takes an ordered list of role/content messages and returns the
/// model's text. The reasoning loop and the memory manager both go through
/// this trait, with different payloads and token ceilings.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send a chat completion request to the LLM.
    ///
    /// # Arguments
    /// * `messages` - The prompt, oldest message first
    /// * `options` - Model override, token ceiling and temperature
    ///
    /// # Returns
    /// The model's response. A completion with no choices is returned as
    /// [`LLMResponse::empty`], not as an error.
    async fn chat(&self, messages: Vec<Message>, options: ChatOptions) -> Result<LLMResponse>;

    /// Get the default model for this provider.
    fn default_model(&self) -> &str;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Options for chat completion requests.
///
/// Use the builder pattern to construct options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// Model override; the provider's default is used when `None`
    pub model: Option<String>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    pub temperature: Option<f32>,
}

impl ChatOptions {
    /// Create new default chat options.
    ///
    /// # Example
    /// ```
    /// use reagent::providers::ChatOptions;
    ///
    /// let options = ChatOptions::new();
    /// assert!(options.max_tokens.is_none());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to use for this request.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Set the maximum number of tokens to generate.
    ///
    /// # Example
    /// ```
    /// use reagent::providers::ChatOptions;
    ///
    /// let options = ChatOptions::new().with_max_tokens(500).with_temperature(0.5);
    /// assert_eq!(options.max_tokens, Some(500));
    /// assert_eq!(options.temperature, Some(0.5));
    /// ```
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Text content of the response, trimmed
    pub content: String,
    /// Token usage, when the provider reports it
    pub usage: Option<Usage>,
}

impl LLMResponse {
    /// Create a text-only response.
    ///
    /// # Example
    /// ```
    /// use reagent::providers::LLMResponse;
    ///
    /// let response = LLMResponse::text("Final Answer: 42");
    /// assert!(!response.is_empty());
    /// ```
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            usage: None,
        }
    }

    /// A response that carried no usable output.
    pub fn empty() -> Self {
        Self::text("")
    }

    /// True when the response has no non-whitespace content.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Attach usage information.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Create usage with the total computed from its parts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
