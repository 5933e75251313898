//! OpenAI-compatible Provider Implementation
//!
//! This module implements the `LLMProvider` trait for the Chat Completions API.
//! Any endpoint speaking that protocol (OpenAI, DeepSeek and the many hosts
//! serving open models) can be used by overriding the base URL.
//!
//! # Example
//!
//! ```rust,ignore
//! use reagent::providers::{ChatOptions, LLMProvider, OpenAIProvider};
//! use reagent::session::Message;
//!
//! async fn example() {
//!     let provider = OpenAIProvider::with_base_url("your-api-key", "https://api.deepseek.com/v1");
//!
//!     let messages = vec![
//!         Message::system("You are a helpful assistant."),
//!         Message::user("Hello!"),
//!     ];
//!
//!     let response = provider
//!         .chat(messages, ChatOptions::new().with_model("deepseek-chat"))
//!         .await
//!         .unwrap();
//!
//!     println!("Model: {}", response.content);
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ReagentError, Result};
use crate::session::{Message, Role};

use super::{parse_provider_error, ChatOptions, LLMProvider, LLMResponse, Usage};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Wall-clock limit for one completion request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// API Request Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
    #[serde(default)]
    r#type: Option<String>,
}

// ============================================================================
// OpenAI Provider
// ============================================================================

/// Provider for OpenAI-compatible Chat Completions endpoints.
pub struct OpenAIProvider {
    api_key: String,
    api_base: String,
    client: Client,
    observation_role: Option<Role>,
}

impl OpenAIProvider {
    /// Create a provider against the OpenAI endpoint.
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, OPENAI_API_URL)
    }

    /// Create a provider against a custom endpoint.
    pub fn with_base_url(api_key: &str, api_base: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(api_key, api_base, client)
    }

    /// Create a provider with a caller-supplied HTTP client.
    pub fn with_client(api_key: &str, api_base: &str, client: Client) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
            observation_role: None,
        }
    }

    /// Send tool observations under another role.
    ///
    /// Endpoints that insist every `tool` message answers a native tool call
    /// reject the textual observations this crate records; mapping them to
    /// `user` or `system` keeps those endpoints usable.
    pub fn with_observation_role(mut self, role: Role) -> Self {
        self.observation_role = Some(role);
        self
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

fn convert_messages(messages: Vec<Message>, observation_role: Option<Role>) -> Vec<OpenAIMessage> {
    messages
        .into_iter()
        .map(|msg| {
            let (role, tool_call_id) = match (msg.role, observation_role) {
                (Role::Tool, Some(mapped)) => (mapped, None),
                (role, _) => (role, msg.tool_call_id),
            };
            OpenAIMessage {
                role: role.to_string(),
                content: msg.content,
                tool_call_id,
            }
        })
        .collect()
}

fn convert_response(response: OpenAIResponse) -> LLMResponse {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string());

    let mut llm_response = match content {
        Some(text) => LLMResponse::text(&text),
        None => LLMResponse::empty(),
    };

    if let Some(usage) = response.usage {
        llm_response =
            llm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
    }

    llm_response
}

fn classify_error_body(status: u16, body: &str) -> ProviderError {
    let detail = match serde_json::from_str::<OpenAIErrorResponse>(body) {
        Ok(parsed) => match parsed.error.r#type {
            Some(kind) => format!("{} - {}", kind, parsed.error.message),
            None => parsed.error.message,
        },
        Err(_) => body.to_string(),
    };
    parse_provider_error(status, &detail)
}

// ============================================================================
// LLMProvider Implementation
// ============================================================================

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(&self, messages: Vec<Message>, options: ChatOptions) -> Result<LLMResponse> {
        let model = options.model.as_deref().unwrap_or(DEFAULT_MODEL);

        let request = OpenAIRequest {
            model: model.to_string(),
            messages: convert_messages(messages, self.observation_role),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!(model = model, messages = request.messages.len(), "Chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReagentError::from(ProviderError::Timeout(e.to_string()))
                } else {
                    ReagentError::Provider(format!("Chat request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_error_body(status, &error_text).into());
        }

        let body: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ReagentError::Provider(format!("Failed to parse chat response: {}", e)))?;

        let converted = convert_response(body);
        info!(
            model = model,
            prompt_tokens = converted.usage.map(|u| u.prompt_tokens).unwrap_or(0),
            "Chat completion received"
        );
        Ok(converted)
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// Tests
// ============================================================================
