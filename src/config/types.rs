//! Configuration type definitions for Reagent
//!
//! Every struct implements serde traits for JSON serialization and carries
//! `#[serde(default)]`, so a partial config file only overrides what it names.

use serde::{Deserialize, Serialize};

/// Main configuration struct for Reagent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reasoning loop settings (model, tokens, iterations)
    pub agent: AgentConfig,
    /// Memory manager thresholds
    pub memory: MemoryConfig,
    /// OpenAI-compatible endpoint settings
    pub provider: ProviderConfig,
    /// Built-in tool settings
    pub tools: ToolsConfig,
    /// Prompt template overrides
    pub prompts: PromptsConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

// ============================================================================
// Agent Configuration
// ============================================================================

/// Default model compile-time configuration.
/// Set `REAGENT_DEFAULT_MODEL` at compile time to override.
const COMPILE_TIME_DEFAULT_MODEL: &str = match option_env!("REAGENT_DEFAULT_MODEL") {
    Some(v) => v,
    None => "deepseek-ai/DeepSeek-V3",
};

/// Reasoning loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model used for both reasoning and summarisation
    pub model: String,
    /// Completion ceiling for each Think step
    pub max_tokens: u32,
    /// Sampling temperature for each Think step
    pub temperature: f32,
    /// Think steps allowed per turn
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: COMPILE_TIME_DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.5,
            max_iterations: 5,
        }
    }
}

// ============================================================================
// Memory Configuration
// ============================================================================

/// Thresholds that trigger summarise-and-evict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// User messages kept before the oldest block is summarised
    pub turns_before_summary: usize,
    /// Estimated window size above which eviction is allowed
    pub max_window_tokens: usize,
    /// Completion ceiling for the summary call
    pub summary_max_tokens: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            turns_before_summary: 5,
            max_window_tokens: 10_000,
            summary_max_tokens: 120,
        }
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// OpenAI-compatible endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Bearer token for the endpoint
    pub api_key: Option<String>,
    /// Base URL, e.g. `https://api.deepseek.com/v1`; OpenAI when unset
    pub api_base: Option<String>,
    /// Role used to send tool observations (`tool`, `user`, `system` or
    /// `assistant`). Endpoints that reject `tool` messages without a matching
    /// tool call need `user` or `system`.
    pub observation_role: Option<String>,
}

// ============================================================================
// Tools Configuration
// ============================================================================

fn default_user_agent() -> String {
    format!("reagent/{}", env!("CARGO_PKG_VERSION"))
}

/// Built-in tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tavily API key; `websearch` is registered only when set
    pub web_search_api_key: Option<String>,
    /// OpenWeather API key; `weather` is registered only when set
    pub weather_api_key: Option<String>,
    /// Wikipedia language edition
    pub wikipedia_language: String,
    /// User-Agent sent by HTTP tools
    pub user_agent: String,
    /// Results requested from web search
    pub web_search_max_results: u32,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            web_search_api_key: None,
            weather_api_key: None,
            wikipedia_language: "en".to_string(),
            user_agent: default_user_agent(),
            web_search_max_results: 2,
        }
    }
}

// ============================================================================
// Prompt Configuration
// ============================================================================

/// Paths to template files replacing the built-in prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// System template with `{tools}` and `{date}` placeholders
    pub system_prompt_path: Option<String>,
    /// Summary template with a `{lines}` placeholder
    pub summary_prompt_path: Option<String>,
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    Pretty,
    /// Compact text with targets and `component` fields
    #[default]
    Component,
    /// JSON lines
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Append JSON logs to this file instead of stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: "info".to_string(),
            file: None,
        }
    }
}
