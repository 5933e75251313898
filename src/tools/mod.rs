//! Tools module - capabilities the model can call from an `Action:` line
//!
//! # Overview
//!
//! - `Tool` trait: name, one-sentence description and `invoke(query)`
//! - `ToolOutput`: text or structured JSON result
//! - `ToolRegistry`: lowercase-keyed registry that renders the tool listing and
//!   dispatches queries
//!
//! # Built-in Tools
//!
//! - `EchoTool`: returns its input, for tests and offline runs
//! - `WeatherTool`: current weather from OpenWeather
//! - `WebSearchTool`: web search through Tavily
//! - `WikipediaTool`: page summaries from the Wikipedia REST API
//!
//! # Example
//!
//! ```rust
//! use reagent::tools::{Dispatch, EchoTool, ToolRegistry};
//!
//! # tokio_test::block_on(async {
//! let mut registry = ToolRegistry::new();
//! registry.register(Box::new(EchoTool));
//!
//! let listing = registry.describe_all();
//! assert!(listing.starts_with("echo: "));
//!
//! assert!(matches!(registry.dispatch("missing", "x").await, Dispatch::NotFound));
//! # });
//! ```

mod registry;
mod types;
pub mod weather;
pub mod web;
pub mod wikipedia;

pub use registry::{Dispatch, ToolRegistry};
pub use types::{Tool, ToolOutput};
pub use weather::WeatherTool;
pub use web::WebSearchTool;
pub use wikipedia::WikipediaTool;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ToolsConfig;
use crate::error::Result;

/// Timeout applied to every outbound tool request.
const TOOL_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by the network-backed tools.
pub(crate) fn http_client(user_agent: &str) -> Client {
    Client::builder()
        .user_agent(user_agent)
        .timeout(TOOL_HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Build a registry holding the default tool set.
///
/// Wikipedia needs no key and is always registered. Web search and weather
/// are registered only when their API key is configured.
pub fn default_registry(config: &ToolsConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WikipediaTool::new(
        &config.wikipedia_language,
        &config.user_agent,
    )));
    if let Some(key) = config.web_search_api_key.as_deref() {
        registry.register(Box::new(WebSearchTool::with_max_results(
            key,
            config.web_search_max_results as usize,
        )));
    }
    if let Some(key) = config.weather_api_key.as_deref() {
        registry.register(Box::new(WeatherTool::new(key)));
    }
    registry
}

/// A simple echo tool.
///
/// # Example
///
/// ```rust
/// use reagent::tools::{EchoTool, Tool};
///
/// # tokio_test::block_on(async {
/// let result = EchoTool.invoke("Hello").await.unwrap();
/// assert_eq!(result.render(), "Hello");
/// # });
/// ```
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes the input back. e.g. 'hello'."
    }

    async fn invoke(&self, query: &str) -> Result<ToolOutput> {
        Ok(ToolOutput::text(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_tool_name() {
        assert_eq!(EchoTool.name(), "echo");
    }

    #[tokio::test]
    async fn test_echo_tool_invoke() {
        let result = EchoTool.invoke("Hello, World!").await.unwrap();
        assert_eq!(result, ToolOutput::text("Hello, World!"));
    }

    #[tokio::test]
    async fn test_echo_tool_empty_query() {
        let result = EchoTool.invoke("").await.unwrap();
        assert_eq!(result.render(), "");
    }

    #[test]
    fn test_default_registry_without_keys() {
        let registry = default_registry(&ToolsConfig::default());
        assert_eq!(registry.names(), vec!["wikipedia"]);
    }

    #[test]
    fn test_default_registry_with_keys() {
        let config = ToolsConfig {
            web_search_api_key: Some("tvly-test".into()),
            weather_api_key: Some("ow-test".into()),
            ..Default::default()
        };
        let registry = default_registry(&config);
        assert_eq!(registry.names(), vec!["wikipedia", "websearch", "weather"]);
    }
}
