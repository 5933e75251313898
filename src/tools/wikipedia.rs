//! Wikipedia page summaries through the REST API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ReagentError, Result};

use super::{http_client, Tool, ToolOutput};

/// Wikipedia lookup tool.
///
/// Resolves the query as a page title in the configured language and returns
/// `{query, title, summary}`.
pub struct WikipediaTool {
    api_base: String,
    client: Client,
}

impl WikipediaTool {
    /// Create a tool for the given language edition (e.g. `"en"`).
    pub fn new(language: &str, user_agent: &str) -> Self {
        let language = match language.trim() {
            "" => "en",
            lang => lang,
        };
        Self {
            api_base: format!("https://{}.wikipedia.org/api/rest_v1", language),
            client: http_client(user_agent),
        }
    }

    /// Point the tool at a different REST root.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base = url.trim_end_matches('/').to_string();
        self
    }

    fn summary_url(&self, title: &str) -> Result<Url> {
        let segment = title.replace(' ', "_");
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ReagentError::Tool(format!("Invalid Wikipedia endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ReagentError::Tool("Invalid Wikipedia endpoint".to_string()))?
            .extend(["page", "summary", segment.as_str()]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: String,
    #[serde(default)]
    extract: String,
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Gets information from a Wikipedia entry. Specific Wikipedia input. e.g. 'Cristiano Ronaldo'."
    }

    async fn invoke(&self, query: &str) -> Result<ToolOutput> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ReagentError::Tool("Query cannot be empty.".to_string()));
        }

        let url = self.summary_url(query)?;
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ReagentError::Tool(format!("Wikipedia request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ToolOutput::text(format!(
                "No Wikipedia page found for '{}'.",
                query
            )));
        }
        if !response.status().is_success() {
            return Err(ReagentError::Tool(format!(
                "Wikipedia API error: {}",
                response.status()
            )));
        }

        let page: PageSummary = response
            .json()
            .await
            .map_err(|e| ReagentError::Tool(format!("Failed to parse Wikipedia response: {}", e)))?;

        Ok(ToolOutput::structured(json!({
            "query": query,
            "title": page.title,
            "summary": page.extract,
        })))
    }
}
