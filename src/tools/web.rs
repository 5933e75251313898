//! Web search through the Tavily search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ReagentError, Result};

use super::{http_client, Tool, ToolOutput};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";
const WEB_USER_AGENT: &str = concat!("reagent/", env!("CARGO_PKG_VERSION"));
const DEFAULT_MAX_RESULTS: usize = 2;
const MAX_WEB_SEARCH_COUNT: usize = 10;

/// Web search tool backed by Tavily.
pub struct WebSearchTool {
    api_key: String,
    api_url: String,
    client: Client,
    max_results: usize,
}

impl WebSearchTool {
    /// Create a new web search tool returning the default number of results.
    pub fn new(api_key: &str) -> Self {
        Self::with_max_results(api_key, DEFAULT_MAX_RESULTS)
    }

    /// Create a web search tool with a custom result count (clamped to 1..=10).
    pub fn with_max_results(api_key: &str, max_results: usize) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_url: TAVILY_API_URL.to_string(),
            client: http_client(WEB_USER_AGENT),
            max_results: max_results.clamp(1, MAX_WEB_SEARCH_COUNT),
        }
    }

    /// Point the tool at a different endpoint.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
    content: Option<String>,
    url: Option<String>,
    score: Option<f64>,
}

fn format_results(payload: SearchResponse) -> ToolOutput {
    let hits = match payload.results {
        Some(hits) => hits,
        None => return ToolOutput::text("No search results available."),
    };
    if hits.is_empty() {
        return ToolOutput::text("No results found.");
    }
    let items = hits
        .into_iter()
        .map(|hit| {
            json!({
                "title": hit.title,
                "content": hit.content,
                "url": hit.url,
                "score": hit.score,
            })
        })
        .collect::<Vec<_>>();
    ToolOutput::structured(json!(items))
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "websearch"
    }

    fn description(&self) -> &str {
        "Search the web for information. Input is a query. e.g. 'Champion of the 2024 Champions League'."
    }

    async fn invoke(&self, query: &str) -> Result<ToolOutput> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ReagentError::Tool("Query cannot be empty.".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(ReagentError::Tool(
                "Tavily API key is not configured".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SearchRequest {
                query,
                max_results: self.max_results,
            })
            .send()
            .await
            .map_err(|e| ReagentError::Tool(format!("Web search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            let detail = detail.trim();
            return Err(ReagentError::Tool(if detail.is_empty() {
                format!("Tavily API error: {}", status)
            } else {
                format!("Tavily API error: {} ({})", status, detail)
            }));
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| ReagentError::Tool(format!("Failed to parse search response: {}", e)))?;

        Ok(format_results(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_search_identity() {
        let tool = WebSearchTool::new("key");
        assert_eq!(tool.name(), "websearch");
        assert_eq!(tool.max_results, 2);
    }

    #[test]
    fn test_max_results_clamped() {
        assert_eq!(WebSearchTool::with_max_results("k", 0).max_results, 1);
        assert_eq!(WebSearchTool::with_max_results("k", 50).max_results, 10);
    }

    #[test]
    fn test_format_results_structured() {
        let payload: SearchResponse = serde_json::from_str(
            r#"{"results": [
                {"title": "Final", "content": "Real Madrid won", "url": "https://example.com", "score": 0.91}
            ]}"#,
        )
        .unwrap();
        match format_results(payload) {
            ToolOutput::Structured(value) => {
                assert_eq!(value[0]["title"], "Final");
                assert_eq!(value[0]["url"], "https://example.com");
                assert_eq!(value[0]["score"], 0.91);
            }
            other => panic!("expected structured output, got {:?}", other),
        }
    }

    #[test]
    fn test_format_results_empty() {
        let payload: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(format_results(payload), ToolOutput::text("No results found."));
    }

    #[test]
    fn test_format_results_missing_key() {
        let payload: SearchResponse = serde_json::from_str(r#"{"answer": null}"#).unwrap();
        assert_eq!(
            format_results(payload),
            ToolOutput::text("No search results available.")
        );
    }

    #[test]
    fn test_search_request_body() {
        let body = serde_json::to_value(SearchRequest {
            query: "F1 winner 2024",
            max_results: 2,
        })
        .unwrap();
        assert_eq!(body["query"], "F1 winner 2024");
        assert_eq!(body["max_results"], 2);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let tool = WebSearchTool::new("key");
        let err = tool.invoke("").await.unwrap_err();
        assert!(err.to_string().contains("Query cannot be empty."));
    }

    #[tokio::test]
    async fn test_missing_api_key_rejected() {
        let tool = WebSearchTool::new("  ");
        let err = tool.invoke("rust").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
