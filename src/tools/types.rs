//! Tool types for Reagent
//!
//! This module defines the `Tool` trait that every capability the model can
//! call must implement, and `ToolOutput`, the value a tool hands back.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// What a tool returns on success: plain text or a structured JSON value.
///
/// The reasoning loop renders either form into the text of an observation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Free-form text
    Text(String),
    /// Structured result, rendered as pretty-printed JSON
    Structured(Value),
}

impl ToolOutput {
    /// Text output.
    pub fn text(content: impl Into<String>) -> Self {
        ToolOutput::Text(content.into())
    }

    /// Structured output.
    pub fn structured(value: Value) -> Self {
        ToolOutput::Structured(value)
    }

    /// Render the output as the text the model will read.
    ///
    /// # Example
    /// ```
    /// use reagent::tools::ToolOutput;
    /// use serde_json::json;
    ///
    /// assert_eq!(ToolOutput::text("sunny").render(), "sunny");
    /// assert!(ToolOutput::structured(json!({"title": "Paris"})).render().contains("\"title\""));
    /// ```
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl std::fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Trait that all tools must implement.
///
/// A tool takes the free-text query from an `Action: <name>: <query>` line and
/// returns a result. An empty query or an unavailable backing service is
/// reported as an `Err`; the reasoning loop turns that into an observation.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use reagent::tools::{Tool, ToolOutput};
/// use reagent::error::Result;
///
/// struct Shout;
///
/// #[async_trait]
/// impl Tool for Shout {
///     fn name(&self) -> &str { "shout" }
///     fn description(&self) -> &str { "Repeats the input in capitals." }
///     async fn invoke(&self, query: &str) -> Result<ToolOutput> {
///         Ok(ToolOutput::text(query.to_uppercase()))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Lowercase identity used in `Action:` lines.
    fn name(&self) -> &str;

    /// One sentence shown to the model verbatim.
    fn description(&self) -> &str;

    /// Run the tool against `query`.
    async fn invoke(&self, query: &str) -> Result<ToolOutput>;
}
