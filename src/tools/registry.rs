//! Tool registry for Reagent
//!
//! This module provides the `ToolRegistry` struct for holding tools, describing
//! them to the model and dispatching `Action:` lines to them.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{error, info};

use crate::error::ReagentError;

use super::{Tool, ToolOutput};

/// Result of dispatching a query to a named tool.
///
/// A missing tool is a value, not an error, so the reasoning loop can record
/// it as an observation instead of aborting.
#[derive(Debug)]
pub enum Dispatch {
    /// The tool ran and produced output
    Output(ToolOutput),
    /// The tool ran and reported a domain or upstream error
    Failed(ReagentError),
    /// No tool is registered under that name
    NotFound,
}

/// A registry that holds tools in registration order.
///
/// Names are normalised to lowercase on registration and on lookup.
///
/// # Example
///
/// ```rust
/// use reagent::tools::{Dispatch, EchoTool, ToolRegistry};
///
/// # tokio_test::block_on(async {
/// let mut registry = ToolRegistry::new();
/// registry.register(Box::new(EchoTool));
///
/// assert!(registry.has("ECHO"));
/// assert_eq!(registry.describe_all(), "echo: Echoes the input back. e.g. 'hello'.");
///
/// match registry.dispatch("echo", "hello").await {
///     Dispatch::Output(out) => assert_eq!(out.render(), "hello"),
///     other => panic!("unexpected {:?}", other),
/// }
/// # });
/// ```
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool under its lowercase name.
    ///
    /// A tool with the same name replaces the earlier one silently and takes
    /// over its position in the listing.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_lowercase();
        match self.index.get(&name) {
            Some(&slot) => {
                info!(tool = %name, "Replacing tool");
                self.tools[slot] = tool;
            }
            None => {
                info!(tool = %name, "Registering tool");
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| self.tools[slot].as_ref())
    }

    /// One `"<name>: <description>"` line per tool, in registration order.
    ///
    /// This text is pasted into the system prompt as-is.
    pub fn describe_all(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name().to_lowercase(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Run `query` through the tool registered as `name`.
    pub async fn dispatch(&self, name: &str, query: &str) -> Dispatch {
        let tool = match self.get(name) {
            Some(t) => t,
            None => return Dispatch::NotFound,
        };

        let start = Instant::now();

        match tool.invoke(query).await {
            Ok(output) => {
                info!(
                    tool = name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool executed successfully"
                );
                Dispatch::Output(output)
            }
            Err(e) => {
                error!(
                    tool = name,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool execution failed"
                );
                Dispatch::Failed(e)
            }
        }
    }

    /// Names of all registered tools, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_lowercase()).collect()
    }

    /// Check if a tool exists in the registry (case-insensitive).
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
