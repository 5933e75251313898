//! Agent module - the ReAct reasoning loop and its supporting pieces
//!
//! The agent answers a query by alternating two steps:
//!
//! - **Think**: compress old turns if the window is too large, build the
//!   prompt (system template + tool listing + rolling summary + history) and
//!   call the LLM once
//! - **Act**: parse the reply, dispatch the named tool and record its output
//!   as an observation
//!
//! The turn ends on a final answer, an unknown tool, an unrecognised reply,
//! or when the iteration budget runs out.
//!
//! # Architecture
//!
//! ```text
//!  query ──> ┌─────────────┐  prompt   ┌─────────────┐
//!            │    Agent    │──────────>│ LLMProvider │
//!            │   (loop)    │<──────────│             │
//!            └─────────────┘  reply    └─────────────┘
//!               │   │   │
//!     parse     │   │   │ dispatch
//!   ┌───────────┘   │   └────────────┐
//!   ▼               ▼                ▼
//! ┌────────┐ ┌───────────────┐ ┌─────────────┐
//! │ parser │ │ MemoryManager │ │ToolRegistry │
//! └────────┘ │ (summarise +  │ └─────────────┘
//!            │    evict)     │
//!            └───────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reagent::agent::Agent;
//! use reagent::providers::OpenAIProvider;
//! use reagent::tools::{EchoTool, ToolRegistry};
//!
//! async fn run() -> reagent::Result<()> {
//!     let mut tools = ToolRegistry::new();
//!     tools.register(Box::new(EchoTool));
//!
//!     let provider = Arc::new(OpenAIProvider::new("your-api-key"));
//!     let mut agent = Agent::new(provider, Arc::new(tools), "demo");
//!     let messages = agent.execute("Echo 'hello'").await?;
//!     println!("{} messages", messages.len());
//!     Ok(())
//! }
//! ```

pub mod context;
mod r#loop;
pub mod memory;
pub mod parser;
pub mod tokens;
pub mod transcript;

pub use context::{PromptBuilder, PromptTemplates};
pub use memory::{EvictionOutcome, MemoryManager, MemorySettings};
pub use parser::{parse_action, Action, FINAL_ANSWER_MARKER};
pub use r#loop::{Agent, AgentSettings, Turn, TurnOutcome, EXHAUSTED_MESSAGE, NO_RESPONSE_TEXT};
pub use tokens::{HeuristicTokenCounter, TokenCounter};
pub use transcript::{classify_turn, TurnView};
