//! Reagent - a single-agent ReAct loop with tool dispatch and summarising memory
//!
//! The [`agent`] module runs the Thought / Action / Observation loop against
//! an [`providers::LLMProvider`], dispatching actions through a
//! [`tools::ToolRegistry`] and keeping each [`session::Conversation`] within
//! budget by summarising and evicting its oldest turns.

pub mod agent;
pub mod config;
pub mod error;
pub mod providers;
pub mod session;
pub mod tools;
pub mod utils;

pub use agent::{Agent, AgentSettings, MemoryManager, MemorySettings, Turn, TurnOutcome};
pub use config::Config;
pub use error::{ProviderError, ReagentError, Result};
pub use providers::{ChatOptions, LLMProvider, LLMResponse, OpenAIProvider, Usage};
pub use session::{ChatRecord, Conversation, ConversationManager, Message, Role};
pub use tools::{Tool, ToolOutput, ToolRegistry};
