//! Session module - Conversation state and per-conversation agents
//!
//! This module provides:
//! - The conversation store types ([`Message`], [`Conversation`], [`ChatRecord`])
//! - [`ConversationManager`], which hands out one [`Agent`] per conversation id
//!
//! Each agent sits behind its own `tokio::sync::Mutex`: turns on the same
//! conversation are serialized, turns on different conversations run
//! concurrently. State lives in memory only.
//!
//! # Example
//!
//! ```rust,ignore
//! use reagent::session::ConversationManager;
//!
//! async fn chat(manager: &ConversationManager) -> reagent::Result<()> {
//!     let id = manager.create().await;
//!     let messages = manager.execute(&id, "What is the weather in Paris?").await?;
//!     for record in manager.chat_history(&id).await? {
//!         println!("{}: {}", record.role, record.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;

pub use types::{ChatRecord, Conversation, Message, Role};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::error::{ReagentError, Result};

type SharedAgent = Arc<Mutex<Agent>>;

/// Owns one agent per conversation id.
///
/// New agents are forked from a prototype so they share the provider, tool
/// registry, templates and settings but never history.
pub struct ConversationManager {
    prototype: Agent,
    agents: Arc<RwLock<HashMap<String, SharedAgent>>>,
}

impl ConversationManager {
    /// Create a manager that forks new agents from `prototype`.
    ///
    /// The prototype's own conversation is never used.
    pub fn new(prototype: Agent) -> Self {
        Self {
            prototype,
            agents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the agent for `id`, creating it on first use.
    pub async fn get_or_create(&self, id: &str) -> SharedAgent {
        {
            let agents = self.agents.read().await;
            if let Some(agent) = agents.get(id) {
                return Arc::clone(agent);
            }
        }

        let mut agents = self.agents.write().await;
        Arc::clone(agents.entry(id.to_string()).or_insert_with(|| {
            debug!(conversation = id, "Creating conversation");
            Arc::new(Mutex::new(self.prototype.fork(id)))
        }))
    }

    /// Start a conversation under a fresh random id and return the id.
    pub async fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.get_or_create(&id).await;
        info!(conversation = %id, "Conversation started");
        id
    }

    /// Run one turn on conversation `id`, creating it if needed.
    pub async fn execute(&self, id: &str, query: &str) -> Result<Vec<Message>> {
        let agent = self.get_or_create(id).await;
        let mut agent = agent.lock().await;
        agent.execute(query).await
    }

    /// The window of conversation `id` as serializable records.
    pub async fn chat_history(&self, id: &str) -> Result<Vec<ChatRecord>> {
        let agent = self
            .agents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ReagentError::NotFound(format!("conversation {}", id)))?;
        let agent = agent.lock().await;
        Ok(agent.chat_history())
    }

    /// Drop conversation `id`. Returns `true` if it existed.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.agents.write().await.remove(id).is_some();
        if removed {
            info!(conversation = id, "Conversation removed");
        }
        removed
    }

    /// Ids of all live conversations, sorted.
    pub async fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.agents.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of live conversations.
    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    /// True when no conversation exists.
    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}
