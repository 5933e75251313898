//! Conversation types for Reagent
//!
//! This module defines the message model and the `Conversation` store: an
//! ordered message window plus a rolling summary of everything that has been
//! evicted from it.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReagentError, Result};

/// A single message in a conversation.
///
/// Messages are never edited once recorded. The store only appends them or
/// drops a contiguous range during eviction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    pub content: String,
    /// Correlation id, present on tool observations only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new user message.
    ///
    /// # Example
    /// ```
    /// use reagent::session::{Message, Role};
    ///
    /// let msg = Message::user("What's the weather in Paris?");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: &str) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: &str) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    ///
    /// Inside a conversation these record terminal conditions such as an
    /// unknown tool; the system prompt itself is never stored.
    pub fn system(content: &str) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a new tool observation message.
    ///
    /// # Example
    /// ```
    /// use reagent::session::{Message, Role};
    ///
    /// let msg = Message::tool_result("call_1", "Observation from echo: hi");
    /// assert_eq!(msg.role, Role::Tool);
    /// assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    /// ```
    pub fn tool_result(tool_call_id: &str, content: &str) -> Self {
        Self {
            role: Role::Tool,
            content: content.to_string(),
            tool_call_id: Some(tool_call_id.to_string()),
        }
    }

    fn with_role(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            tool_call_id: None,
        }
    }

    /// Check if this message is a tool observation.
    pub fn is_tool_result(&self) -> bool {
        self.role == Role::Tool
    }

    /// Check if this message was written by the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user
    User,
    /// Message from the model
    Assistant,
    /// Terminal notices recorded by the loop
    System,
    /// Tool observation
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A serializable view of one message, as handed to service and UI layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl From<&Message> for ChatRecord {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
            tool_call_id: if msg.is_tool_result() {
                msg.tool_call_id.clone()
            } else {
                None
            },
        }
    }
}

/// The message window of one conversation plus its rolling summary.
///
/// Messages are append-only. The single exception is [`Conversation::evict`],
/// which removes a contiguous range that the memory manager has already
/// folded into the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Identifier of this conversation
    pub id: String,
    messages: Vec<Message>,
    summary: String,
    /// When this conversation was created
    pub created_at: DateTime<Utc>,
    /// When this conversation was last modified
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    ///
    /// # Example
    /// ```
    /// use reagent::session::Conversation;
    ///
    /// let conv = Conversation::new("demo");
    /// assert!(conv.is_empty());
    /// assert_eq!(conv.summary(), "");
    /// ```
    pub fn new(id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            messages: Vec::new(),
            summary: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the end of the window.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// All messages currently in the window, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the window.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the window holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The rolling summary of evicted history. Empty until the first eviction.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Append text to the rolling summary.
    ///
    /// The new text is joined with a single space and the result trimmed.
    /// The summary is never shortened.
    ///
    /// # Example
    /// ```
    /// use reagent::session::Conversation;
    ///
    /// let mut conv = Conversation::new("demo");
    /// conv.append_summary("User asked about Paris.");
    /// conv.append_summary("  Then about Rome. ");
    /// assert_eq!(conv.summary(), "User asked about Paris. Then about Rome.");
    /// ```
    pub fn append_summary(&mut self, text: &str) {
        let joined = format!("{} {}", self.summary, text);
        self.summary = joined.trim().to_string();
        self.updated_at = Utc::now();
    }

    /// Indices of all `user` messages in the window, ascending.
    pub fn user_indices(&self) -> Vec<usize> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_user())
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of `user` messages in the window.
    pub fn user_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user()).count()
    }

    /// Remove a contiguous range of messages and return them.
    ///
    /// The range must lie within the window and must not reach the last
    /// message, which always belongs to the turn in progress. An invalid
    /// range leaves the window untouched.
    pub fn evict(&mut self, range: Range<usize>) -> Result<Vec<Message>> {
        if range.start >= range.end || range.end >= self.messages.len() {
            return Err(ReagentError::NotFound(format!(
                "eviction range {}..{} outside window of {} messages",
                range.start,
                range.end,
                self.messages.len()
            )));
        }
        let removed: Vec<Message> = self.messages.drain(range).collect();
        self.updated_at = Utc::now();
        Ok(removed)
    }

    /// Messages produced after the most recent `user` message, oldest first.
    ///
    /// If the window holds no user message the whole window is returned.
    pub fn turn_messages(&self) -> Vec<Message> {
        let start = self
            .messages
            .iter()
            .rposition(|m| m.is_user())
            .map(|i| i + 1)
            .unwrap_or(0);
        self.messages[start..].to_vec()
    }

    /// The window as serializable records, oldest first.
    ///
    /// Tool records keep their correlation id; other roles carry none.
    pub fn chat_history(&self) -> Vec<ChatRecord> {
        self.messages.iter().map(ChatRecord::from).collect()
    }
}
