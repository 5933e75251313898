//! Conversation memory management.
//!
//! Once a conversation holds more user turns than `turns_before_summary`
//! *and* the window costs more than `max_window_tokens`, the oldest block of
//! complete turns is summarised with one LLM call, the summary is appended
//! to the rolling summary and the block is dropped from the window.
//!
//! The block always starts at the first user message and stops right before
//! the `(turns_before_summary + 1)`-th one, so a turn is never split.

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::providers::{ChatOptions, LLMProvider};
use crate::session::{Conversation, Message};

use super::context::PromptTemplates;
use super::tokens::{HeuristicTokenCounter, TokenCounter};

/// Thresholds that gate summarisation.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySettings {
    /// User turns kept before the oldest block becomes eligible
    pub turns_before_summary: usize,
    /// Token budget for the whole window
    pub max_window_tokens: usize,
    /// Completion ceiling for the summary request
    pub summary_max_tokens: u32,
    /// Model for the summary request; the provider default when `None`
    pub model: Option<String>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            turns_before_summary: 5,
            max_window_tokens: 10_000,
            summary_max_tokens: 120,
            model: None,
        }
    }
}

/// What one call to [`MemoryManager::manage`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictionOutcome {
    /// Thresholds not met; nothing attempted
    Skipped,
    /// Block summarised and removed
    Evicted {
        /// Number of messages dropped from the window
        removed: usize,
        /// Estimated tokens of the new summary text
        summary_tokens: usize,
    },
    /// Summarisation failed or returned nothing; window untouched
    Aborted,
}

/// Decides when to compress a conversation and performs the compression.
#[derive(Clone)]
pub struct MemoryManager {
    settings: MemorySettings,
    counter: Arc<dyn TokenCounter>,
}

impl MemoryManager {
    /// Create a manager using the word-based token estimate.
    pub fn new(settings: MemorySettings) -> Self {
        Self {
            settings,
            counter: Arc::new(HeuristicTokenCounter),
        }
    }

    /// Replace the token counter.
    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// The active thresholds.
    pub fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    /// Estimated token cost of the current window.
    pub fn window_tokens(&self, conversation: &Conversation) -> usize {
        self.counter.count_messages(conversation.messages())
    }

    /// The block that would be evicted, if both thresholds are exceeded.
    pub fn eviction_range(&self, conversation: &Conversation) -> Option<Range<usize>> {
        let threshold = self.settings.turns_before_summary;
        if threshold == 0 {
            return None;
        }

        let users = conversation.user_indices();
        if users.len() <= threshold {
            return None;
        }
        if self.window_tokens(conversation) <= self.settings.max_window_tokens {
            return None;
        }

        Some(users[0]..users[threshold])
    }

    /// Summarise and evict the oldest block when the thresholds are exceeded.
    ///
    /// Never fails: a provider error or an empty summary leaves the
    /// conversation exactly as it was.
    pub async fn manage(
        &self,
        conversation: &mut Conversation,
        provider: &dyn LLMProvider,
        templates: &PromptTemplates,
    ) -> EvictionOutcome {
        let range = match self.eviction_range(conversation) {
            Some(range) => range,
            None => return EvictionOutcome::Skipped,
        };

        let tokens_before = self.window_tokens(conversation);
        let block = &conversation.messages()[range.clone()];
        debug!(
            start = range.start,
            end = range.end,
            block_tokens = self.counter.count_messages(block),
            "Summarising old turns"
        );

        let prompt = templates.summary_prompt(block);
        let mut options = ChatOptions::new().with_max_tokens(self.settings.summary_max_tokens);
        if let Some(model) = &self.settings.model {
            options = options.with_model(model);
        }

        let summary = match provider.chat(vec![Message::user(&prompt)], options).await {
            Ok(response) if !response.is_empty() => response.content.trim().to_string(),
            Ok(_) => {
                warn!("Summary request returned no content; keeping history");
                return EvictionOutcome::Aborted;
            }
            Err(e) => {
                warn!(error = %e, "Summary request failed; keeping history");
                return EvictionOutcome::Aborted;
            }
        };

        let removed = match conversation.evict(range) {
            Ok(removed) => removed.len(),
            Err(e) => {
                warn!(error = %e, "Eviction rejected; keeping history");
                return EvictionOutcome::Aborted;
            }
        };
        conversation.append_summary(&summary);

        let summary_tokens = self.counter.count_text(&summary);
        info!(
            removed = removed,
            tokens_before = tokens_before,
            tokens_after = self.window_tokens(conversation),
            summary_tokens = summary_tokens,
            "Evicted old turns into summary"
        );
        debug!(
            summary_chars = conversation.summary().len(),
            "Rolling summary size"
        );

        EvictionOutcome::Evicted {
            removed,
            summary_tokens,
        }
    }
}
