//! Token counting for the memory budget.
//!
//! The memory manager only needs an estimate that is stable enough to gate
//! eviction, so the default counter is a word-based heuristic. An exact
//! tokenizer can be plugged in through [`TokenCounter`].

use crate::session::Message;

/// Tokens charged per message for role and framing markup.
const MESSAGE_OVERHEAD: usize = 4;

/// Average tokens per whitespace-separated word, in tenths (1.3).
const TENTH_TOKENS_PER_WORD: usize = 13;

/// Estimates the token cost of messages and free text.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCounter: Send + Sync {
    /// Token cost of a message list as it would be sent to the model.
    fn count_messages(&self, messages: &[Message]) -> usize;

    /// Token cost of a bare string.
    fn count_text(&self, text: &str) -> usize;
}

/// Word-count heuristic: `ceil(words * 1.3)` per text, plus framing per message.
///
/// # Example
/// ```
/// use reagent::agent::{HeuristicTokenCounter, TokenCounter};
/// use reagent::session::Message;
///
/// let counter = HeuristicTokenCounter;
/// assert_eq!(counter.count_text("one two three four five six seven eight nine ten"), 13);
/// assert_eq!(counter.count_messages(&[Message::user("hello world")]), 3 + 4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count_messages(&self, messages: &[Message]) -> usize {
        messages
            .iter()
            .map(|m| self.count_text(&m.content) + MESSAGE_OVERHEAD)
            .sum()
    }

    fn count_text(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        (words * TENTH_TOKENS_PER_WORD + 9) / 10
    }
}
