//! Presentation helpers for the messages of a turn.
//!
//! Separates the chain of thought (Thought / Action / PAUSE lines and tool
//! observations) from what should be shown to the user, and pulls the final
//! answer out of the assistant message that carries it.

use crate::session::{Message, Role};

use super::parser::FINAL_ANSWER_MARKER;

const REASONING_MARKERS: &[&str] = &["Thought:", "Action:", "PAUSE", "Observation"];

/// Split `content` around the final-answer marker.
///
/// Returns `(reasoning, answer)`, both trimmed, or `None` when the marker is
/// absent.
///
/// # Example
/// ```
/// use reagent::agent::transcript::split_final_answer;
///
/// let (before, answer) = split_final_answer("Thought: easy\nFinal Answer: 4").unwrap();
/// assert_eq!(before, "Thought: easy");
/// assert_eq!(answer, "4");
/// assert!(split_final_answer("Action: echo: x").is_none());
/// ```
pub fn split_final_answer(content: &str) -> Option<(&str, &str)> {
    content
        .split_once(FINAL_ANSWER_MARKER)
        .map(|(before, after)| (before.trim(), after.trim()))
}

/// True for tool observations and for messages whose text (ignoring any
/// final answer) carries protocol markers.
pub fn is_chain_of_thought(message: &Message) -> bool {
    if message.role == Role::Tool {
        return true;
    }
    let text = match split_final_answer(&message.content) {
        Some((before, _)) => before,
        None => message.content.as_str(),
    };
    REASONING_MARKERS.iter().any(|m| text.contains(m))
}

/// A turn split into its reasoning trace and its user-facing replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnView {
    /// Reasoning steps and observations, in order
    pub chain_of_thought: Vec<Message>,
    /// Messages to show the user, in order
    pub replies: Vec<Message>,
    /// The last final answer in the turn, if any
    pub final_answer: Option<String>,
}

/// Classify the messages of one turn.
///
/// When a message carries a final answer only the text before the marker is
/// classified; the answer itself becomes a reply if nothing else was.
pub fn classify_turn(messages: &[Message]) -> TurnView {
    let mut view = TurnView::default();

    for message in messages {
        let mut remaining = message.clone();
        if let Some((before, answer)) = split_final_answer(&message.content) {
            view.final_answer = Some(answer.to_string());
            remaining.content = before.to_string();
        }

        if is_chain_of_thought(&remaining) {
            view.chain_of_thought.push(remaining);
        } else if !remaining.content.is_empty() {
            view.replies.push(remaining);
        }
    }

    if view.replies.is_empty() {
        if let Some(answer) = &view.final_answer {
            view.replies.push(Message::assistant(answer));
        }
    }
    view
}
