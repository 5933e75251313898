//! Classifier for model responses in the Thought / Action / Observation protocol.
//!
//! A response is checked for the final-answer marker first, then for the first
//! `Action: <tool>: <query>` line. The marker wins even when an action line
//! is also present.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal, case-sensitive marker that ends a turn.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

static ACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Action:[ \t]*(\w+):[ \t]*(.*)").unwrap());

/// What the loop should do next after reading a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The response contains the final answer; the turn is done.
    FinalAnswer,
    /// Call `tool` (lowercased) with `query` (trimmed).
    ToolInvocation { tool: String, query: String },
    /// Neither a final answer nor an action line was found.
    Unrecognized,
}

/// Classify a model response.
///
/// # Example
/// ```
/// use reagent::agent::{parse_action, Action};
///
/// assert_eq!(
///     parse_action("Thought: check it\nAction: Weather: Paris\nPAUSE"),
///     Action::ToolInvocation { tool: "weather".into(), query: "Paris".into() }
/// );
/// assert_eq!(parse_action("Final Answer: 21°C"), Action::FinalAnswer);
/// assert_eq!(parse_action("hmm"), Action::Unrecognized);
/// ```
pub fn parse_action(response: &str) -> Action {
    if response.contains(FINAL_ANSWER_MARKER) {
        return Action::FinalAnswer;
    }

    match ACTION_RE.captures(response) {
        Some(caps) => Action::ToolInvocation {
            tool: caps[1].trim().to_lowercase(),
            query: caps[2].trim().to_string(),
        },
        None => Action::Unrecognized,
    }
}
