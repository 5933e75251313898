//! Prompt assembly for the reasoning loop and the summariser
//!
//! This module holds the two prompt templates and the `PromptBuilder` that
//! fills them. The system template takes `{tools}` and `{date}`, the summary
//! template takes `{lines}`. Substitution is literal: any other braces in a
//! template are left untouched.

use std::fs;

use chrono::Local;

use crate::config::PromptsConfig;
use crate::error::{ReagentError, Result};
use crate::session::Message;

/// Built-in system instructions for the Thought / Action / Observation protocol.
pub const DEFAULT_SYSTEM_TEMPLATE: &str = r#"You run in a loop of Thought, Action, PAUSE, Observation.
At the end of the loop you output a Final Answer.

Use Thought to describe your reasoning about the question you have been asked.
Use Action to run one of the actions available to you, then return PAUSE.
Observation will be the result of running that action.

An action is written on a single line as:
Action: <tool_name>: <input>

Your available actions are:
{tools}

Example session:

Question: What is the weather like in Paris?
Thought: I should look up the current weather in Paris.
Action: weather: Paris
PAUSE

You will be called again with this:

Observation from weather: The temperature in Paris is 18°C. The weather is light rain.

You then output:

Final Answer: It is 18°C and lightly raining in Paris.

Rules:
- Run at most one action per response and stop after PAUSE.
- When you already know the answer, reply with "Final Answer:" followed by the answer.
- Answer in the language the user wrote in.

Current date and time: {date}"#;

/// Built-in instruction for compressing old turns.
pub const DEFAULT_SUMMARY_TEMPLATE: &str = r#"Summarize the following conversation in a few sentences.
Keep the user's questions, the facts that were found and the answers that were given.
Do not add anything that is not in the conversation.

Conversation:
{lines}

Summary:"#;

/// Header placed before the rolling summary in the system prompt.
const SUMMARY_HEADER: &str = "\n\nOld messages summary:\n";

/// Timestamp format for the `{date}` placeholder.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The system and summary templates in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    /// Template with `{tools}` and `{date}` placeholders
    pub system: String,
    /// Template with a `{lines}` placeholder
    pub summary: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_TEMPLATE.to_string(),
            summary: DEFAULT_SUMMARY_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Load templates, reading override files where configured.
    pub fn load(config: &PromptsConfig) -> Result<Self> {
        let mut templates = Self::default();
        if let Some(path) = &config.system_prompt_path {
            templates.system = read_template(path)?;
        }
        if let Some(path) = &config.summary_prompt_path {
            templates.summary = read_template(path)?;
        }
        Ok(templates)
    }

    /// Fill the summary template with a `role: content` transcript of `messages`.
    ///
    /// # Example
    /// ```
    /// use reagent::agent::PromptTemplates;
    /// use reagent::session::Message;
    ///
    /// let templates = PromptTemplates {
    ///     system: String::new(),
    ///     summary: "Summarize:\n{lines}".to_string(),
    /// };
    /// let prompt = templates.summary_prompt(&[Message::user("Hi"), Message::assistant("Hello!")]);
    /// assert_eq!(prompt, "Summarize:\nuser: Hi\nassistant: Hello!");
    /// ```
    pub fn summary_prompt(&self, messages: &[Message]) -> String {
        let lines = messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");
        self.summary.replace("{lines}", &lines)
    }
}

fn read_template(path: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| ReagentError::Template(format!("cannot read template {}: {}", path, e)))
}

/// Builds the system prompt and the full message list for one Think step.
///
/// # Example
///
/// ```rust
/// use reagent::agent::{PromptBuilder, PromptTemplates};
/// use reagent::session::{Message, Role};
///
/// let templates = PromptTemplates::default();
/// let builder = PromptBuilder::new(&templates)
///     .with_tools("echo: Echoes the input back.")
///     .with_summary("The user asked about Paris.")
///     .with_date("2025-01-01 12:00:00");
///
/// let system = builder.build_system_prompt();
/// assert!(system.contains("echo: Echoes the input back."));
/// assert!(system.contains("2025-01-01 12:00:00"));
/// assert!(system.ends_with("Old messages summary:\nThe user asked about Paris."));
///
/// let messages = builder.build_messages(&[Message::user("Hi")]);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages.len(), 2);
/// ```
pub struct PromptBuilder<'a> {
    templates: &'a PromptTemplates,
    tools: String,
    summary: String,
    date: Option<String>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder over the given templates.
    pub fn new(templates: &'a PromptTemplates) -> Self {
        Self {
            templates,
            tools: String::new(),
            summary: String::new(),
            date: None,
        }
    }

    /// Set the tool listing for `{tools}`.
    pub fn with_tools(mut self, listing: &str) -> Self {
        self.tools = listing.to_string();
        self
    }

    /// Set the rolling summary; an empty summary adds nothing to the prompt.
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    /// Pin the `{date}` value instead of using the local clock.
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    /// Render the system prompt.
    pub fn build_system_prompt(&self) -> String {
        let date = self
            .date
            .clone()
            .unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string());

        let mut prompt = self
            .templates
            .system
            .replace("{tools}", &self.tools)
            .replace("{date}", &date);

        if !self.summary.is_empty() {
            prompt.push_str(SUMMARY_HEADER);
            prompt.push_str(&self.summary);
        }
        prompt
    }

    /// The system prompt followed by `history`, oldest first.
    pub fn build_messages(&self, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(&self.build_system_prompt()));
        messages.extend_from_slice(history);
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn templates(system: &str) -> PromptTemplates {
        PromptTemplates {
            system: system.to_string(),
            summary: DEFAULT_SUMMARY_TEMPLATE.to_string(),
        }
    }

    // ── PromptTemplates ────────────────────────────────────────────────

    #[test]
    fn test_default_templates_have_placeholders() {
        let t = PromptTemplates::default();
        assert!(t.system.contains("{tools}"));
        assert!(t.system.contains("{date}"));
        assert!(t.summary.contains("{lines}"));
    }

    #[test]
    fn test_load_without_overrides_uses_defaults() {
        let t = PromptTemplates::load(&PromptsConfig::default()).unwrap();
        assert_eq!(t, PromptTemplates::default());
    }

    #[test]
    fn test_load_reads_override_files() {
        let mut system = NamedTempFile::new().unwrap();
        write!(system, "Tools:\n{{tools}}\nNow: {{date}}").unwrap();
        let mut summary = NamedTempFile::new().unwrap();
        write!(summary, "Condense:\n{{lines}}").unwrap();

        let config = PromptsConfig {
            system_prompt_path: Some(system.path().to_string_lossy().to_string()),
            summary_prompt_path: Some(summary.path().to_string_lossy().to_string()),
        };
        let t = PromptTemplates::load(&config).unwrap();
        assert_eq!(t.system, "Tools:\n{tools}\nNow: {date}");
        assert_eq!(t.summary, "Condense:\n{lines}");
    }

    #[test]
    fn test_load_missing_file_is_template_error() {
        let config = PromptsConfig {
            system_prompt_path: Some("/nonexistent/reagent/system.txt".to_string()),
            summary_prompt_path: None,
        };
        let err = PromptTemplates::load(&config).unwrap_err();
        assert!(matches!(err, ReagentError::Template(_)));
    }

    #[test]
    fn test_summary_prompt_labels_roles() {
        let t = PromptTemplates {
            system: String::new(),
            summary: "{lines}".to_string(),
        };
        let prompt = t.summary_prompt(&[
            Message::user("weather in Paris?"),
            Message::tool_result("call_1", "Observation from weather: sunny"),
        ]);
        assert_eq!(
            prompt,
            "user: weather in Paris?\ntool: Observation from weather: sunny"
        );
    }

    // ── PromptBuilder ──────────────────────────────────────────────────

    #[test]
    fn test_system_prompt_fills_placeholders() {
        let t = templates("T={tools} D={date}");
        let prompt = PromptBuilder::new(&t)
            .with_tools("a: b")
            .with_date("2024-05-01 08:00:00")
            .build_system_prompt();
        assert_eq!(prompt, "T=a: b D=2024-05-01 08:00:00");
    }

    #[test]
    fn test_system_prompt_leaves_other_braces() {
        let t = templates("{\"json\": true} {tools}");
        let prompt = PromptBuilder::new(&t).with_tools("x").build_system_prompt();
        assert_eq!(prompt, "{\"json\": true} x");
    }

    #[test]
    fn test_empty_summary_adds_nothing() {
        let t = templates("base");
        let prompt = PromptBuilder::new(&t).with_summary("").build_system_prompt();
        assert_eq!(prompt, "base");
    }

    #[test]
    fn test_summary_appended_after_template() {
        let t = templates("base");
        let prompt = PromptBuilder::new(&t)
            .with_summary("earlier stuff")
            .build_system_prompt();
        assert_eq!(prompt, "base\n\nOld messages summary:\nearlier stuff");
    }

    #[test]
    fn test_default_date_format() {
        let t = templates("{date}");
        let prompt = PromptBuilder::new(&t).build_system_prompt();
        assert!(chrono::NaiveDateTime::parse_from_str(&prompt, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_build_messages_prepends_system() {
        let t = templates("sys");
        let history = vec![Message::user("q"), Message::assistant("a")];
        let messages = PromptBuilder::new(&t).build_messages(&history);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "sys");
        assert_eq!(messages[1], history[0]);
        assert_eq!(messages[2], history[1]);
    }
}
