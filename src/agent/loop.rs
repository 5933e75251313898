//! The reasoning loop.
//!
//! One call to [`Agent::execute`] runs a turn: the query is recorded, then the
//! agent alternates Think (one LLM call) and Act (one tool call) until the
//! model gives a final answer, names an unknown tool, produces nothing the
//! parser recognises, or the iteration budget runs out.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::Config;
use crate::error::{ReagentError, Result};
use crate::providers::{ChatOptions, LLMProvider};
use crate::session::{ChatRecord, Conversation, Message};
use crate::tools::{Dispatch, ToolRegistry};
use crate::utils::preview;

use super::context::{PromptBuilder, PromptTemplates};
use super::memory::{MemoryManager, MemorySettings};
use super::parser::{parse_action, Action};

/// Assistant message recorded when the iteration budget is exhausted.
pub const EXHAUSTED_MESSAGE: &str =
    "I'm sorry, but I couldn't find a satisfactory answer within the allowed number of iterations.";

/// Assistant content recorded when the model returns no text.
pub const NO_RESPONSE_TEXT: &str = "No response from the model";

/// Per-request knobs for the reasoning call.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Model override; the provider default when `None`
    pub model: Option<String>,
    /// Completion ceiling for each Think step
    pub max_tokens: u32,
    /// Sampling temperature for each Think step
    pub temperature: f32,
    /// Think steps allowed per turn
    pub max_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 500,
            temperature: 0.5,
            max_iterations: 5,
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final answer
    Answered,
    /// The iteration budget ran out
    Exhausted,
    /// The response had neither a final answer nor an action line
    NoAction,
    /// The model asked for a tool that is not registered
    UnknownTool(String),
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct Turn {
    /// How the turn ended
    pub outcome: TurnOutcome,
    /// Messages recorded after the user's query, oldest first
    pub messages: Vec<Message>,
    /// Think steps taken, including the one that hit the budget
    pub iterations: usize,
}

/// A ReAct agent bound to one conversation.
///
/// The provider, tool registry and templates are shared; the conversation is
/// owned. Use [`Agent::fork`] to get an agent for another conversation.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use reagent::agent::Agent;
/// use reagent::providers::OpenAIProvider;
/// use reagent::tools::{EchoTool, ToolRegistry};
///
/// async fn run() -> reagent::Result<()> {
///     let mut tools = ToolRegistry::new();
///     tools.register(Box::new(EchoTool));
///
///     let provider = Arc::new(OpenAIProvider::new("your-api-key"));
///     let mut agent = Agent::new(provider, Arc::new(tools), "demo");
///
///     for message in agent.execute("Echo 'hello' back to me").await? {
///         println!("{}: {}", message.role, message.content);
///     }
///     Ok(())
/// }
/// ```
pub struct Agent {
    provider: Arc<dyn LLMProvider>,
    tools: Arc<ToolRegistry>,
    templates: Arc<PromptTemplates>,
    memory: MemoryManager,
    settings: AgentSettings,
    conversation: Conversation,
    current_iteration: usize,
    call_seq: usize,
}

impl Agent {
    /// Create an agent with default settings and built-in templates.
    pub fn new(provider: Arc<dyn LLMProvider>, tools: Arc<ToolRegistry>, conversation_id: &str) -> Self {
        Self {
            provider,
            tools,
            templates: Arc::new(PromptTemplates::default()),
            memory: MemoryManager::new(MemorySettings::default()),
            settings: AgentSettings::default(),
            conversation: Conversation::new(conversation_id),
            current_iteration: 0,
            call_seq: 0,
        }
    }

    /// Create an agent configured from `config`, loading template overrides.
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn LLMProvider>,
        tools: Arc<ToolRegistry>,
        conversation_id: &str,
    ) -> Result<Self> {
        let templates = PromptTemplates::load(&config.prompts)?;
        let settings = AgentSettings {
            model: Some(config.agent.model.clone()).filter(|m| !m.is_empty()),
            max_tokens: config.agent.max_tokens,
            temperature: config.agent.temperature,
            max_iterations: config.agent.max_iterations,
        };
        let memory = MemoryManager::new(MemorySettings {
            turns_before_summary: config.memory.turns_before_summary,
            max_window_tokens: config.memory.max_window_tokens,
            summary_max_tokens: config.memory.summary_max_tokens,
            model: settings.model.clone(),
        });
        Ok(Self::new(provider, tools, conversation_id)
            .with_templates(templates)
            .with_settings(settings)
            .with_memory(memory))
    }

    /// Replace the reasoning settings.
    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the memory manager.
    pub fn with_memory(mut self, memory: MemoryManager) -> Self {
        self.memory = memory;
        self
    }

    /// Replace the prompt templates.
    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = Arc::new(templates);
        self
    }

    /// A new agent sharing provider, tools, templates and settings, with an
    /// empty conversation.
    pub fn fork(&self, conversation_id: &str) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            tools: Arc::clone(&self.tools),
            templates: Arc::clone(&self.templates),
            memory: self.memory.clone(),
            settings: self.settings.clone(),
            conversation: Conversation::new(conversation_id),
            current_iteration: 0,
            call_seq: 0,
        }
    }

    /// The conversation this agent owns.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The reasoning settings.
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Think steps taken by the most recent turn.
    pub fn current_iteration(&self) -> usize {
        self.current_iteration
    }

    /// The full window as serializable records.
    pub fn chat_history(&self) -> Vec<ChatRecord> {
        self.conversation.chat_history()
    }

    /// Run one turn and return the messages it produced.
    ///
    /// LLM failures are returned as `Err`; everything recorded up to that
    /// point stays in the conversation.
    pub async fn execute(&mut self, query: &str) -> Result<Vec<Message>> {
        Ok(self.execute_turn(query).await?.messages)
    }

    /// Run one turn and report how it ended.
    pub async fn execute_turn(&mut self, query: &str) -> Result<Turn> {
        let turn_id = uuid::Uuid::new_v4();
        let span = info_span!(
            "turn",
            turn_id = %turn_id,
            conversation = %self.conversation.id,
        );

        async {
            self.current_iteration = 0;
            self.call_seq = 0;
            self.conversation.push(Message::user(query));
            info!("Processing query");

            let outcome = self.run_cycles().await?;
            info!(
                iterations = self.current_iteration,
                outcome = ?outcome,
                "Turn finished"
            );

            Ok::<_, ReagentError>(Turn {
                outcome,
                messages: self.conversation.turn_messages(),
                iterations: self.current_iteration,
            })
        }
        .instrument(span)
        .await
    }

    async fn run_cycles(&mut self) -> Result<TurnOutcome> {
        loop {
            self.current_iteration += 1;
            if self.current_iteration > self.settings.max_iterations {
                warn!(
                    max_iterations = self.settings.max_iterations,
                    "Iteration budget exhausted"
                );
                self.conversation.push(Message::assistant(EXHAUSTED_MESSAGE));
                return Ok(TurnOutcome::Exhausted);
            }

            let response = self.think().await?;

            let (tool, query) = match parse_action(&response) {
                Action::FinalAnswer => return Ok(TurnOutcome::Answered),
                Action::Unrecognized => {
                    warn!(
                        iteration = self.current_iteration,
                        "No action or final answer found in the response"
                    );
                    return Ok(TurnOutcome::NoAction);
                }
                Action::ToolInvocation { tool, query } => (tool, query),
            };

            if !self.act(&tool, &query).await {
                return Ok(TurnOutcome::UnknownTool(tool));
            }
        }
    }

    /// Compress memory if needed, call the model once and record the reply.
    async fn think(&mut self) -> Result<String> {
        debug!(iteration = self.current_iteration, "Think");

        self.memory
            .manage(&mut self.conversation, self.provider.as_ref(), &self.templates)
            .await;

        let messages = PromptBuilder::new(&self.templates)
            .with_tools(&self.tools.describe_all())
            .with_summary(self.conversation.summary())
            .build_messages(self.conversation.messages());

        let mut options = ChatOptions::new()
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);
        if let Some(model) = &self.settings.model {
            options = options.with_model(model);
        }

        let response = self.provider.chat(messages, options).await?;
        let content = if response.is_empty() {
            NO_RESPONSE_TEXT.to_string()
        } else {
            response.content.trim().to_string()
        };

        debug!(reply = %preview(&content, 160), "Model replied");
        self.conversation.push(Message::assistant(&content));
        Ok(content)
    }

    /// Dispatch one action and record the observation.
    ///
    /// Returns `false` when the tool does not exist, which ends the turn.
    async fn act(&mut self, tool: &str, query: &str) -> bool {
        debug!(tool = tool, query = query, "Act");

        let observation = match self.tools.dispatch(tool, query).await {
            Dispatch::Output(output) => format!("Observation from {}: {}", tool, output.render()),
            Dispatch::Failed(e) => {
                warn!(tool = tool, error = %e, "Tool reported an error");
                format!("Observation from {}: Error: {}", tool, error_text(&e))
            }
            Dispatch::NotFound => {
                warn!(tool = tool, "No tool registered under that name");
                self.conversation
                    .push(Message::system(&format!("Error: Tool {} not found", tool)));
                return false;
            }
        };

        self.call_seq += 1;
        let call_id = format!("call_{}", self.call_seq);
        self.conversation
            .push(Message::tool_result(&call_id, &observation));
        true
    }
}

fn error_text(err: &ReagentError) -> String {
    match err {
        ReagentError::Tool(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::LLMResponse;
    use crate::session::Role;
    use crate::tools::EchoTool;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies with scripted responses in order, then with the last one forever.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        last: String,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                last: replies.last().map(|r| r.to_string()).unwrap_or_default(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn chat(&self, messages: Vec<Message>, _options: ChatOptions) -> Result<LLMResponse> {
            self.seen.lock().unwrap().push(messages);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.last.clone());
            Ok(LLMResponse::text(&reply))
        }

        fn default_model(&self) -> &str {
            "scripted"
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn agent_with(replies: &[&str]) -> (Agent, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(replies));
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(EchoTool));
        let agent = Agent::new(provider.clone(), Arc::new(tools), "test");
        (agent, provider)
    }

    #[test]
    fn test_default_settings() {
        let s = AgentSettings::default();
        assert_eq!(s.max_tokens, 500);
        assert_eq!(s.temperature, 0.5);
        assert_eq!(s.max_iterations, 5);
        assert!(s.model.is_none());
    }

    #[tokio::test]
    async fn test_final_answer_first_try() {
        let (mut agent, _) = agent_with(&["Final Answer: 4"]);
        let turn = agent.execute_turn("2+2?").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::Answered);
        assert_eq!(turn.iterations, 1);
        assert_eq!(turn.messages.len(), 1);
        assert_eq!(turn.messages[0].role, Role::Assistant);
        assert_eq!(agent.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_then_answer() {
        let (mut agent, _) = agent_with(&["Action: echo: hi\nPAUSE", "Final Answer: hi"]);
        let messages = agent.execute("say hi").await.unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::Tool);
        assert_eq!(messages[1].content, "Observation from echo: hi");
        assert_eq!(messages[1].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(agent.current_iteration(), 2);
    }

    #[tokio::test]
    async fn test_call_ids_restart_each_turn() {
        let (mut agent, _) = agent_with(&[
            "Action: echo: a",
            "Action: echo: b",
            "Final Answer: ab",
            "Action: echo: c",
            "Final Answer: c",
        ]);
        let first = agent.execute("one").await.unwrap();
        let ids: Vec<_> = first.iter().filter_map(|m| m.tool_call_id.clone()).collect();
        assert_eq!(ids, vec!["call_1", "call_2"]);

        let second = agent.execute("two").await.unwrap();
        let ids: Vec<_> = second.iter().filter_map(|m| m.tool_call_id.clone()).collect();
        assert_eq!(ids, vec!["call_1"]);
    }

    #[tokio::test]
    async fn test_budget_exhaustion() {
        let (mut agent, provider) = agent_with(&["Action: echo: again\nPAUSE"]);
        let turn = agent.execute_turn("loop forever").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::Exhausted);
        assert_eq!(turn.iterations, 6);
        assert_eq!(provider.seen.lock().unwrap().len(), 5);
        let last = turn.messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, EXHAUSTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_unknown_tool_stops_turn() {
        let (mut agent, provider) = agent_with(&["Action: teleport: Mars\nPAUSE"]);
        let turn = agent.execute_turn("go").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::UnknownTool("teleport".into()));
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
        let last = turn.messages.last().unwrap();
        assert_eq!(last.role, Role::System);
        assert_eq!(last.content, "Error: Tool teleport not found");
    }

    #[tokio::test]
    async fn test_unrecognized_response() {
        let (mut agent, _) = agent_with(&["I have no idea."]);
        let turn = agent.execute_turn("??").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::NoAction);
        assert_eq!(turn.messages.len(), 1);
        assert_eq!(turn.messages[0].content, "I have no idea.");
    }

    #[tokio::test]
    async fn test_empty_response_recorded_as_placeholder() {
        let (mut agent, _) = agent_with(&["   "]);
        let turn = agent.execute_turn("hello").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::NoAction);
        assert_eq!(turn.messages[0].content, NO_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn test_prompt_contains_tools_and_history() {
        let (mut agent, provider) = agent_with(&["Final Answer: ok"]);
        agent.execute("first question").await.unwrap();

        let seen = provider.seen.lock().unwrap();
        let prompt = &seen[0];
        assert_eq!(prompt[0].role, Role::System);
        assert!(prompt[0].content.contains("echo: Echoes the input back."));
        assert!(!prompt[0].content.contains("Old messages summary"));
        assert_eq!(prompt[1], Message::user("first question"));
    }

    #[tokio::test]
    async fn test_fork_shares_tools_not_history() {
        let (mut agent, _) = agent_with(&["Final Answer: ok"]);
        agent.execute("q").await.unwrap();

        let other = agent.fork("other");
        assert_eq!(other.conversation().id, "other");
        assert!(other.conversation().is_empty());
        assert!(other.tools().has("echo"));
        assert_eq!(other.settings(), agent.settings());
    }

    #[test]
    fn test_error_text_unwraps_tool_errors() {
        assert_eq!(
            error_text(&ReagentError::Tool("City cannot be empty.".into())),
            "City cannot be empty."
        );
        assert_eq!(
            error_text(&ReagentError::Config("x".into())),
            "Configuration error: x"
        );
    }
}
