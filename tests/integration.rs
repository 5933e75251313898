//! Integration tests for Reagent
//!
//! These tests verify that configuration, templates, the tool registry and
//! the conversation manager work together, without any network access.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::tempdir;
use reagent::{
    agent::{classify_turn, Agent, PromptTemplates},
    config::{validate_values, Config, DiagnosticLevel},
    error::Result,
    providers::{ChatOptions, LLMProvider, LLMResponse},
    session::{ConversationManager, Message, Role},
    tools::{default_registry, Dispatch, EchoTool, Tool, ToolOutput, ToolRegistry},
};

// ============================================================================
// Helpers
// ============================================================================

/// Answers with the last user message after a short delay, so overlapping
/// turns actually interleave.
struct SlowParrot {
    delay: Duration,
}

#[async_trait]
impl LLMProvider for SlowParrot {
    fn name(&self) -> &str {
        "slow-parrot"
    }

    fn default_model(&self) -> &str {
        "parrot"
    }

    async fn chat(&self, messages: Vec<Message>, _options: ChatOptions) -> Result<LLMResponse> {
        tokio::time::sleep(self.delay).await;
        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(LLMResponse::text(&format!("Final Answer: {}", last)))
    }
}

/// Returns the system prompt it was given as the final answer.
struct SystemEcho;

#[async_trait]
impl LLMProvider for SystemEcho {
    fn name(&self) -> &str {
        "system-echo"
    }

    fn default_model(&self) -> &str {
        "echo"
    }

    async fn chat(&self, messages: Vec<Message>, _options: ChatOptions) -> Result<LLMResponse> {
        Ok(LLMResponse::text(&format!(
            "Final Answer: {}",
            messages[0].content
        )))
    }
}

struct UpperTool;

#[async_trait]
impl Tool for UpperTool {
    fn name(&self) -> &str {
        "Upper"
    }

    fn description(&self) -> &str {
        "Uppercases the input."
    }

    async fn invoke(&self, query: &str) -> Result<ToolOutput> {
        Ok(ToolOutput::Text(query.to_uppercase()))
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

#[tokio::test]
async fn test_registry_listing_and_case_insensitive_dispatch() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool));
    registry.register(Box::new(UpperTool));

    assert_eq!(
        registry.describe_all(),
        "echo: Echoes the input back. e.g. 'hello'.\nupper: Uppercases the input."
    );

    match registry.dispatch("UPPER", "shout").await {
        Dispatch::Output(output) => assert_eq!(output.render(), "SHOUT"),
        other => panic!("unexpected dispatch result: {:?}", other),
    }
    assert!(matches!(
        registry.dispatch("lower", "x").await,
        Dispatch::NotFound
    ));
}

#[test]
fn test_default_registry_follows_configured_keys() {
    let mut config = Config::default();
    let registry = default_registry(&config.tools);
    assert_eq!(registry.names(), vec!["wikipedia".to_string()]);

    config.tools.web_search_api_key = Some("tvly-test".to_string());
    config.tools.weather_api_key = Some("ow-test".to_string());
    let registry = default_registry(&config.tools);
    assert_eq!(
        registry.names(),
        vec![
            "wikipedia".to_string(),
            "websearch".to_string(),
            "weather".to_string()
        ]
    );
}

// ============================================================================
// Configuration + Templates
// ============================================================================

#[tokio::test]
async fn test_agent_from_config_uses_template_and_limits() {
    let dir = tempdir().unwrap();
    let system_path = dir.path().join("system.txt");
    std::fs::write(&system_path, "TOOLS[{tools}]").unwrap();

    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        format!(
            r#"{{
                "agent": {{"max_iterations": 3, "model": "test-model"}},
                "prompts": {{"system_prompt_path": "{}"}}
            }}"#,
            system_path.display()
        ),
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool));

    let mut agent = Agent::from_config(&config, Arc::new(SystemEcho), Arc::new(registry), "cfg")
        .unwrap();
    assert_eq!(agent.settings().max_iterations, 3);
    assert_eq!(agent.settings().model.as_deref(), Some("test-model"));

    let messages = agent.execute("hi").await.unwrap();
    assert_eq!(
        messages[0].content,
        "Final Answer: TOOLS[echo: Echoes the input back. e.g. 'hello'.]"
    );
}

#[test]
fn test_config_with_missing_template_fails_validation_and_loading() {
    let mut config = Config::default();
    config.prompts.summary_prompt_path = Some("/nonexistent/summary.txt".to_string());

    let diags = validate_values(&config);
    assert!(diags.iter().any(|d| d.level == DiagnosticLevel::Error));
    assert!(PromptTemplates::load(&config.prompts).is_err());
}

// ============================================================================
// Conversation Manager
// ============================================================================

fn manager(delay_ms: u64) -> Arc<ConversationManager> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool));
    let prototype = Agent::new(
        Arc::new(SlowParrot {
            delay: Duration::from_millis(delay_ms),
        }),
        Arc::new(registry),
        "prototype",
    );
    Arc::new(ConversationManager::new(prototype))
}

#[tokio::test]
async fn test_conversations_run_concurrently_and_stay_isolated() {
    let manager = manager(20);
    let mut handles = Vec::new();
    for c in 0..4 {
        for q in 0..3 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                let id = format!("conv-{}", c);
                manager.execute(&id, &format!("{}-{}", c, q)).await
            }));
        }
    }
    for handle in handles {
        let messages = handle.await.unwrap().unwrap();
        assert_eq!(messages.len(), 1);
    }

    assert_eq!(manager.len().await, 4);
    for c in 0..4 {
        let history = manager.chat_history(&format!("conv-{}", c)).await.unwrap();
        assert_eq!(history.len(), 6);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert!(pair[0].content.starts_with(&format!("{}-", c)));
            assert_eq!(pair[1].content, format!("Final Answer: {}", pair[0].content));
        }
    }
}

#[tokio::test]
async fn test_manager_turn_presentation() {
    let manager = manager(0);
    let id = manager.create().await;
    let messages = manager.execute(&id, "ping").await.unwrap();

    let view = classify_turn(&messages);
    assert_eq!(view.final_answer.as_deref(), Some("ping"));
    assert!(view.chain_of_thought.is_empty());

    assert!(manager.remove(&id).await);
    assert!(manager.chat_history(&id).await.is_err());
}
