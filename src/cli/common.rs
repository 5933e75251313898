//! Shared CLI helpers: config loading, agent construction, error display.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use reagent::agent::Agent;
use reagent::config::validate::parse_role;
use reagent::config::Config;
use reagent::error::{ProviderError, ReagentError};
use reagent::providers::{LLMProvider, OpenAIProvider};
use reagent::tools::default_registry;

/// Load config from `path`, or from `~/.reagent/config.json` when `None`.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Config::load().with_context(|| "Failed to load configuration"),
    }
}

/// Build the chat provider from the `provider` section.
pub(crate) fn create_provider(config: &Config) -> Result<Arc<dyn LLMProvider>> {
    let api_key = match config.provider.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => bail!(
            "No API key configured. Set REAGENT_PROVIDER_API_KEY (or DEEPSEEK_API_KEY)\n  or add provider.api_key to {}",
            Config::path().display()
        ),
    };

    let mut provider = match config.provider.api_base.as_deref() {
        Some(base) if !base.trim().is_empty() => OpenAIProvider::with_base_url(&api_key, base),
        _ => OpenAIProvider::new(&api_key),
    };

    if let Some(name) = &config.provider.observation_role {
        match parse_role(name) {
            Some(role) => provider = provider.with_observation_role(role),
            None => bail!(
                "provider.observation_role '{}' is not one of tool, user, system, assistant",
                name
            ),
        }
    }

    Ok(Arc::new(provider))
}

/// Build an agent with the configured provider, tools, templates and limits.
pub(crate) fn create_agent(config: &Config, conversation_id: &str) -> Result<Agent> {
    let provider = create_provider(config)?;
    let tools = Arc::new(default_registry(&config.tools));
    Agent::from_config(config, provider, tools, conversation_id)
        .with_context(|| "Failed to create agent")
}

/// Turn an agent error into a message with actionable guidance.
pub(crate) fn friendly_error(err: &ReagentError) -> String {
    let provider_err = match err {
        ReagentError::ProviderTyped(e) => e,
        ReagentError::Http(e) if e.is_timeout() => {
            return "The request timed out. Check provider.api_base and your connection."
                .to_string()
        }
        other => return other.to_string(),
    };

    let hint = match provider_err {
        ProviderError::Auth(_) => "Invalid API key. Check provider.api_key and try again.",
        ProviderError::Billing(_) => "Billing issue on your provider account.",
        ProviderError::RateLimit(_) => "Rate limited. Wait a moment and try again.",
        ProviderError::ModelNotFound(_) => {
            "Model not found. Check agent.model against the models your endpoint serves."
        }
        ProviderError::Timeout(_) => "The model did not answer in time. Try again.",
        ProviderError::ServerError(_) => "The provider had a server error. Try again later.",
        ProviderError::InvalidRequest(_) | ProviderError::Unknown(_) => {
            return provider_err.to_string()
        }
    };
    format!("{}\n  Detail: {}", hint, provider_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_requires_key() {
        let config = Config::default();
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn test_create_provider_rejects_bad_role() {
        let mut config = Config::default();
        config.provider.api_key = Some("sk-test".to_string());
        config.provider.observation_role = Some("narrator".to_string());
        assert!(create_provider(&config).is_err());
    }

    #[test]
    fn test_create_agent_with_key() {
        let mut config = Config::default();
        config.provider.api_key = Some("sk-test".to_string());
        config.provider.api_base = Some("http://localhost:1/v1".to_string());
        let agent = create_agent(&config, "cli").unwrap();
        assert!(agent.tools().has("wikipedia"));
        assert_eq!(agent.settings().max_iterations, 5);
    }

    #[test]
    fn test_friendly_error_auth() {
        let err = ReagentError::ProviderTyped(ProviderError::Auth("bad key".into()));
        let msg = friendly_error(&err);
        assert!(msg.contains("Invalid API key"));
        assert!(msg.contains("bad key"));
    }

    #[test]
    fn test_friendly_error_passthrough() {
        let err = ReagentError::NotFound("conversation x".into());
        assert_eq!(friendly_error(&err), "Not found: conversation x");
    }
}
