//! Configuration management for Reagent
//!
//! Configuration is loaded from `~/.reagent/config.json` (or an explicit
//! path) and then overridden from the environment. A `.env` file in the
//! working directory is read first, so its variables count as environment.

mod types;
pub mod validate;

pub use types::*;
pub use validate::{validate_config, validate_values, Diagnostic, DiagnosticLevel};

use crate::error::{ReagentError, Result};
use std::path::{Path, PathBuf};

impl Config {
    /// Returns the Reagent configuration directory path (~/.reagent)
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".reagent")
    }

    /// Returns the path to the config file (~/.reagent/config.json)
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load configuration from the default path with environment overrides.
    ///
    /// If the config file doesn't exist, returns default configuration.
    /// Environment variables override config values using the pattern
    /// `REAGENT_SECTION_KEY`.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load configuration from a specific path with environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                ReagentError::Config(format!("invalid config file {}: {}", path.display(), e))
            })?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// `REAGENT_*` variables win; the conventional provider and tool
    /// variables are used when the `REAGENT_*` form is absent.
    pub fn apply_env_overrides(&mut self) {
        // Agent
        if let Ok(val) = std::env::var("REAGENT_AGENT_MODEL") {
            self.agent.model = val;
        }
        if let Some(v) = env_parse("REAGENT_AGENT_MAX_TOKENS") {
            self.agent.max_tokens = v;
        }
        if let Some(v) = env_parse("REAGENT_AGENT_TEMPERATURE") {
            self.agent.temperature = v;
        }
        if let Some(v) = env_parse("REAGENT_AGENT_MAX_ITERATIONS") {
            self.agent.max_iterations = v;
        }

        // Memory
        if let Some(v) = env_parse("REAGENT_MEMORY_TURNS_BEFORE_SUMMARY") {
            self.memory.turns_before_summary = v;
        }
        if let Some(v) = env_parse("REAGENT_MEMORY_MAX_WINDOW_TOKENS") {
            self.memory.max_window_tokens = v;
        }

        // Provider
        if let Some(val) = env_first(&["REAGENT_PROVIDER_API_KEY", "DEEPSEEK_API_KEY"]) {
            self.provider.api_key = Some(val);
        }
        if let Some(val) = env_first(&["REAGENT_PROVIDER_API_BASE", "DEEPSEEK_BASE_URL"]) {
            self.provider.api_base = Some(val);
        }

        // Tools
        if let Some(val) = env_first(&["REAGENT_TOOLS_WEB_SEARCH_API_KEY", "TAVILY_API_KEY"]) {
            self.tools.web_search_api_key = Some(val);
        }
        if let Some(val) = env_first(&["REAGENT_TOOLS_WEATHER_API_KEY", "OPENWEATHER_API_KEY"]) {
            self.tools.weather_api_key = Some(val);
        }
    }
}

/// First non-empty value among `names`.
fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|val| !val.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.trim().parse().ok())
}
