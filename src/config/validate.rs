//! Configuration validation: unknown field detection and value checks.

use serde_json::Value;
use std::collections::HashSet;

use crate::agent::PromptTemplates;
use crate::session::Role;

use super::Config;

/// Known top-level config field names.
const KNOWN_TOP_LEVEL: &[&str] = &["agent", "memory", "provider", "tools", "prompts", "logging"];

/// Known fields for each section.
const KNOWN_SECTIONS: &[(&str, &[&str])] = &[
    ("agent", &["model", "max_tokens", "temperature", "max_iterations"]),
    (
        "memory",
        &["turns_before_summary", "max_window_tokens", "summary_max_tokens"],
    ),
    ("provider", &["api_key", "api_base", "observation_role"]),
    (
        "tools",
        &[
            "web_search_api_key",
            "weather_api_key",
            "wikipedia_language",
            "user_agent",
            "web_search_max_results",
        ],
    ),
    ("prompts", &["system_prompt_path", "summary_prompt_path"]),
    ("logging", &["format", "level", "file"]),
];

/// A validation diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticLevel {
    Ok,
    Warn,
    Error,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, path: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            path: path.to_string(),
            message: message.into(),
        }
    }

    fn error(path: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, path, message)
    }

    fn warn(path: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, path, message)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            DiagnosticLevel::Ok => "[OK]",
            DiagnosticLevel::Warn => "[WARN]",
            DiagnosticLevel::Error => "[ERROR]",
        };
        if self.path.is_empty() {
            write!(f, "{} {}", prefix, self.message)
        } else {
            write!(f, "{} {}: {}", prefix, self.path, self.message)
        }
    }
}

/// Simple Levenshtein distance for "did you mean?" suggestions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, val) in matrix[0].iter_mut().enumerate() {
        *val = j;
    }

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            matrix[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(matrix[i][j + 1] + 1, matrix[i + 1][j] + 1),
                matrix[i][j] + cost,
            );
        }
    }
    matrix[a.len()][b.len()]
}

/// Suggest the closest known field name (if distance <= 3).
pub fn suggest_field(unknown: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|k| (k, levenshtein(unknown, k)))
        .filter(|(_, d)| *d <= 3)
        .min_by_key(|(_, d)| *d)
        .map(|(k, _)| format!("did you mean '{}'?", k))
}

fn unknown_fields(obj: &serde_json::Map<String, Value>, known: &[&str], prefix: &str) -> Vec<Diagnostic> {
    let known_set: HashSet<&str> = known.iter().copied().collect();
    let mut keys: Vec<&String> = obj.keys().filter(|k| !known_set.contains(k.as_str())).collect();
    keys.sort();

    keys.into_iter()
        .map(|key| {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            let msg = match suggest_field(key, known) {
                Some(suggestion) => format!("Unknown field '{}' ({})", key, suggestion),
                None => format!("Unknown field '{}'", key),
            };
            Diagnostic::error(&path, msg)
        })
        .collect()
}

/// Validate a raw JSON config value against known field names.
pub fn validate_config(raw: &Value) -> Vec<Diagnostic> {
    let obj = match raw.as_object() {
        Some(o) => o,
        None => return vec![Diagnostic::error("", "Config must be a JSON object")],
    };

    let mut diagnostics = vec![Diagnostic::new(DiagnosticLevel::Ok, "", "Valid JSON")];

    let mut unknown = unknown_fields(obj, KNOWN_TOP_LEVEL, "");
    for (section, known) in KNOWN_SECTIONS {
        if let Some(fields) = obj.get(*section).and_then(|v| v.as_object()) {
            unknown.extend(unknown_fields(fields, known, section));
        }
    }

    if unknown.is_empty() {
        diagnostics.push(Diagnostic::new(DiagnosticLevel::Ok, "", "All fields recognized"));
    }
    diagnostics.extend(unknown);
    diagnostics
}

/// Check loaded values: limits, endpoint credentials and prompt templates.
pub fn validate_values(config: &Config) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if config.agent.max_iterations == 0 {
        diagnostics.push(Diagnostic::error(
            "agent.max_iterations",
            "must be at least 1, otherwise every turn ends without calling the model",
        ));
    }
    if config.agent.max_tokens == 0 {
        diagnostics.push(Diagnostic::error("agent.max_tokens", "must be greater than 0"));
    }
    if !(0.0..=2.0).contains(&config.agent.temperature) {
        diagnostics.push(Diagnostic::error(
            "agent.temperature",
            format!("{} is outside 0.0..=2.0", config.agent.temperature),
        ));
    }
    if config.memory.turns_before_summary == 0 {
        diagnostics.push(Diagnostic::warn(
            "memory.turns_before_summary",
            "0 disables summarisation",
        ));
    }
    if config.memory.max_window_tokens == 0 {
        diagnostics.push(Diagnostic::warn(
            "memory.max_window_tokens",
            "0 summarises as soon as the turn threshold is passed",
        ));
    }
    if config.memory.summary_max_tokens == 0 {
        diagnostics.push(Diagnostic::error(
            "memory.summary_max_tokens",
            "must be greater than 0",
        ));
    }

    if config.provider.api_key.as_deref().map_or(true, str::is_empty) {
        diagnostics.push(Diagnostic::warn(
            "provider.api_key",
            "not set (REAGENT_PROVIDER_API_KEY or DEEPSEEK_API_KEY)",
        ));
    }
    if let Some(role) = &config.provider.observation_role {
        if parse_role(role).is_none() {
            diagnostics.push(Diagnostic::error(
                "provider.observation_role",
                format!("'{}' is not one of tool, user, system, assistant", role),
            ));
        }
    }

    if !(1..=10).contains(&config.tools.web_search_max_results) {
        diagnostics.push(Diagnostic::warn(
            "tools.web_search_max_results",
            "will be clamped to 1..=10",
        ));
    }

    match PromptTemplates::load(&config.prompts) {
        Ok(templates) => {
            for placeholder in ["{tools}", "{date}"] {
                if !templates.system.contains(placeholder) {
                    diagnostics.push(Diagnostic::warn(
                        "prompts.system_prompt_path",
                        format!("template has no {} placeholder", placeholder),
                    ));
                }
            }
            if !templates.summary.contains("{lines}") {
                diagnostics.push(Diagnostic::error(
                    "prompts.summary_prompt_path",
                    "template has no {lines} placeholder",
                ));
            }
        }
        Err(e) => diagnostics.push(Diagnostic::error("prompts", e.to_string())),
    }

    diagnostics
}

/// Parse an observation role name.
pub fn parse_role(name: &str) -> Option<Role> {
    match name.trim().to_ascii_lowercase().as_str() {
        "tool" => Some(Role::Tool),
        "user" => Some(Role::User),
        "system" => Some(Role::System),
        "assistant" => Some(Role::Assistant),
        _ => None,
    }
}
