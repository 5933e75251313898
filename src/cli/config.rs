//! Config check command handler.

use std::path::PathBuf;

use anyhow::{Context, Result};

use reagent::config::{validate_config, validate_values, Config, DiagnosticLevel};

use super::common::load_config;
use super::ConfigAction;

/// Validate configuration file.
pub(crate) fn cmd_config(action: ConfigAction, config_path: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Check => {
            let path = config_path.clone().unwrap_or_else(Config::path);
            println!("Config file: {}", path.display());

            let mut diagnostics = Vec::new();
            if path.exists() {
                let content =
                    std::fs::read_to_string(&path).context("Failed to read config file")?;
                let raw: serde_json::Value = match serde_json::from_str(&content) {
                    Ok(v) => v,
                    Err(e) => {
                        println!("[ERROR] Invalid JSON: {}", e);
                        std::process::exit(1);
                    }
                };
                diagnostics.extend(validate_config(&raw));
            } else {
                println!("[OK] No config file found (using defaults)");
            }

            let config = load_config(config_path.as_deref())?;
            diagnostics.extend(validate_values(&config));
            for diag in &diagnostics {
                println!("{}", diag);
            }

            let errors = diagnostics
                .iter()
                .filter(|d| d.level == DiagnosticLevel::Error)
                .count();
            let warnings = diagnostics
                .iter()
                .filter(|d| d.level == DiagnosticLevel::Warn)
                .count();

            if errors == 0 && warnings == 0 {
                println!("\nConfiguration looks good!");
            } else {
                println!("\nFound {} error(s), {} warning(s)", errors, warnings);
            }
            if errors > 0 {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
