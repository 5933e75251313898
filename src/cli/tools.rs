//! Tools CLI command handler.

use std::path::PathBuf;

use anyhow::Result;
use reagent::config::Config;
use reagent::tools::default_registry;

use super::common::load_config;

/// Tools that only register when a key is configured, with the setup hint.
const KEYED_TOOLS: &[(&str, &str)] = &[
    (
        "websearch",
        "Set tools.web_search_api_key or REAGENT_TOOLS_WEB_SEARCH_API_KEY / TAVILY_API_KEY",
    ),
    (
        "weather",
        "Set tools.weather_api_key or REAGENT_TOOLS_WEATHER_API_KEY / OPENWEATHER_API_KEY",
    ),
];

/// Print the listing the model sees, then the tools still needing setup.
pub(crate) fn cmd_tools(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let registry = default_registry(&config.tools);

    println!("{}", registry.describe_all());

    let missing = missing_tools(&config);
    if !missing.is_empty() {
        println!();
        println!("Not configured:");
        for (name, hint) in missing {
            println!("  - {} ({})", name, hint);
        }
    }
    Ok(())
}

fn missing_tools(config: &Config) -> Vec<(&'static str, &'static str)> {
    let registry = default_registry(&config.tools);
    KEYED_TOOLS
        .iter()
        .filter(|(name, _)| !registry.has(name))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tools_without_keys() {
        let names: Vec<&str> = missing_tools(&Config::default())
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["websearch", "weather"]);
    }

    #[test]
    fn test_missing_tools_with_weather_key() {
        let mut config = Config::default();
        config.tools.weather_api_key = Some("key".to_string());
        let names: Vec<&str> = missing_tools(&config).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["websearch"]);
    }
}
