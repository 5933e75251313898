//! Current weather lookup backed by the OpenWeather API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ReagentError, Result};

use super::{http_client, Tool, ToolOutput};

const OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const WEATHER_USER_AGENT: &str = concat!("reagent/", env!("CARGO_PKG_VERSION"));

/// Weather tool: takes a city name, reports temperature, conditions,
/// humidity and wind speed in metric units.
pub struct WeatherTool {
    api_key: String,
    api_url: String,
    client: Client,
}

impl WeatherTool {
    /// Create a new weather tool.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_url: OPENWEATHER_API_URL.to_string(),
            client: http_client(WEATHER_USER_AGENT),
        }
    }

    /// Point the tool at a different endpoint.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

fn format_report(city: &str, data: &WeatherResponse) -> String {
    let description = data
        .weather
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("unknown");
    format!(
        "The temperature in {} is {}°C. The weather is {}. The humidity is {}%. The wind speed is {} m/s.",
        city, data.main.temp, description, data.main.humidity, data.wind.speed
    )
}

fn failure_text(city: &str) -> String {
    format!("Failed to fetch weather data for {}.", city)
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Fetches weather information for a given city. Input is only the name of the city. e.g. 'London'."
    }

    async fn invoke(&self, query: &str) -> Result<ToolOutput> {
        let city = query.trim();
        if city.is_empty() {
            return Err(ReagentError::Tool("City cannot be empty.".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(ReagentError::Tool(
                "OpenWeather API key is not configured".to_string(),
            ));
        }

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("q", city), ("appid", &self.api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ReagentError::Tool(format!("Weather request failed: {}", e)))?;

        if !response.status().is_success() {
            debug!(city = city, status = %response.status(), "Weather lookup rejected");
            return Ok(ToolOutput::text(failure_text(city)));
        }

        let data: WeatherResponse = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                debug!(city = city, error = %e, "Unexpected weather payload");
                return Ok(ToolOutput::text(failure_text(city)));
            }
        };

        Ok(ToolOutput::text(format_report(city, &data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> WeatherResponse {
        serde_json::from_str(
            r#"{
                "main": {"temp": 18.5, "humidity": 72},
                "weather": [{"description": "light rain"}],
                "wind": {"speed": 4.1}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_weather_tool_identity() {
        let tool = WeatherTool::new("key");
        assert_eq!(tool.name(), "weather");
        assert!(tool.description().contains("e.g. 'London'"));
    }

    #[test]
    fn test_format_report() {
        let text = format_report("Paris", &sample_response());
        assert_eq!(
            text,
            "The temperature in Paris is 18.5°C. The weather is light rain. The humidity is 72%. The wind speed is 4.1 m/s."
        );
    }

    #[test]
    fn test_format_report_without_condition() {
        let mut data = sample_response();
        data.weather.clear();
        assert!(format_report("Oslo", &data).contains("The weather is unknown."));
    }

    #[test]
    fn test_failure_text() {
        assert_eq!(failure_text("Atlantis"), "Failed to fetch weather data for Atlantis.");
    }

    #[tokio::test]
    async fn test_empty_city_rejected() {
        let tool = WeatherTool::new("key");
        let err = tool.invoke("   ").await.unwrap_err();
        assert!(matches!(err, ReagentError::Tool(_)));
        assert!(err.to_string().contains("City cannot be empty."));
    }

    #[tokio::test]
    async fn test_missing_api_key_rejected() {
        let tool = WeatherTool::new("");
        let err = tool.invoke("London").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let tool = WeatherTool::new("key").with_base_url("http://localhost:9000/weather/");
        assert_eq!(tool.api_url, "http://localhost:9000/weather");
    }
}
