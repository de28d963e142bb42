//! # Weather Provider Config
//! Env-driven configuration for the weather signal. A missing API key is not
//! an error: the provider comes up disabled and every lookup degrades to the
//! neutral default without touching the network.

use std::time::Duration;

/// OpenWeather current-conditions endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
const ENV_BASE_URL: &str = "OPENWEATHER_BASE_URL";

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// `None` disables outbound calls entirely.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Hard budget for one fetch attempt; doubles as the cancellation mechanism.
    pub fetch_timeout: Duration,
    /// Freshness window for cached snapshots.
    pub cache_ttl: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl WeatherConfig {
    /// Load from the environment (`.env` honored):
    /// `OPENWEATHER_API_KEY`, optional `OPENWEATHER_BASE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            base_url,
            ..Self::default()
        }
    }
}
