//! # Demand Engine
//! Composition root: resolves request defaults, consults the weather
//! provider when coordinates are present, and feeds the boost into the pure
//! calculator. This is the whole in-process surface the host API layer
//! consumes; it never returns an error.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::label::DemandLabel;
use crate::metrics::SCORES_COMPUTED;
use crate::score::{calculate_score_with_weather, ScoreFactors, NEUTRAL_WEATHER_BOOST};
use crate::weather::WeatherProvider;

/// What the host layer hands us. All fields optional with explicit defaults:
/// `timestamp` → now, `timezone` → "UTC", `coords` → no weather lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreRequest {
    pub timestamp: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    /// `(lat, lng)` in degrees.
    pub coords: Option<(f64, f64)>,
}

/// The JSON shape the host API exposes per zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneScore {
    pub score: u8,
    pub label: DemandLabel,
    pub factors: ScoreFactors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_description: Option<String>,
}

pub struct DemandEngine {
    weather: WeatherProvider,
}

impl DemandEngine {
    pub fn new(weather: WeatherProvider) -> Self {
        Self { weather }
    }

    /// Engine wired from environment config (disabled weather if no key).
    pub fn from_env() -> Self {
        Self::new(WeatherProvider::from_env())
    }

    /// Score a zone at a moment. Weather is consulted only when coordinates
    /// are given; without them the neutral boost keeps the result pure.
    pub async fn score_at(&self, request: &ScoreRequest) -> ZoneScore {
        let instant = request.timestamp.unwrap_or_else(Utc::now);
        let timezone = request.timezone.as_deref().unwrap_or("UTC");

        let (weather_boost, weather_description) = match request.coords {
            Some((lat, lng)) => {
                let snapshot = self.weather.score_at(lat, lng).await;
                (snapshot.score, Some(snapshot.description))
            }
            None => (NEUTRAL_WEATHER_BOOST, None),
        };

        let result = calculate_score_with_weather(instant, timezone, weather_boost);
        counter!(SCORES_COMPUTED).increment(1);

        ZoneScore {
            score: result.score,
            label: DemandLabel::for_score(result.score),
            factors: result.factors,
            weather_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use chrono::TimeZone;

    fn engine_without_weather() -> DemandEngine {
        DemandEngine::new(WeatherProvider::disabled(&WeatherConfig::default()))
    }

    #[tokio::test]
    async fn defaults_are_now_and_utc() {
        let engine = engine_without_weather();
        let out = engine.score_at(&ScoreRequest::default()).await;
        assert!(out.score <= 100);
        assert_eq!(out.weather_description, None);
        assert_eq!(out.label, DemandLabel::for_score(out.score));
    }

    #[tokio::test]
    async fn no_coords_means_no_weather_lookup() {
        let engine = engine_without_weather();
        let req = ScoreRequest {
            timestamp: Some(Utc.with_ymd_and_hms(2026, 1, 6, 19, 0, 0).unwrap()),
            timezone: Some("UTC".to_string()),
            coords: None,
        };
        let out = engine.score_at(&req).await;
        assert_eq!(out.factors.weather_boost, 20.0);
        assert_eq!(out.score, 71);
        assert_eq!(out.label, DemandLabel::Busy);
    }

    #[tokio::test]
    async fn disabled_provider_reports_unavailable_weather() {
        let engine = engine_without_weather();
        let req = ScoreRequest {
            timestamp: Some(Utc.with_ymd_and_hms(2026, 1, 6, 19, 0, 0).unwrap()),
            timezone: None,
            coords: Some((41.88, -87.63)),
        };
        let out = engine.score_at(&req).await;
        assert_eq!(out.weather_description.as_deref(), Some("Weather unavailable"));
        assert_eq!(out.factors.weather_boost, 20.0);
    }

    #[tokio::test]
    async fn zone_score_serializes_for_the_api() {
        let engine = engine_without_weather();
        let req = ScoreRequest {
            timestamp: Some(Utc.with_ymd_and_hms(2026, 1, 6, 19, 0, 0).unwrap()),
            timezone: Some("UTC".to_string()),
            coords: None,
        };
        let out = engine.score_at(&req).await;
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["score"], serde_json::json!(71));
        assert_eq!(v["label"], serde_json::json!("Busy"));
        assert_eq!(v["factors"]["peakHourBoost"], serde_json::json!(100.0));
        assert!(v.get("weatherDescription").is_none());
    }
}
