//! # Weather Signal Provider
//! Supplies a 0–100 weather-severity boost for a coordinate, from the
//! OpenWeather current-conditions API behind a grid-cell cache.
//!
//! This provider never raises to its caller. Every failure path — missing
//! credential, timeout, non-2xx, malformed payload — degrades to a stale
//! cached value or the neutral default. A transient weather outage must
//! never block or corrupt the demand score.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::WeatherCache;
use crate::config::WeatherConfig;
use crate::metrics::{
    WEATHER_CACHE_FRESH_HITS, WEATHER_CACHE_STALE_HITS, WEATHER_FETCHES, WEATHER_FETCH_FAILURES,
};
use crate::score::NEUTRAL_WEATHER_BOOST;

/// Severity boost plus a human-readable condition summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// 0–100; higher means demand-driving weather.
    pub score: u8,
    pub description: String,
}

impl WeatherSnapshot {
    /// The neutral default returned whenever no signal can be obtained.
    pub fn unavailable() -> Self {
        Self {
            score: NEUTRAL_WEATHER_BOOST,
            description: "Weather unavailable".to_string(),
        }
    }
}

/// Raw upstream observation, before severity mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    /// OpenWeather condition code (2xx thunderstorm .. 8xx clear/clouds).
    pub condition_code: u32,
    pub temp_f: f64,
    pub description: String,
}

/// Low-level fetcher: does a *real* remote call. Separated so the provider's
/// cache/fallback policy is testable against mocks.
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch(&self, lat: f64, lng: f64) -> Result<WeatherObservation>;
    /// Fetcher name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Severity from condition code and temperature. Bands are mutually
/// exclusive, worst condition first; clear/clouds is the 20 baseline.
pub fn severity_score(observation: &WeatherObservation) -> u8 {
    let mut score: u8 = match observation.condition_code {
        600..=699 => 70, // snow
        200..=299 => 60, // thunderstorm
        500..=599 => 50, // rain
        300..=399 => 35, // drizzle
        700..=799 => 25, // fog/mist/atmosphere
        _ => 20,         // clear/clouds baseline
    };
    if observation.temp_f < 32.0 || observation.temp_f > 95.0 {
        score = score.saturating_add(20);
    }
    score.min(100)
}

/// OpenWeather fetcher. Imperial units so the extremity thresholds read in °F.
pub struct OpenWeatherFetcher {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherFetcher {
    pub fn new(api_key: String, config: &WeatherConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("zone-demand-scorer/0.1")
            .connect_timeout(Duration::from_secs(2))
            .timeout(config.fetch_timeout)
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn fetch(&self, lat: f64, lng: f64) -> Result<WeatherObservation> {
        #[derive(Deserialize)]
        struct Resp {
            weather: Vec<Condition>,
            main: MainPart,
        }
        #[derive(Deserialize)]
        struct Condition {
            id: u32,
            description: String,
        }
        #[derive(Deserialize)]
        struct MainPart {
            temp: f64,
        }

        let url = format!("{}/weather", self.base_url);
        let resp: Resp = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("units", "imperial".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .context("weather request failed")?
            .error_for_status()
            .context("weather API returned an error status")?
            .json()
            .await
            .context("malformed weather payload")?;

        let condition = resp
            .weather
            .first()
            .context("weather payload has no conditions")?;
        Ok(WeatherObservation {
            condition_code: condition.id,
            temp_f: resp.main.temp,
            description: condition.description.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}

/// Caching, degrading wrapper around a [`WeatherFetcher`].
///
/// One instance per process; share it by reference or clone the `Arc` it
/// holds internally. Concurrent misses on one cell are not deduplicated —
/// both callers fetch and the last write wins, which is harmless because the
/// value is idempotent.
pub struct WeatherProvider {
    fetcher: Option<Arc<dyn WeatherFetcher>>,
    cache: WeatherCache,
    fetch_timeout: Duration,
}

impl WeatherProvider {
    /// Build from config: a present API key enables the OpenWeather fetcher,
    /// a missing one yields a disabled provider.
    pub fn from_config(config: &WeatherConfig) -> Self {
        match &config.api_key {
            Some(key) => Self::with_fetcher(
                Arc::new(OpenWeatherFetcher::new(key.clone(), config)),
                config,
            ),
            None => {
                debug!("no weather API key configured, provider disabled");
                Self::disabled(config)
            }
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(&WeatherConfig::from_env())
    }

    /// Provider with a custom fetcher (tests, alternative upstreams).
    pub fn with_fetcher(fetcher: Arc<dyn WeatherFetcher>, config: &WeatherConfig) -> Self {
        Self {
            fetcher: Some(fetcher),
            cache: WeatherCache::new(config.cache_ttl),
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// Provider that never fetches; every lookup is the neutral default.
    pub fn disabled(config: &WeatherConfig) -> Self {
        Self {
            fetcher: None,
            cache: WeatherCache::new(config.cache_ttl),
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// Cache access for tests that need to pre-age entries.
    #[cfg(test)]
    pub(crate) fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Weather severity for a coordinate. At most one upstream attempt, hard
    /// timeout, never an error: fresh cache → fetch → stale cache → neutral.
    pub async fn score_at(&self, lat: f64, lng: f64) -> WeatherSnapshot {
        if let Some(hit) = self.cache.fresh(lat, lng) {
            counter!(WEATHER_CACHE_FRESH_HITS).increment(1);
            return hit;
        }

        let Some(fetcher) = &self.fetcher else {
            return WeatherSnapshot::unavailable();
        };

        counter!(WEATHER_FETCHES).increment(1);
        match tokio::time::timeout(self.fetch_timeout, fetcher.fetch(lat, lng)).await {
            Ok(Ok(observation)) => {
                let snapshot = WeatherSnapshot {
                    score: severity_score(&observation),
                    description: observation.description,
                };
                self.cache.record(lat, lng, snapshot.clone(), None);
                snapshot
            }
            Ok(Err(err)) => {
                warn!(fetcher = fetcher.name(), error = %err, "weather fetch failed");
                self.degraded(lat, lng)
            }
            Err(_) => {
                warn!(fetcher = fetcher.name(), "weather fetch timed out");
                self.degraded(lat, lng)
            }
        }
    }

    fn degraded(&self, lat: f64, lng: f64) -> WeatherSnapshot {
        counter!(WEATHER_FETCH_FAILURES).increment(1);
        match self.cache.stale(lat, lng) {
            Some(old) => {
                counter!(WEATHER_CACHE_STALE_HITS).increment(1);
                old
            }
            None => WeatherSnapshot::unavailable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bands() {
        let obs = |code, temp| WeatherObservation {
            condition_code: code,
            temp_f: temp,
            description: String::new(),
        };
        assert_eq!(severity_score(&obs(600, 50.0)), 70); // snow
        assert_eq!(severity_score(&obs(211, 50.0)), 60); // thunderstorm
        assert_eq!(severity_score(&obs(501, 50.0)), 50); // rain
        assert_eq!(severity_score(&obs(301, 50.0)), 35); // drizzle
        assert_eq!(severity_score(&obs(741, 50.0)), 25); // fog
        assert_eq!(severity_score(&obs(800, 50.0)), 20); // clear
        assert_eq!(severity_score(&obs(803, 50.0)), 20); // clouds
    }

    #[test]
    fn temperature_extremes_add_twenty() {
        let obs = |code, temp| WeatherObservation {
            condition_code: code,
            temp_f: temp,
            description: String::new(),
        };
        assert_eq!(severity_score(&obs(800, 20.0)), 40); // freezing, clear
        assert_eq!(severity_score(&obs(800, 100.0)), 40); // scorching, clear
        assert_eq!(severity_score(&obs(600, 10.0)), 90); // snow + freezing
        // Boundary values are not extreme.
        assert_eq!(severity_score(&obs(800, 32.0)), 20);
        assert_eq!(severity_score(&obs(800, 95.0)), 20);
    }

    #[test]
    fn severity_never_exceeds_100() {
        for code in [200u32, 300, 500, 600, 700, 800] {
            for temp in [-20.0, 50.0, 120.0] {
                let s = severity_score(&WeatherObservation {
                    condition_code: code,
                    temp_f: temp,
                    description: String::new(),
                });
                assert!(s <= 100);
            }
        }
    }

    #[test]
    fn unavailable_snapshot_is_the_neutral_default() {
        let snap = WeatherSnapshot::unavailable();
        assert_eq!(snap.score, 20);
        assert_eq!(snap.description, "Weather unavailable");
    }

    // ---- provider policy, with a scripted fetcher ----

    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedFetcher {
        result: Result<WeatherObservation, ()>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn ok(observation: WeatherObservation) -> Self {
            Self {
                result: Ok(observation),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err(()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherFetcher for ScriptedFetcher {
        async fn fetch(&self, _lat: f64, _lng: f64) -> Result<WeatherObservation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(obs) => Ok(obs.clone()),
                Err(()) => Err(anyhow::anyhow!("upstream down")),
            }
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn rainy() -> WeatherObservation {
        WeatherObservation {
            condition_code: 501,
            temp_f: 50.0,
            description: "moderate rain".to_string(),
        }
    }

    fn now_unix() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    #[tokio::test]
    async fn success_is_cached_and_reused() {
        let fetcher = Arc::new(ScriptedFetcher::ok(rainy()));
        let provider =
            WeatherProvider::with_fetcher(fetcher.clone(), &WeatherConfig::default());

        let first = provider.score_at(41.88, -87.63).await;
        assert_eq!(first.score, 50);
        assert_eq!(first.description, "moderate rain");

        let second = provider.score_at(41.88, -87.63).await;
        assert_eq!(second, first);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1, "second call must hit cache");
    }

    #[tokio::test]
    async fn failure_without_cache_degrades_to_neutral() {
        let provider = WeatherProvider::with_fetcher(
            Arc::new(ScriptedFetcher::failing()),
            &WeatherConfig::default(),
        );
        let snap = provider.score_at(41.88, -87.63).await;
        assert_eq!(snap, WeatherSnapshot::unavailable());
    }

    #[tokio::test]
    async fn failure_with_expired_entry_serves_stale() {
        let provider = WeatherProvider::with_fetcher(
            Arc::new(ScriptedFetcher::failing()),
            &WeatherConfig::default(),
        );
        let stale = WeatherSnapshot {
            score: 70,
            description: "snow".to_string(),
        };
        // 20 minutes old: past the 15-minute TTL, inside the 4x window.
        provider
            .cache()
            .record(41.88, -87.63, stale.clone(), Some(now_unix() - 20 * 60));

        let snap = provider.score_at(41.88, -87.63).await;
        assert_eq!(snap, stale);
    }

    #[tokio::test]
    async fn failure_with_ancient_entry_degrades_to_neutral() {
        let provider = WeatherProvider::with_fetcher(
            Arc::new(ScriptedFetcher::failing()),
            &WeatherConfig::default(),
        );
        provider.cache().record(
            41.88,
            -87.63,
            WeatherSnapshot {
                score: 70,
                description: "snow".to_string(),
            },
            Some(now_unix() - 2 * 3600),
        );

        let snap = provider.score_at(41.88, -87.63).await;
        assert_eq!(snap, WeatherSnapshot::unavailable());
    }

    #[tokio::test]
    async fn slow_fetch_is_cut_off_by_the_timeout() {
        struct SlowFetcher;

        #[async_trait]
        impl WeatherFetcher for SlowFetcher {
            async fn fetch(&self, _lat: f64, _lng: f64) -> Result<WeatherObservation> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(WeatherObservation {
                    condition_code: 800,
                    temp_f: 70.0,
                    description: "clear sky".to_string(),
                })
            }

            fn name(&self) -> &'static str {
                "slow"
            }
        }

        let config = WeatherConfig {
            fetch_timeout: Duration::from_millis(50),
            ..WeatherConfig::default()
        };
        let provider = WeatherProvider::with_fetcher(Arc::new(SlowFetcher), &config);
        let snap = provider.score_at(41.88, -87.63).await;
        assert_eq!(snap, WeatherSnapshot::unavailable());
    }

    #[tokio::test]
    async fn disabled_provider_never_fetches() {
        let provider = WeatherProvider::disabled(&WeatherConfig::default());
        assert_eq!(
            provider.score_at(41.88, -87.63).await,
            WeatherSnapshot::unavailable()
        );
    }
}
