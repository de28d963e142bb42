// src/lib.rs
// Public library surface for integration tests (and the host API layer).

pub mod cache;
pub mod config;
pub mod engine;
pub mod label;
pub mod meal_windows;
pub mod metrics;
pub mod score;
pub mod timectx;
pub mod weather;

// ---- Re-exports for stable public API ----
pub use crate::engine::{DemandEngine, ScoreRequest, ZoneScore};
pub use crate::label::DemandLabel;
pub use crate::score::{
    calculate_score, calculate_score_with_weather, ScoreFactors, ScoreResult,
    NEUTRAL_WEATHER_BOOST,
};
pub use crate::weather::{WeatherFetcher, WeatherProvider, WeatherSnapshot};
