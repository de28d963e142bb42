//! # Score Calculator
//! Pure, testable logic that maps `(instant, timezone, weather boost)` to a
//! 0–100 demand score plus its contributing factors. No I/O, no clock reads,
//! suitable for unit tests and offline evaluation: two calls with identical
//! inputs return identical results.
//!
//! Policy: five factors (meal window, peak hour, day of week, weather, base)
//! blended by fixed weights, clamped to [0, 100] and rounded half-up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meal_windows::meal_time_boost;
use crate::timectx::TimeContext;

/// Weather boost used when no weather signal is available.
pub const NEUTRAL_WEATHER_BOOST: u8 = 20;

/// Constant floor every score builds on.
pub const BASE_SCORE: f64 = 50.0;

// Blend weights; must sum to 1.0 (asserted in tests).
const W_MEAL: f64 = 0.25;
const W_PEAK: f64 = 0.25;
const W_WEEKEND: f64 = 0.15;
const W_WEATHER: f64 = 0.15;
const W_BASE: f64 = 0.20;

/// The five contributions behind a score. Always fully populated, never a
/// partial result; values are the pre-blend reals, not re-clamped afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFactors {
    pub meal_time_boost: f64,
    pub peak_hour_boost: f64,
    pub weekend_boost: f64,
    pub weather_boost: f64,
    pub base_score: f64,
}

/// Final demand score with its explainability payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Rounded, clamped weighted sum of `factors`, in [0, 100].
    pub score: u8,
    pub factors: ScoreFactors,
}

/// Score with the neutral weather default. Identical to passing
/// [`NEUTRAL_WEATHER_BOOST`] explicitly.
pub fn calculate_score(instant: DateTime<Utc>, timezone: &str) -> ScoreResult {
    calculate_score_with_weather(instant, timezone, NEUTRAL_WEATHER_BOOST)
}

/// Score a moment in a zone's local time, blending in an externally sourced
/// weather boost. Total: an unknown timezone scores on UTC wall clock, and
/// no input makes this panic or return NaN.
pub fn calculate_score_with_weather(
    instant: DateTime<Utc>,
    timezone: &str,
    weather_boost: u8,
) -> ScoreResult {
    let ctx = TimeContext::resolve(instant, timezone);

    let factors = ScoreFactors {
        meal_time_boost: meal_time_boost(ctx.hour, ctx.is_weekend),
        peak_hour_boost: peak_hour_boost(ctx.hour),
        weekend_boost: weekend_boost(ctx.day_of_week),
        weather_boost: f64::from(weather_boost.min(100)),
        base_score: BASE_SCORE,
    };

    let blended = factors.meal_time_boost * W_MEAL
        + factors.peak_hour_boost * W_PEAK
        + factors.weekend_boost * W_WEEKEND
        + factors.weather_boost * W_WEATHER
        + factors.base_score * W_BASE;

    ScoreResult {
        score: blended.clamp(0.0, 100.0).round() as u8,
        factors,
    }
}

/// Rush-hour step function on the whole local hour. No smoothing: order flow
/// shifts by the hour, unlike appetite.
fn peak_hour_boost(hour: f64) -> f64 {
    match hour.floor() as u32 {
        11..=13 => 90.0,  // lunch rush
        17..=20 => 100.0, // dinner rush
        7..=9 => 70.0,    // breakfast
        21..=22 => 50.0,  // late night
        23 | 0..=5 => 10.0, // dead hours
        _ => 40.0,
    }
}

/// Day-of-week step: weekends and Friday nights order more.
fn weekend_boost(day_of_week: u32) -> f64 {
    match day_of_week {
        0 => 80.0, // Sunday
        6 => 90.0, // Saturday
        5 => 70.0, // Friday
        _ => 50.0,
    }
}
