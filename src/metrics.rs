//! Metric names for the scoring engine. The host process installs its own
//! recorder/exporter; this crate only emits through the `metrics` facade.

use metrics::describe_counter;

pub const SCORES_COMPUTED: &str = "zone_scores_computed_total";
pub const TIMEZONE_FALLBACKS: &str = "zone_timezone_fallbacks_total";
pub const WEATHER_FETCHES: &str = "zone_weather_fetches_total";
pub const WEATHER_FETCH_FAILURES: &str = "zone_weather_fetch_failures_total";
pub const WEATHER_CACHE_FRESH_HITS: &str = "zone_weather_cache_fresh_hits_total";
pub const WEATHER_CACHE_STALE_HITS: &str = "zone_weather_cache_stale_hits_total";

/// Register descriptions with the installed recorder. Optional; emitting
/// works without it.
pub fn describe() {
    describe_counter!(SCORES_COMPUTED, "Demand scores computed");
    describe_counter!(TIMEZONE_FALLBACKS, "Scores computed on UTC wall clock after an unknown IANA zone");
    describe_counter!(WEATHER_FETCHES, "Upstream weather fetch attempts");
    describe_counter!(WEATHER_FETCH_FAILURES, "Weather fetches that failed or timed out");
    describe_counter!(WEATHER_CACHE_FRESH_HITS, "Weather lookups served from the fresh cache");
    describe_counter!(WEATHER_CACHE_STALE_HITS, "Degraded weather lookups served from stale cache");
}
