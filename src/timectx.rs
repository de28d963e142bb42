//! # Time Context
//! Converts a UTC instant plus an IANA zone name into the local wall-clock
//! facts the calculator needs: fractional hour, day of week, weekend flag.
//!
//! An unknown zone name is not an error for callers: scoring falls back to
//! the instant's UTC wall-clock components. The fallback is a deliberate,
//! visible code path (`try_localize` returns a `Result`), not a catch-all.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use metrics::counter;
use tracing::debug;

use crate::metrics::TIMEZONE_FALLBACKS;

/// Unknown IANA zone name. Carries the offending string for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimezone {
    pub name: String,
}

impl std::fmt::Display for InvalidTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown IANA timezone: {:?}", self.name)
    }
}

impl std::error::Error for InvalidTimezone {}

/// Local wall-clock context for one scoring call. Derived once, then discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeContext {
    /// Fractional local hour in [0, 24): `hour + minute/60 + second/3600`.
    pub hour: f64,
    /// Day of week, 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
    pub is_weekend: bool,
}

/// Convert `instant` to local wall-clock time in `timezone`.
pub fn try_localize(
    instant: DateTime<Utc>,
    timezone: &str,
) -> Result<NaiveDateTime, InvalidTimezone> {
    let tz: Tz = timezone.parse().map_err(|_| InvalidTimezone {
        name: timezone.to_string(),
    })?;
    Ok(tz.from_utc_datetime(&instant.naive_utc()).naive_local())
}

impl TimeContext {
    /// Total: an unknown zone scores on the instant's UTC components.
    pub fn resolve(instant: DateTime<Utc>, timezone: &str) -> Self {
        let local = try_localize(instant, timezone).unwrap_or_else(|err| {
            debug!(zone = %err.name, "unknown IANA zone, scoring on UTC wall clock");
            counter!(TIMEZONE_FALLBACKS).increment(1);
            instant.naive_utc()
        });

        let hour = f64::from(local.hour())
            + f64::from(local.minute()) / 60.0
            + f64::from(local.second()) / 3600.0;
        let day_of_week = local.weekday().num_days_from_sunday();

        Self {
            hour,
            day_of_week,
            is_weekend: day_of_week == 0 || day_of_week == 6,
        }
    }
}
