//! # Weather Cache
//! In-memory cache of weather snapshots, keyed by a ~11 km grid cell
//! (coordinates rounded to one decimal place). Entries are "fresh" inside
//! the TTL and "stale but usable" up to 4× the TTL, the degradation window
//! the provider falls back to when the upstream API is down.
//!
//! Concurrent callers may race to populate a cell; last-writer-wins is fine
//! since both writers carry an equally valid upstream value.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::weather::WeatherSnapshot;

/// Stale entries remain usable up to this many TTLs after recording.
const STALE_TTL_FACTOR: u64 = 4;

/// Thread-safe grid-cell cache of weather snapshots.
#[derive(Debug)]
pub struct WeatherCache {
    inner: Mutex<HashMap<CellKey, Entry>>,
    ttl: Duration,
}

/// Coordinates in rounded tenths of a degree, so the key is `Eq + Hash`.
type CellKey = (i32, i32);

#[derive(Debug, Clone)]
struct Entry {
    snapshot: WeatherSnapshot,
    recorded_at_unix: u64,
}

fn cell_key(lat: f64, lng: f64) -> CellKey {
    ((lat * 10.0).round() as i32, (lng * 10.0).round() as i32)
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a snapshot for the cell containing `(lat, lng)`.
    /// If `ts_unix` is `None`, current time is used.
    pub fn record(&self, lat: f64, lng: f64, snapshot: WeatherSnapshot, ts_unix: Option<u64>) {
        let recorded_at_unix = ts_unix.unwrap_or_else(now_unix);
        let mut inner = self.inner.lock().expect("weather cache mutex poisoned");
        inner.insert(
            cell_key(lat, lng),
            Entry {
                snapshot,
                recorded_at_unix,
            },
        );
    }

    /// Snapshot younger than the TTL, if any.
    pub fn fresh(&self, lat: f64, lng: f64) -> Option<WeatherSnapshot> {
        self.lookup(lat, lng, self.ttl.as_secs())
    }

    /// Snapshot younger than 4× the TTL — expired but better than nothing.
    pub fn stale(&self, lat: f64, lng: f64) -> Option<WeatherSnapshot> {
        self.lookup(lat, lng, self.ttl.as_secs() * STALE_TTL_FACTOR)
    }

    fn lookup(&self, lat: f64, lng: f64, max_age_secs: u64) -> Option<WeatherSnapshot> {
        let inner = self.inner.lock().expect("weather cache mutex poisoned");
        let entry = inner.get(&cell_key(lat, lng))?;
        let age = now_unix().saturating_sub(entry.recorded_at_unix);
        (age <= max_age_secs).then(|| entry.snapshot.clone())
    }
}

/// Current UNIX time in seconds.
fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}
