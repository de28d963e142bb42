//! # Meal Windows
//! Time-of-day demand boost built from a small ordered table of windows,
//! all evaluated by one clamped-linear interpolation routine so the boundary
//! math stays symmetric and testable per segment.
//!
//! Each smoothed window ramps over its own first and last 30 minutes, from
//! and to the neighbouring segment's value, so the curve has no jump at any
//! window edge. The full table score is only reached in a window's middle
//! portion. Late night is flat and unsmoothed.

/// Boost outside every named window.
pub const OFF_PEAK_BOOST: f64 = 20.0;

/// Length of the entry/exit ramp inside a smoothed window, in hours.
const RAMP_HOURS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowKind {
    Breakfast,
    Lunch,
    Dinner,
    LateNight,
}

struct MealWindow {
    kind: WindowKind,
    /// Local-hour bounds, half-open `[start, end)`.
    start: f64,
    end: f64,
    /// Score in the window's middle portion.
    level: f64,
    /// Value the exit ramp lands on (the next segment's score).
    exit_to: f64,
    smooth: bool,
}

/// Ordered, non-overlapping; gaps are off-peak.
const WINDOWS: [MealWindow; 4] = [
    MealWindow {
        kind: WindowKind::Breakfast,
        start: 7.0,
        end: 10.0,
        level: 40.0,
        exit_to: OFF_PEAK_BOOST,
        smooth: true,
    },
    MealWindow {
        kind: WindowKind::Lunch,
        start: 11.0,
        end: 14.0,
        level: 80.0,
        exit_to: OFF_PEAK_BOOST,
        smooth: true,
    },
    MealWindow {
        kind: WindowKind::Dinner,
        start: 17.0,
        end: 21.0,
        level: 100.0,
        // Dinner hands over to late night, keeping 21:00 continuous.
        exit_to: 50.0,
        smooth: true,
    },
    MealWindow {
        kind: WindowKind::LateNight,
        start: 21.0,
        end: 24.0,
        level: 50.0,
        exit_to: 50.0,
        smooth: false,
    },
];

/// Clamped linear interpolation of `[from, to]` over `[start, end]`.
fn lerp(from: f64, to: f64, start: f64, end: f64, h: f64) -> f64 {
    let t = ((h - start) / (end - start)).clamp(0.0, 1.0);
    from + (to - from) * t
}

/// Meal-time boost for a fractional local hour in [0, 24). Output in [20, 100].
///
/// Weekends multiply breakfast by 1.1 and dinner by 1.2 (ramps included),
/// capped at 100, applied after the window/ramp value is computed.
pub fn meal_time_boost(hour: f64, is_weekend: bool) -> f64 {
    let Some(w) = WINDOWS.iter().find(|w| hour >= w.start && hour < w.end) else {
        return OFF_PEAK_BOOST;
    };

    let raw = if !w.smooth {
        w.level
    } else if hour < w.start + RAMP_HOURS {
        lerp(OFF_PEAK_BOOST, w.level, w.start, w.start + RAMP_HOURS, hour)
    } else if hour >= w.end - RAMP_HOURS {
        lerp(w.level, w.exit_to, w.end - RAMP_HOURS, w.end, hour)
    } else {
        w.level
    };
    // Rounded at evaluation time; the weekend multiplier scales the rounded value.
    let raw = raw.round();

    let boosted = if is_weekend {
        match w.kind {
            WindowKind::Breakfast => raw * 1.1,
            WindowKind::Dinner => raw * 1.2,
            WindowKind::Lunch | WindowKind::LateNight => raw,
        }
    } else {
        raw
    };

    boosted.min(100.0).round()
}
