//! # Score Labeler
//! Maps a 0–100 demand score to the label drivers see on the zone card.
//! Pure step function; band lower bounds are inclusive.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLabel {
    Hot,
    Busy,
    Moderate,
    Slow,
    Dead,
}

impl DemandLabel {
    pub fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Hot,
            60..=79 => Self::Busy,
            40..=59 => Self::Moderate,
            20..=39 => Self::Slow,
            _ => Self::Dead,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Busy => "Busy",
            Self::Moderate => "Moderate",
            Self::Slow => "Slow",
            Self::Dead => "Dead",
        }
    }
}

impl std::fmt::Display for DemandLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
