//! Difficulty tier

use psd_common::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest total score still graded Easy
pub const EASY_MAX_SCORE: u32 = 2;

/// Highest total score still graded Medium
pub const MEDIUM_MAX_SCORE: u32 = 5;

/// Difficulty tier of a score document
///
/// The display form doubles as the tier directory name in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    /// Map a total heuristic score onto a tier
    ///
    /// - `score <= 2` → Easy
    /// - `3..=5` → Medium
    /// - `score >= 6` → Hard
    pub fn from_score(score: u32) -> Self {
        if score <= EASY_MAX_SCORE {
            Tier::Easy
        } else if score <= MEDIUM_MAX_SCORE {
            Tier::Medium
        } else {
            Tier::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    /// Case-insensitive, so `easy` and `EASY` folders are recognized too
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown difficulty tier: {}", s)))
    }
}
