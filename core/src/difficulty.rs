use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Mine density tier, picked by the player before a board is created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// One mine for every `divisor` cells, rounded up.
    pub const fn divisor(self) -> CellCount {
        match self {
            Self::Easy => 10,
            Self::Medium => 8,
            Self::Hard => 6,
        }
    }

    /// `ceil(size² / divisor)`, zero for degenerate sizes.
    pub const fn mine_count(self, size: Coord) -> CellCount {
        square(size).div_ceil(self.divisor())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::Configuration(ConfigError::UnknownDifficulty))
    }
}
