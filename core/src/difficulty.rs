use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells kept mine-free around the first click in the worst case (an interior cell).
pub const FIRST_CLICK_ZONE: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validated config. Mines are capped so that the first-click zone can always stay clear.
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        let max = Self::max_mines(size);
        if mines > max {
            return Err(GameError::TooManyMines { max });
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn max_mines(size: Coord) -> CellCount {
        square(size).saturating_sub(FIRST_CLICK_ZONE)
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Small,
    Medium,
    Large,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Small => GameConfig::new_unchecked(8, 10),
            Medium => GameConfig::new_unchecked(10, 15),
            Large => GameConfig::new_unchecked(12, 22),
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Small => "small",
            Medium => "medium",
            Large => "large",
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
        let s = s.trim();
        if s.eq_ignore_ascii_case("small") || s.eq_ignore_ascii_case("easy") {
            Ok(Self::Small)
        } else if s.eq_ignore_ascii_case("medium") {
            Ok(Self::Medium)
        } else if s.eq_ignore_ascii_case("large") || s.eq_ignore_ascii_case("hard") {
            Ok(Self::Large)
        } else {
            Err(GameError::UnknownDifficulty)
        }
    }
}
