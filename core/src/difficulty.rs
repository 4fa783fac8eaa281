use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Custom,
}

/// Named grid size and mine density.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    /// `(rows, cols)`
    pub size: Coord2,
    /// Fraction of cells holding a mine.
    pub ratio: f64,
}

impl Preset {
    /// `round(rows * cols * ratio)`, halves away from zero.
    pub fn mine_count(&self) -> CellCount {
        let exact = f64::from(mult(self.size.0, self.size.1)) * self.ratio;
        (exact + 0.5) as CellCount
    }
}

pub static PRESETS: [Preset; 4] = [
    Preset {
        name: "Easy",
        size: (9, 9),
        ratio: 0.110,
    },
    Preset {
        name: "Medium",
        size: (16, 16),
        ratio: 0.156,
    },
    Preset {
        name: "Hard",
        size: (16, 30),
        ratio: 0.206,
    },
    Preset {
        name: "Expert",
        size: (20, 30),
        ratio: 0.241,
    },
];

impl Difficulty {
    /// Difficulties that have a preset, in table order.
    pub const PRESET_LEVELS: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];

    pub fn preset(self) -> Option<&'static Preset> {
        self.preset_index().map(|index| &PRESETS[index])
    }

    /// Position in [`PRESETS`] and in the per-difficulty stats arrays.
    pub const fn preset_index(self) -> Option<usize> {
        match self {
            Self::Easy => Some(0),
            Self::Medium => Some(1),
            Self::Hard => Some(2),
            Self::Expert => Some(3),
            Self::Custom => None,
        }
    }

    pub fn name(self) -> &'static str {
        self.preset().map_or("Custom", |preset| preset.name)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(difficulty: Difficulty, size: Coord2, mines: CellCount) -> Self {
        Self {
            difficulty,
            size,
            mines,
        }
    }

    /// Preset configuration, or an empty 1x1 grid for [`Difficulty::Custom`] which has no preset.
    pub fn preset(difficulty: Difficulty) -> Self {
        match difficulty.preset() {
            Some(preset) => Self::new_unchecked(difficulty, preset.size, preset.mine_count()),
            None => Self::new_unchecked(Difficulty::Custom, (1, 1), 0),
        }
    }

    /// Custom grid, at least one safe cell must remain.
    pub fn custom(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines >= mult(rows, cols) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(Difficulty::Custom, (rows, cols), mines))
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        Self::preset(difficulty)
    }
}
