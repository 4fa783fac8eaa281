use serde::{Deserialize, Serialize};

/// Player-visible state of a cell, mutually exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

/// What a cell holds once mines have been placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Bomb,
    /// Number of bombs among the up to 8 neighbors, in `0..=8`.
    Adjacent(u8),
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Adjacent(0)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub state: CellState,
    pub value: CellValue,
}

impl Cell {
    pub const fn is_bomb(self) -> bool {
        matches!(self.value, CellValue::Bomb)
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self.state, CellState::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    /// Whether the value is an adjacency count of zero.
    pub const fn is_zero(self) -> bool {
        matches!(self.value, CellValue::Adjacent(0))
    }

    pub const fn adjacent(self) -> Option<u8> {
        match self.value {
            CellValue::Adjacent(count) => Some(count),
            CellValue::Bomb => None,
        }
    }
}
