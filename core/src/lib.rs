#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use difficulty::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use reveal::*;
pub use session::*;
pub use stats::*;
pub use timer::*;
pub use types::*;

mod cell;
mod difficulty;
mod error;
mod generator;
mod grid;
mod reveal;
mod session;
mod stats;
mod timer;
mod types;

/// Where the mines are, independent of what the player has seen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors, always fits
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    /// Cell value for `coords`, as stored in the grid once the layout is placed.
    pub fn value_at(&self, coords: Coord2) -> CellValue {
        if self[coords] {
            CellValue::Bomb
        } else {
            CellValue::Adjacent(self.adjacent_mine_count(coords))
        }
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SweepOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl SweepOutcome {
    pub const fn has_update(self) -> bool {
        use SweepOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    /// `false` only when a bomb went off, matching the boolean result of a classic sweep.
    pub const fn is_safe(self) -> bool {
        !matches!(self, Self::HitMine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_counts_mines() {
        let layout = MineLayout::from_mine_coords((3, 4), &[(0, 0), (2, 3), (0, 0)]).unwrap();
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.size(), (3, 4));
        assert_eq!(layout.total_cells(), 12);
    }

    #[test]
    fn layout_rejects_out_of_bounds_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((3, 3), &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn layout_values() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (0, 2)]).unwrap();
        assert_eq!(layout.value_at((0, 0)), CellValue::Bomb);
        assert_eq!(layout.value_at((0, 1)), CellValue::Adjacent(2));
        assert_eq!(layout.value_at((1, 1)), CellValue::Adjacent(2));
        assert_eq!(layout.value_at((2, 0)), CellValue::Adjacent(0));
    }

    #[test]
    fn iter_mines_is_row_major() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(1, 0), (0, 1)]).unwrap();
        let mines: alloc::vec::Vec<_> = layout.iter_mines().collect();
        assert_eq!(mines, [(0, 1), (1, 0)]);
    }

    #[test]
    fn only_hit_mine_is_unsafe() {
        assert!(SweepOutcome::NoChange.is_safe());
        assert!(SweepOutcome::Won.is_safe());
        assert!(!SweepOutcome::HitMine.is_safe());
        assert!(!SweepOutcome::NoChange.has_update());
    }
}
