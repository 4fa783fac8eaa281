use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: &GameConfig) -> MineLayout;
}

/// How much room is kept free of mines around the first sweep.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SafeZone {
    /// Only the swept cell itself.
    Cell,
    /// The swept cell and its up to 8 neighbors.
    Neighborhood,
}

impl SafeZone {
    pub const fn contains(self, start: Coord2, coords: Coord2) -> bool {
        match self {
            Self::Cell => start.0 == coords.0 && start.1 == coords.1,
            Self::Neighborhood => is_within_one(start, coords),
        }
    }

    /// Number of in-bounds cells the zone covers on a grid of `size`.
    pub fn cell_count(self, start: Coord2, size: Coord2) -> CellCount {
        match self {
            Self::Cell => 1,
            Self::Neighborhood => 1 + NeighborIter::new(start, size).count() as CellCount,
        }
    }
}
