use alloc::string::String;
use alloc::vec;
use core::fmt::Write;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size `rows x cols` collection of cells, zero-indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Bounds-checked access.
    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        self.validate_coords(coords).map(|coords| self[coords])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn count_where(&self, predicate: impl Fn(Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|&&cell| predicate(cell)).count() as CellCount
    }

    /// Writes the value of every cell from `layout`, leaving states untouched.
    pub(crate) fn apply_layout(&mut self, layout: &MineLayout) {
        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            cell.value = layout.value_at((row as Coord, col as Coord));
        }
    }

    /// Hides every cell, keeping values.
    pub(crate) fn hide_all(&mut self) {
        self.cells
            .iter_mut()
            .for_each(|cell| cell.state = CellState::Hidden);
    }

    /// Hides every cell and forgets values.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Reveals around the already revealed `origin`, returning how many cells changed.
    ///
    /// Hidden zero neighbors are revealed and expanded in turn. A zero cell also reveals the rest of its hidden
    /// neighbors without expanding them, which leaves a one-cell halo of numbers around every zero region.
    pub(crate) fn flood_from(&mut self, origin: Coord2) -> CellCount {
        let mut revealed = 0;
        let mut to_visit = vec![origin];

        while let Some(coords) = to_visit.pop() {
            let center_is_zero = self[coords].is_zero();

            for neighbor in self.iter_neighbors(coords) {
                let cell = &mut self[neighbor];
                if !cell.is_hidden() {
                    continue;
                }

                if cell.is_zero() {
                    cell.state = CellState::Revealed;
                    revealed += 1;
                    to_visit.push(neighbor);
                    log::trace!("Flood opened zero at {:?}", neighbor);
                } else if center_is_zero {
                    cell.state = CellState::Revealed;
                    revealed += 1;
                    log::trace!("Flood opened halo at {:?}", neighbor);
                }
            }
        }

        revealed
    }

    /// Text dump with row and column labels. With `cheat` every value is shown regardless of state.
    pub fn render(&self, cheat: bool) -> String {
        let (rows, cols) = self.size();
        let rule = "-".repeat(3 * (usize::from(cols) + 2));
        let mut out = String::new();

        let write_labels = |out: &mut String| {
            out.push_str("    ");
            for col in 0..cols {
                let _ = write!(out, " {} ", col);
            }
            out.push('\n');
        };

        write_labels(&mut out);
        out.push_str(&rule);
        out.push('\n');

        for row in 0..rows {
            let _ = write!(out, " {} |", row);
            for col in 0..cols {
                let cell = self[(row, col)];
                let shown = cheat || cell.is_revealed();
                match (shown, cell.value, cell.state) {
                    (true, CellValue::Bomb, _) => out.push_str(" * "),
                    (true, CellValue::Adjacent(count), _) => {
                        let _ = write!(out, " {} ", count);
                    }
                    (false, _, CellState::Flagged) => out.push_str(" F "),
                    (false, _, _) => out.push_str("[ ]"),
                }
            }
            let _ = writeln!(out, "| {} ", row);
        }

        out.push_str(&rule);
        out.push('\n');
        write_labels(&mut out);
        out
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed_grid(size: Coord2, mines: &[Coord2]) -> Grid {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        let mut grid = Grid::new(size);
        grid.apply_layout(&layout);
        grid
    }

    fn reveal(grid: &mut Grid, coords: Coord2) -> CellCount {
        grid[coords].state = CellState::Revealed;
        1 + grid.flood_from(coords)
    }

    #[test]
    fn get_is_bounds_checked() {
        let grid = Grid::new((2, 3));
        assert!(grid.get((1, 2)).is_ok());
        assert_eq!(grid.get((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(grid.get((0, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn zero_region_with_halo() {
        // mines in the right column split the grid into a zero region and a numbered halo
        let mut grid = placed_grid((4, 4), &[(0, 3), (1, 3), (2, 3), (3, 3)]);

        assert_eq!(reveal(&mut grid, (0, 0)), 12);
        for row in 0..4 {
            assert!(grid[(row, 0)].is_revealed());
            assert!(grid[(row, 1)].is_revealed());
            assert!(grid[(row, 2)].is_revealed());
            assert!(grid[(row, 3)].is_hidden());
        }
    }

    #[test]
    fn flood_does_not_cross_numbers() {
        // a wall of mines in the middle column leaves the right side unreachable
        let mut grid = placed_grid((3, 5), &[(0, 2), (1, 2), (2, 2)]);

        assert_eq!(reveal(&mut grid, (1, 0)), 6);
        assert!(grid[(1, 3)].is_hidden());
        assert!(grid[(1, 4)].is_hidden());
    }

    #[test]
    fn flood_skips_flagged_cells() {
        let mut grid = placed_grid((3, 3), &[(2, 2)]);
        grid[(0, 2)].state = CellState::Flagged;

        assert_eq!(reveal(&mut grid, (0, 0)), 7);
        assert!(grid[(0, 2)].is_flagged());
    }

    #[test]
    fn numbered_cell_pulls_in_adjacent_zero_region() {
        let mut grid = placed_grid((1, 4), &[(0, 0)]);

        // (0, 1) is a one, its neighbor (0, 2) is zero and floods onward
        assert_eq!(reveal(&mut grid, (0, 1)), 3);
        assert!(grid[(0, 3)].is_revealed());
        assert!(grid[(0, 0)].is_hidden());
    }

    #[test]
    fn large_grid_floods_without_recursion() {
        let mut grid = placed_grid((1000, 1000), &[]);
        assert_eq!(reveal(&mut grid, (500, 500)), 1_000_000);
    }

    #[test]
    fn render_hides_unless_cheating() {
        let mut grid = placed_grid((2, 2), &[(0, 0)]);
        grid[(1, 1)].state = CellState::Revealed;
        grid[(0, 1)].state = CellState::Flagged;

        let plain = grid.render(false);
        assert!(plain.contains(" 0 |[ ] F | 0 "));
        assert!(plain.contains(" 1 |[ ] 1 | 1 "));

        let cheat = grid.render(true);
        assert!(cheat.contains(" 0 | *  1 | 0 "));
    }
}
