use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;
use core::num::Saturating;
use core::time::Duration;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Whether mines exist yet. They are placed lazily by the first sweep so that it always lands on a zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    #[default]
    Unplaced,
    Placed(MineLayout),
}

impl Placement {
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }

    pub const fn layout(&self) -> Option<&MineLayout> {
        match self {
            Self::Placed(layout) => Some(layout),
            Self::Unplaced => None,
        }
    }
}

/// Read-only view of a session, suitable for serializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: GameConfig,
    pub grid: Grid,
    pub remaining_bombs: CellCount,
    pub flagged: CellCount,
    pub remaining_cells: CellCount,
    pub exploded: CellCount,
    pub game_over: bool,
    pub won: bool,
    pub elapsed_ms: u64,
}

/// One game of minesweeper from first sweep to win or loss.
///
/// Every command validates its coordinates and fails with [`GameError::InvalidCoords`] when they are out of range.
/// Commands that make no sense for the current state (sweeping a revealed cell, flagging past the mine count,
/// moving after the game ended) succeed with a `NoChange` outcome instead of failing.
#[derive(Clone, Debug)]
pub struct GameSession<R = SmallRng> {
    config: GameConfig,
    grid: Grid,
    placement: Placement,
    rng: R,
    flagged_count: CellCount,
    remaining_cells: Saturating<CellCount>,
    exploded_bombs: CellCount,
    game_over: bool,
    flags_used: bool,
    stopwatch: Stopwatch,
}

impl GameSession<SmallRng> {
    pub fn new(config: impl Into<GameConfig>) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    pub fn with_seed(config: impl Into<GameConfig>, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    pub fn custom(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        Ok(Self::new(GameConfig::custom(rows, cols, mines)?))
    }

    pub fn from_layout(layout: MineLayout) -> Self {
        Self::with_layout(layout, SmallRng::from_os_rng())
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(config: impl Into<GameConfig>, rng: R) -> Self {
        let config = config.into();
        Self {
            config,
            grid: Grid::new(config.size),
            placement: Placement::Unplaced,
            rng,
            flagged_count: 0,
            remaining_cells: Saturating(config.safe_cells()),
            exploded_bombs: 0,
            game_over: false,
            flags_used: false,
            stopwatch: Stopwatch::default(),
        }
    }

    /// Custom session whose mines are already placed, skipping the first-sweep placement.
    pub fn with_layout(layout: MineLayout, rng: R) -> Self {
        let config = GameConfig::new_unchecked(Difficulty::Custom, layout.size(), layout.mine_count());
        let mut session = Self::with_rng(config, rng);
        session.install_layout(layout);
        session
    }

    /// Uses `layout` instead of random placement. Only valid before the first sweep, and the layout must match the
    /// configured size and mine count.
    pub fn place_layout(&mut self, layout: MineLayout) -> Result<()> {
        if self.placement.is_placed()
            || layout.size() != self.config.size
            || layout.mine_count() != self.config.mines
        {
            return Err(GameError::InvalidLayout);
        }
        self.install_layout(layout);
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn height(&self) -> Coord {
        self.grid.height()
    }

    pub fn width(&self) -> Coord {
        self.grid.width()
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        self.grid.get(coords)
    }

    pub fn state(&self, coords: Coord2) -> Result<CellState> {
        self.cell(coords).map(|cell| cell.state)
    }

    pub fn value(&self, coords: Coord2) -> Result<CellValue> {
        self.cell(coords).map(|cell| cell.value)
    }

    pub fn is_bomb(&self, coords: Coord2) -> Result<bool> {
        self.cell(coords).map(Cell::is_bomb)
    }

    pub fn layout(&self) -> Option<&MineLayout> {
        self.placement.layout()
    }

    pub fn is_initialized(&self) -> bool {
        self.placement.is_placed()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    /// Flags placed, plus one for every exploded bomb.
    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn remaining_bombs(&self) -> CellCount {
        self.config.mines.saturating_sub(self.flagged_count)
    }

    /// Safe cells still hidden.
    pub fn remaining_cells(&self) -> CellCount {
        self.remaining_cells.0
    }

    pub fn exploded_mines(&self) -> CellCount {
        self.exploded_bombs
    }

    /// Whether the player placed a flag at any point of this game.
    pub fn flags_used(&self) -> bool {
        self.flags_used
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_game_won(&self) -> bool {
        self.remaining_cells.0 == 0
    }

    pub fn is_finished(&self) -> bool {
        self.game_over || self.is_game_won()
    }

    /// Reveals `coords`, placing the mines first if this is the first sweep.
    pub fn sweep(&mut self, coords: Coord2) -> Result<SweepOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if self.is_finished() {
            return Ok(SweepOutcome::NoChange);
        }

        if !self.placement.is_placed() {
            self.place_mines(coords);
        }

        let cell = self.grid[coords];
        if !cell.is_hidden() {
            return Ok(SweepOutcome::NoChange);
        }

        self.grid[coords].state = CellState::Revealed;

        if cell.is_bomb() {
            self.game_over = true;
            self.exploded_bombs += 1;
            if self.flagged_count < self.config.mines {
                self.flagged_count += 1;
            }
            log::debug!("Hit mine at {:?}, {} exploded", coords, self.exploded_bombs);
            return Ok(SweepOutcome::HitMine);
        }

        self.remaining_cells -= 1;
        let flooded = self.grid.flood_from(coords);
        self.remaining_cells -= flooded;
        log::debug!(
            "Swept {:?}, flood opened {}, {} safe cells left",
            coords,
            flooded,
            self.remaining_cells
        );

        if self.is_game_won() {
            log::debug!("Game won");
            Ok(SweepOutcome::Won)
        } else {
            Ok(SweepOutcome::Revealed)
        }
    }

    /// Flags a hidden cell while unflagged bombs remain.
    pub fn mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if self.is_finished()
            || self.flagged_count >= self.config.mines
            || !self.grid[coords].is_hidden()
        {
            return Ok(MarkOutcome::NoChange);
        }

        self.set_flag(coords);
        Ok(MarkOutcome::Changed)
    }

    pub fn unmark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if self.is_finished() || !self.grid[coords].is_flagged() {
            return Ok(MarkOutcome::NoChange);
        }

        self.clear_flag(coords);
        Ok(MarkOutcome::Changed)
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if self.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        Ok(match self.grid[coords].state {
            CellState::Flagged => {
                self.clear_flag(coords);
                MarkOutcome::Changed
            }
            CellState::Hidden if self.flagged_count < self.config.mines => {
                self.set_flag(coords);
                MarkOutcome::Changed
            }
            _ => MarkOutcome::NoChange,
        })
    }

    /// Reveals every bomb that is not flagged, returning how many were shown.
    pub fn reveal_bombs(&mut self) -> CellCount {
        let bombs: Vec<_> = self.unflagged_hidden_bombs().collect();
        for &coords in &bombs {
            self.grid[coords].state = CellState::Revealed;
        }
        bombs.len() as CellCount
    }

    /// Unflagged hidden bombs in random order, to be revealed one at a time over `total`.
    pub fn bomb_reveal_schedule(&mut self, total: Duration) -> RevealSchedule {
        let mut order: Vec<_> = self.unflagged_hidden_bombs().collect();
        order.shuffle(&mut self.rng);
        RevealSchedule::new(order, total)
    }

    /// Reveals a single bomb for [`RevealSchedule`], ignoring anything else.
    pub(crate) fn reveal_bomb_at(&mut self, coords: Coord2) -> bool {
        match self.grid.get(coords) {
            Ok(cell) if cell.is_bomb() && cell.is_hidden() => {
                self.grid[coords].state = CellState::Revealed;
                true
            }
            _ => false,
        }
    }

    /// Lets play continue after a bomb went off. Exploded bombs stay counted.
    pub fn revive_game(&mut self) {
        if self.game_over {
            log::debug!("Game revived with {} exploded", self.exploded_bombs);
        }
        self.game_over = false;
    }

    /// Replays the current game: every cell is hidden again and the mine layout, when already placed, is kept.
    pub fn restart_game(&mut self) {
        log::debug!(
            "Restarting {} game, layout kept: {}",
            self.config.difficulty,
            self.placement.is_placed()
        );
        self.grid.hide_all();
        self.reset_counters();
    }

    /// Same configuration, new mines on the next sweep.
    pub fn new_game(&mut self) {
        self.new_game_with(self.config);
    }

    pub fn new_game_with(&mut self, config: impl Into<GameConfig>) {
        let config = config.into();
        log::debug!(
            "New {} game, {:?} with {} mines",
            config.difficulty,
            config.size,
            config.mines
        );

        if config.size == self.grid.size() {
            self.grid.clear();
        } else {
            self.grid = Grid::new(config.size);
        }
        self.config = config;
        self.placement = Placement::Unplaced;
        self.reset_counters();
    }

    pub fn new_custom_game(&mut self, rows: Coord, cols: Coord, mines: CellCount) -> Result<()> {
        self.new_game_with(GameConfig::custom(rows, cols, mines)?);
        Ok(())
    }

    /// Clears existing flags, then flags as many random hidden cells as there are mines.
    pub fn randomly_flag_mine_count(&mut self) {
        self.clear_flags();

        let hidden = self.grid.count_where(Cell::is_hidden);
        let target = self.config.mines.min(hidden);
        let (rows, cols) = self.grid.size();

        while self.flagged_count < target {
            let coords = (
                self.rng.random_range(0..rows),
                self.rng.random_range(0..cols),
            );
            if self.grid[coords].is_hidden() {
                self.grid[coords].state = CellState::Flagged;
                self.flagged_count += 1;
            }
        }
    }

    /// Removes every flag and zeroes the flag count.
    pub fn clear_flags(&mut self) {
        let flagged: Vec<_> = self
            .grid
            .iter()
            .filter(|(_, cell)| cell.is_flagged())
            .map(|(coords, _)| coords)
            .collect();
        for coords in flagged {
            self.grid[coords].state = CellState::Hidden;
        }
        self.flagged_count = 0;
    }

    pub fn init_timer(&mut self, now: Instant) {
        self.stopwatch.init(now);
    }

    pub fn start_timer(&mut self) {
        self.stopwatch.start();
    }

    pub fn stop_timer(&mut self) {
        self.stopwatch.stop();
    }

    pub fn update_timer(&mut self, now: Instant) {
        self.stopwatch.update(now);
    }

    pub fn clear_timer(&mut self) {
        self.stopwatch.clear();
    }

    pub fn time(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config,
            grid: self.grid.clone(),
            remaining_bombs: self.remaining_bombs(),
            flagged: self.flagged_count,
            remaining_cells: self.remaining_cells.0,
            exploded: self.exploded_bombs,
            game_over: self.game_over,
            won: self.is_game_won(),
            elapsed_ms: self.time().as_millis().try_into().unwrap_or(u64::MAX),
        }
    }

    /// Counters followed by the grid dump.
    pub fn render(&self, cheat: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, ">> Difficulty: {}", self.config.difficulty);
        let _ = writeln!(out, ">> Remaining bombs: {}", self.remaining_bombs());
        let _ = writeln!(out, ">> Remaining cells: {}", self.remaining_cells);
        out.push_str(&self.grid.render(cheat));
        out
    }

    fn place_mines(&mut self, start: Coord2) {
        let layout = RandomMinefieldGenerator::new(&mut self.rng, start, SafeZone::Neighborhood)
            .generate(&self.config);
        log::debug!(
            "Placed {} mines on {:?} around start {:?}",
            layout.mine_count(),
            self.config.size,
            start
        );
        self.install_layout(layout);
    }

    fn install_layout(&mut self, layout: MineLayout) {
        self.grid.apply_layout(&layout);
        self.config.mines = layout.mine_count();
        self.remaining_cells =
            Saturating(self.grid.count_where(|cell| !cell.is_bomb() && !cell.is_revealed()));
        self.placement = Placement::Placed(layout);
    }

    fn reset_counters(&mut self) {
        self.flagged_count = 0;
        self.remaining_cells = Saturating(self.config.safe_cells());
        self.exploded_bombs = 0;
        self.game_over = false;
        self.flags_used = false;
        self.stopwatch.clear();
    }

    fn set_flag(&mut self, coords: Coord2) {
        self.grid[coords].state = CellState::Flagged;
        self.flagged_count += 1;
        self.flags_used = true;
    }

    fn clear_flag(&mut self, coords: Coord2) {
        self.grid[coords].state = CellState::Hidden;
        self.flagged_count = self.flagged_count.saturating_sub(1);
    }

    fn unflagged_hidden_bombs(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.grid
            .iter()
            .filter(|(_, cell)| cell.is_bomb() && cell.is_hidden())
            .map(|(coords, _)| coords)
    }
}
