use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Grid must have at least one row and one column")]
    InvalidSize,
    #[error("Mine layout does not match the grid size")]
    InvalidLayout,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Stats record truncated, expected {expected} bytes but got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Player name is not valid UTF-8")]
    InvalidName,
}
