use thiserror::Error;

use crate::{CellCount, Coord, Coord2};

/// Why a board configuration was rejected.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board size {0} is too small")]
    SizeTooSmall(Coord),
    #[error("Board size {0} is too large")]
    SizeTooLarge(Coord),
    #[error("Too many mines, {mines} requested but the board only has {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("A board needs at least one mine")]
    NoMines,
    #[error("Unknown difficulty, expected easy, medium or hard")]
    UnknownDifficulty,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Layout declares {declared} mines but holds {actual}")]
    MineCountMismatch { declared: CellCount, actual: CellCount },
    #[error("Board counters or game state disagree with its cells")]
    InconsistentBoard,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Coordinates {coords} are outside the {size}x{size} board")]
    OutOfBounds { coords: Coord2, size: Coord },
    #[error("Game already ended, no new moves are accepted")]
    GameAlreadyOver,
}

pub type Result<T> = core::result::Result<T, GameError>;
