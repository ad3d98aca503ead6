use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Full player-facing picture of a board, for renderers that redraw
/// everything instead of applying reveal outcomes one by one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord,
    pub mine_count: CellCount,
    pub state: GameState,
    pub cells: Array2<CellView>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        Self {
            size: board.size(),
            mine_count: board.mine_count(),
            state: board.state(),
            cells: board.cell_views(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let side = usize::try_from(self.size).map_err(|_| ConfigError::InvalidBoardShape)?;
        if self.cells.dim() != (side, side) {
            return Err(ConfigError::InvalidBoardShape.into());
        }

        if self.mine_count >= square(self.size) {
            return Err(ConfigError::TooManyMines {
                mines: self.mine_count,
                cells: square(self.size),
            }
            .into());
        }

        Ok(())
    }

    pub fn cell(&self, coords: Coord2) -> Result<CellView> {
        if coords.is_within(self.size) {
            Ok(self.cells[coords.to_nd_index()])
        } else {
            Err(GameError::OutOfBounds {
                coords,
                size: self.size,
            })
        }
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.revealed).count() as CellCount
    }
}
