use serde::{Deserialize, Serialize};

use crate::Coord2;

/// Player-visible state of one cell as stored by the board.
///
/// Revealed and marked are separate variants, so a cell can never be both.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Marked,
    /// Holds the adjacent mine count computed when the cell was revealed.
    Revealed(u8),
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn is_marked(self) -> bool {
        matches!(self, Self::Marked)
    }
}

/// What the presentation layer is allowed to know about a cell.
///
/// `mined` and `adjacent_mines` are only filled in once the cell is revealed,
/// `adjacent_mines` stays empty for a revealed mine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub revealed: bool,
    pub marked: bool,
    pub mined: Option<bool>,
    pub adjacent_mines: Option<u8>,
}

impl CellView {
    pub(crate) const fn new(state: CellState, mined: bool) -> Self {
        match state {
            CellState::Hidden => Self {
                revealed: false,
                marked: false,
                mined: None,
                adjacent_mines: None,
            },
            CellState::Marked => Self {
                revealed: false,
                marked: true,
                mined: None,
                adjacent_mines: None,
            },
            CellState::Revealed(count) => Self {
                revealed: true,
                marked: false,
                mined: Some(mined),
                adjacent_mines: if mined { None } else { Some(count) },
            },
        }
    }
}

/// A single entry of the change list returned by a reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub coords: Coord2,
    pub mined: bool,
    pub adjacent_mines: u8,
}
