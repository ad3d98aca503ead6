use std::collections::VecDeque;

use ndarray::{Array2, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Leaving a final state takes a new board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    InProgress,
    Won,
    /// Holds the mine that was revealed.
    Lost(Coord2),
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost(_))
    }
}

/// A square minefield together with what the player has uncovered so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    marked_count: CellCount,
    state: GameState,
}

/// Serialized form of `Board`. Counters and state are rechecked against the
/// cells so a loaded board obeys the same rules as a played one.
#[derive(Deserialize)]
struct BoardRepr {
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    marked_count: CellCount,
    state: GameState,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self> {
        let BoardRepr {
            mine_layout,
            cells,
            revealed_count,
            marked_count,
            state,
        } = repr;

        let side = mine_layout.size() as usize;
        if cells.dim() != (side, side) {
            return Err(ConfigError::InvalidBoardShape.into());
        }

        let mut revealed = 0;
        let mut marked = 0;
        let mut mine_revealed = false;
        for ((y, x), &cell) in cells.indexed_iter() {
            let coords = Coord2::new(x as Coord, y as Coord);
            match cell {
                CellState::Hidden => {}
                CellState::Marked => marked += 1,
                CellState::Revealed(adjacent) => {
                    if adjacent != mine_layout.adjacent_mine_count(coords) {
                        return Err(ConfigError::InconsistentBoard.into());
                    }
                    mine_revealed |= mine_layout.contains_mine(coords);
                    revealed += 1;
                }
            }
        }
        if revealed != revealed_count || marked != marked_count {
            return Err(ConfigError::InconsistentBoard.into());
        }

        let consistent = match state {
            GameState::InProgress => {
                !mine_revealed && revealed < mine_layout.safe_cell_count()
            }
            GameState::Won => !mine_revealed && revealed == mine_layout.safe_cell_count(),
            GameState::Lost(at) => {
                at.is_within(mine_layout.size())
                    && mine_layout.contains_mine(at)
                    && revealed == mine_layout.total_cells()
            }
        };
        if !consistent {
            return Err(ConfigError::InconsistentBoard.into());
        }

        Ok(Self {
            mine_layout,
            cells,
            revealed_count,
            marked_count,
            state,
        })
    }
}

impl Board {
    pub fn new(mine_layout: MineLayout) -> Self {
        let side = mine_layout.size() as usize;
        Self {
            mine_layout,
            cells: Array2::default((side, side)),
            revealed_count: 0,
            marked_count: 0,
            state: GameState::default(),
        }
    }

    /// Fresh board with `mine_count` mines placed at random.
    pub fn generate<R: Rng + ?Sized>(
        size: Coord,
        mine_count: CellCount,
        rng: &mut R,
    ) -> Result<Self> {
        RandomMineGenerator::new(rng)
            .generate(size, mine_count)
            .map(Self::new)
    }

    /// Fresh board with mines exactly at `mines`.
    pub fn from_mines(size: Coord, mines: &[Coord2]) -> Result<Self> {
        MineLayout::from_mine_coords(size, mines).map(Self::new)
    }

    /// Replaces this board with a newly generated one. On error the current
    /// board is kept as it was.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        size: Coord,
        mine_count: CellCount,
        rng: &mut R,
    ) -> Result<()> {
        *self = Self::generate(size, mine_count, rng)?;
        Ok(())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord {
        self.mine_layout.size()
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_layout.total_cells()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked_count
    }

    /// Mines minus marks, negative when the player placed too many marks.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.mine_count()) - i64::from(self.marked_count)
    }

    pub fn cell(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(CellView::new(
            self.cells[coords.to_nd_index()],
            self.mine_layout.contains_mine(coords),
        ))
    }

    /// Views of every cell, row-major.
    pub fn cell_views(&self) -> Array2<CellView> {
        Zip::from(&self.cells)
            .and(self.mine_layout.mask())
            .map_collect(|&state, &mined| CellView::new(state, mined))
    }

    #[cfg(test)]
    pub(crate) fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use CellState::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_in_progress()?;

        let cell = &mut self.cells[coords.to_nd_index()];
        let outcome = match *cell {
            Hidden => {
                *cell = Marked;
                self.marked_count += 1;
                MarkOutcome::Marked
            }
            Marked => {
                *cell = Hidden;
                self.marked_count -= 1;
                MarkOutcome::Unmarked
            }
            Revealed(_) => MarkOutcome::Unchanged,
        };
        log::debug!("Toggle mark at {coords}: {outcome:?}");
        Ok(outcome)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_in_progress()?;

        if self.cells[coords.to_nd_index()] != CellState::Hidden {
            log::trace!("Reveal at {coords} ignored, cell is not hidden");
            return Ok(RevealOutcome::Unchanged);
        }

        if self.mine_layout.contains_mine(coords) {
            return Ok(self.explode(coords));
        }

        let revealed = self.flood_reveal(coords);
        if self.revealed_count == self.mine_layout.safe_cell_count() {
            self.state = GameState::Won;
            log::debug!("Board cleared after revealing {coords}");
            Ok(RevealOutcome::Won(revealed))
        } else {
            Ok(RevealOutcome::Revealed(revealed))
        }
    }

    /// Opens `start` and, through zero-count cells, everything connected to it.
    /// `start` must be hidden and safe.
    fn flood_reveal(&mut self, start: Coord2) -> Vec<RevealedCell> {
        let mut revealed = Vec::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            // already opened through another zero cell
            if self.cells[visit_coords.to_nd_index()] != CellState::Hidden {
                continue;
            }
            debug_assert!(!self.mine_layout.contains_mine(visit_coords));

            let adjacent_mines = self.mine_layout.adjacent_mine_count(visit_coords);
            self.cells[visit_coords.to_nd_index()] = CellState::Revealed(adjacent_mines);
            self.revealed_count += 1;
            revealed.push(RevealedCell {
                coords: visit_coords,
                mined: false,
                adjacent_mines,
            });
            log::trace!("Opened {visit_coords}, adjacent mines: {adjacent_mines}");

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.cells[pos.to_nd_index()] == CellState::Hidden),
                );
            }
        }

        log::debug!("Reveal at {start} opened {} cells", revealed.len());
        revealed
    }

    /// Ends the game and uncovers the whole board, dropping any marks.
    fn explode(&mut self, at: Coord2) -> RevealOutcome {
        let size = self.size();
        let mut revealed = Vec::new();

        for y in 0..size {
            for x in 0..size {
                let coords = Coord2::new(x, y);
                let cell = self.cells[coords.to_nd_index()];
                if cell.is_revealed() {
                    continue;
                }
                if cell.is_marked() {
                    self.marked_count -= 1;
                }

                let adjacent_mines = self.mine_layout.adjacent_mine_count(coords);
                self.cells[coords.to_nd_index()] = CellState::Revealed(adjacent_mines);
                self.revealed_count += 1;
                revealed.push(RevealedCell {
                    coords,
                    mined: self.mine_layout.contains_mine(coords),
                    adjacent_mines,
                });
            }
        }

        self.state = GameState::Lost(at);
        log::debug!("Hit mine at {at}, game lost");
        RevealOutcome::Lost { at, revealed }
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::GameAlreadyOver)
        } else {
            Ok(())
        }
    }
}
