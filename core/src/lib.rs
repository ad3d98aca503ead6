use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use difficulty::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod cell;
mod difficulty;
mod error;
mod generator;
mod session;
mod snapshot;
mod types;

/// Smallest board side length that still leaves room for a mine and a safe cell.
pub const MIN_SIZE: Coord = 2;

/// Largest board side length offered to players.
pub const MAX_SIZE: Coord = 14;

pub const DEFAULT_SIZE: Coord = 12;

/// Hard ceiling on any board, generated or built from a mine list, so a bad
/// size cannot turn into a multi-gigabyte allocation.
pub const MAX_BOARD_SIZE: Coord = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: Coord,
    pub difficulty: Difficulty,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, difficulty: Difficulty) -> Self {
        Self { size, difficulty }
    }

    pub fn new(size: Coord, difficulty: Difficulty) -> Self {
        Self::new_unchecked(size.clamp(MIN_SIZE, MAX_SIZE), difficulty)
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub const fn mine_count(&self) -> CellCount {
        self.difficulty.mine_count(self.size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size > MAX_SIZE {
            return Err(ConfigError::SizeTooLarge(self.size).into());
        }
        check_layout(self.size, self.mine_count())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_SIZE, Difficulty::default())
    }
}

pub(crate) fn check_size(size: Coord) -> Result<()> {
    if size < MIN_SIZE {
        return Err(ConfigError::SizeTooSmall(size).into());
    }
    if size > MAX_BOARD_SIZE {
        return Err(ConfigError::SizeTooLarge(size).into());
    }
    Ok(())
}

/// Rejects boards that would be unwinnable or already won before the first move.
pub(crate) fn check_layout(size: Coord, mines: CellCount) -> Result<()> {
    check_size(size)?;
    if mines == 0 {
        return Err(ConfigError::NoMines.into());
    }
    let cells = square(size);
    if mines >= cells {
        return Err(ConfigError::TooManyMines { mines, cells }.into());
    }
    Ok(())
}

/// Where the mines are. Never changes after generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineLayoutRepr")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    size: Coord,
    mine_count: CellCount,
}

/// Serialized form of `MineLayout`, checked before it becomes one.
#[derive(Deserialize)]
struct MineLayoutRepr {
    mine_mask: Array2<bool>,
    size: Coord,
    mine_count: CellCount,
}

impl TryFrom<MineLayoutRepr> for MineLayout {
    type Error = GameError;

    fn try_from(repr: MineLayoutRepr) -> Result<Self> {
        check_size(repr.size)?;
        let side = repr.size as usize;
        if repr.mine_mask.dim() != (side, side) {
            return Err(ConfigError::InvalidBoardShape.into());
        }

        let layout = Self::from_mine_mask(repr.size, repr.mine_mask);
        if layout.mine_count != repr.mine_count {
            return Err(ConfigError::MineCountMismatch {
                declared: repr.mine_count,
                actual: layout.mine_count,
            }
            .into());
        }
        check_layout(layout.size, layout.mine_count)?;
        Ok(layout)
    }
}

impl MineLayout {
    /// Expects a square mask whose side was produced from a valid `Coord`.
    pub(crate) fn from_mine_mask(size: Coord, mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            size,
            mine_count,
        }
    }

    /// Sizes above `MAX_BOARD_SIZE` are rejected before anything is allocated.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        check_size(size)?;
        let side = size as usize;
        let mut mine_mask = Array2::from_elem((side, side), false);

        for &coords in mine_coords {
            if !coords.is_within(size) {
                return Err(GameError::OutOfBounds { coords, size });
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(size, mine_mask);
        check_layout(size, layout.mine_count)?;
        Ok(layout)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.is_within(self.size) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                coords,
                size: self.size,
            })
        }
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }

    pub(crate) fn mask(&self) -> &Array2<bool> {
        &self.mine_mask
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    Unchanged,
    Marked,
    Unmarked,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    /// Mark state of the cell after the toggle, `None` when the cell was revealed.
    pub const fn is_marked(self) -> Option<bool> {
        match self {
            Self::Unchanged => None,
            Self::Marked => Some(true),
            Self::Unmarked => Some(false),
        }
    }
}

/// Result of a reveal command. The cell lists are in the order the cells were
/// opened, so a renderer can replay them one by one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    Unchanged,
    Revealed(Vec<RevealedCell>),
    Won(Vec<RevealedCell>),
    Lost {
        at: Coord2,
        revealed: Vec<RevealedCell>,
    },
}

impl RevealOutcome {
    pub fn has_update(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won(_) | Self::Lost { .. })
    }

    pub fn changes(&self) -> &[RevealedCell] {
        match self {
            Self::Unchanged => &[],
            Self::Revealed(cells) | Self::Won(cells) => cells,
            Self::Lost { revealed, .. } => revealed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_clamps_size() {
        assert_eq!(GameConfig::new(1, Difficulty::Easy).size, MIN_SIZE);
        assert_eq!(GameConfig::new(40, Difficulty::Easy).size, MAX_SIZE);
        assert_eq!(GameConfig::new(7, Difficulty::Easy).size, 7);
    }

    #[test]
    fn config_validate_rejects_out_of_range_sizes() {
        assert_eq!(
            GameConfig::new_unchecked(1, Difficulty::Hard).validate(),
            Err(ConfigError::SizeTooSmall(1).into())
        );
        assert_eq!(
            GameConfig::new_unchecked(0, Difficulty::Hard).validate(),
            Err(ConfigError::SizeTooSmall(0).into())
        );
        assert_eq!(
            GameConfig::new_unchecked(15, Difficulty::Hard).validate(),
            Err(ConfigError::SizeTooLarge(15).into())
        );
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"size": 9}"#).unwrap();
        assert_eq!(config, GameConfig::new(9, Difficulty::Hard));

        let config: GameConfig = serde_json::from_str(r#"{"difficulty": "easy"}"#).unwrap();
        assert_eq!(config, GameConfig::new(DEFAULT_SIZE, Difficulty::Easy));
    }

    #[test]
    fn layout_counts_adjacent_mines() {
        let layout = MineLayout::from_mine_coords(
            3,
            &[Coord2::new(0, 0), Coord2::new(2, 0), Coord2::new(0, 0)],
        )
        .unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert_eq!(layout.adjacent_mine_count(Coord2::new(1, 0)), 2);
        assert_eq!(layout.adjacent_mine_count(Coord2::new(1, 1)), 2);
        assert_eq!(layout.adjacent_mine_count(Coord2::new(0, 2)), 0);
    }

    #[test]
    fn layout_rejects_bad_mine_lists() {
        assert_eq!(
            MineLayout::from_mine_coords(3, &[Coord2::new(3, 0)]),
            Err(GameError::OutOfBounds {
                coords: Coord2::new(3, 0),
                size: 3
            })
        );
        assert_eq!(
            MineLayout::from_mine_coords(3, &[]),
            Err(ConfigError::NoMines.into())
        );

        let all: Vec<_> = (0..2)
            .flat_map(|y| (0..2).map(move |x| Coord2::new(x, y)))
            .collect();
        assert_eq!(
            MineLayout::from_mine_coords(2, &all),
            Err(ConfigError::TooManyMines { mines: 4, cells: 4 }.into())
        );
    }

    #[test]
    fn layout_rejects_sizes_above_ceiling() {
        assert_eq!(
            MineLayout::from_mine_coords(Coord::MAX, &[Coord2::new(0, 0)]),
            Err(ConfigError::SizeTooLarge(Coord::MAX).into())
        );
        assert!(MineLayout::from_mine_coords(MAX_BOARD_SIZE, &[Coord2::new(0, 0)]).is_ok());
    }

    #[test]
    fn layout_deserialization_rechecks_fields() {
        let layout = MineLayout::from_mine_coords(3, &[Coord2::new(0, 0)]).unwrap();
        let json = serde_json::to_value(&layout).unwrap();
        let restored: MineLayout = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(restored, layout);

        let mut wrong_size = json.clone();
        wrong_size["size"] = 5.into();
        assert!(serde_json::from_value::<MineLayout>(wrong_size).is_err());

        let mut wrong_count = json.clone();
        wrong_count["mine_count"] = 3.into();
        let err = serde_json::from_value::<MineLayout>(wrong_count).unwrap_err();
        assert!(err.to_string().contains("declares 3 mines"), "{err}");

        let mut no_size = json;
        no_size["size"] = 1.into();
        assert!(serde_json::from_value::<MineLayout>(no_size).is_err());
    }

    #[test]
    fn reveal_outcome_reports_changes() {
        let cell = RevealedCell {
            coords: Coord2::new(1, 1),
            mined: false,
            adjacent_mines: 2,
        };

        assert!(!RevealOutcome::Unchanged.has_update());
        assert!(RevealOutcome::Unchanged.changes().is_empty());
        assert_eq!(RevealOutcome::Revealed(vec![cell]).changes(), &[cell]);
        assert!(RevealOutcome::Won(vec![cell]).is_terminal());
        assert!(!RevealOutcome::Revealed(vec![cell]).is_terminal());
    }
}
