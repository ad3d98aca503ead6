use core::fmt;

use serde::{Deserialize, Serialize};

/// Single coordinate axis, used for positions and for the board side length.
///
/// Signed so that a caller can hand in a negative position and get an
/// `OutOfBounds` error back instead of a wrapped-around index.
pub type Coord = i16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Grid position `(x, y)`, `x` is the column and `y` the row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord2 {
    pub x: Coord,
    pub y: Coord,
}

impl Coord2 {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Shifts by `(dx, dy)`, `None` only if the result does not fit in `Coord`.
    pub fn offset(self, (dx, dy): (Coord, Coord)) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// The 8 surrounding positions, with no bounds applied.
    pub fn neighbors(self) -> impl Iterator<Item = Coord2> {
        DISPLACEMENTS
            .into_iter()
            .filter_map(move |delta| self.offset(delta))
    }

    /// Whether the position lies on a `size` by `size` board.
    pub const fn is_within(self, size: Coord) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }
}

impl From<(Coord, Coord)> for Coord2 {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Row-major: the first axis is `y`. Only meaningful for in-bounds positions.
impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.y as usize, self.x as usize]
    }
}

pub const fn square(size: Coord) -> CellCount {
    if size <= 0 {
        return 0;
    }
    let size = size as CellCount;
    size.saturating_mul(size)
}

const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Neighbors of `center` that stay on a `bounds` by `bounds` board.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = self.center.offset(delta) {
                if next_item.is_within(self.bounds) {
                    return Some(next_item);
                }
            }
        }
    }
}
