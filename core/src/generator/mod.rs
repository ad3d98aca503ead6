use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    fn generate(self, size: Coord, mines: CellCount) -> Result<MineLayout>;
}
