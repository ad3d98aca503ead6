use ndarray::Array2;
use rand::Rng;

use super::*;

/// Places mines uniformly at random, without replacement, over the whole board.
#[derive(Debug)]
pub struct RandomMineGenerator<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomMineGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + ?Sized> MineGenerator for RandomMineGenerator<'_, R> {
    fn generate(self, size: Coord, mines: CellCount) -> Result<MineLayout> {
        check_layout(size, mines)?;

        let side = size as usize;
        let total_cells = side * side;
        let mut mine_mask = Array2::from_elem((side, side), false);

        for index in rand::seq::index::sample(self.rng, total_cells, mines as usize) {
            mine_mask[[index / side, index % side]] = true;
        }

        let layout = MineLayout::from_mine_mask(size, mine_mask);
        if layout.mine_count() != mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                mines
            );
        }
        log::debug!("Generated {size}x{size} minefield with {mines} mines");
        Ok(layout)
    }
}
