use alloc::collections::BTreeSet;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: draw any cell, keep it unless it is already a mine or the first move.
///
/// At 10% density almost every draw is accepted, so no retry limit is enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, grid: Grid, first_move: CellIndex) -> MineLayout {
        let cell_count = grid.cell_count();
        let requested = grid.mine_count();

        // the first move always stays free
        let available = cell_count.saturating_sub(u16::from(grid.contains(first_move)));
        let target = if requested > available {
            log::warn!(
                "Cannot fit {} mines next to the first move, placing {}",
                requested,
                available
            );
            available
        } else {
            requested
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines = BTreeSet::new();
        let mut attempts: u32 = 0;
        while (mines.len() as CellCount) < target {
            attempts += 1;
            let candidate: CellIndex = rng.random_range(0..cell_count);
            if candidate != first_move {
                mines.insert(candidate);
            }
        }
        log::debug!(
            "Placed {} mines in {} draws, first move at {}",
            mines.len(),
            attempts,
            first_move
        );

        MineLayout::from_mine_indices(grid, mines)
            .expect("sampled indices are always inside the grid")
    }
}
