use crate::*;
pub use random::*;

mod random;

/// Chooses where the mines go once the first cell to be revealed is known.
pub trait LayoutGenerator {
    fn generate(self, grid: Grid, first_move: CellIndex) -> MineLayout;
}
