use alloc::collections::BTreeSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mine positions of one session together with the value of every cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    grid: Grid,
    mines: BTreeSet<CellIndex>,
    values: Array2<CellValue>,
}

impl MineLayout {
    /// Builds the layout from a list of mine indices, duplicates collapse.
    pub fn from_mine_indices(
        grid: Grid,
        mine_indices: impl IntoIterator<Item = CellIndex>,
    ) -> Result<Self> {
        let mines = mine_indices
            .into_iter()
            .map(|index| grid.validate_index(index))
            .collect::<Result<BTreeSet<_>>>()?;

        let mut values: Array2<CellValue> = Array2::default(grid.dim());

        // every mine is in place before any count is touched
        for &mine in &mines {
            values[grid.coords_of(mine).to_nd_index()] = CellValue::Mine;
        }
        for &mine in &mines {
            for neighbor in grid.adjacent_indices(mine) {
                let value = &mut values[grid.coords_of(neighbor).to_nd_index()];
                if let CellValue::Count(count) = value {
                    *count += 1;
                }
            }
        }

        Ok(Self {
            grid,
            mines,
            values,
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.grid.cell_count() - self.mine_count()
    }

    pub fn mines(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.mines.iter().copied()
    }

    pub fn contains_mine(&self, index: CellIndex) -> bool {
        self.mines.contains(&index)
    }

    pub fn value_at(&self, index: CellIndex) -> CellValue {
        self.values[self.grid.coords_of(index).to_nd_index()]
    }

    pub fn adjacent_mine_count(&self, index: CellIndex) -> u8 {
        self.grid
            .adjacent_indices(index)
            .filter(|&neighbor| self.contains_mine(neighbor))
            .count() as u8
    }
}
