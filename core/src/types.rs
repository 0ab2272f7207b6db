use serde::{Deserialize, Serialize};

use crate::*;

/// Single coordinate axis used for the grid side, rows and columns.
pub type Coord = u8;

/// Flat cell address, `row * side + col`.
pub type CellIndex = u16;

/// Count type used for mine counts, flag counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Share of cells that hold a mine, in percent.
pub const MINE_DENSITY_PERCENT: CellCount = 10;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// `round(cells * 0.1)`, with halves rounded up.
pub const fn mine_count_for(cells: CellCount) -> CellCount {
    let scaled = cells as u32 * MINE_DENSITY_PERCENT as u32;
    ((scaled + 50) / 100) as CellCount
}

/// Side length of a square grid, always within `(5, 25]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize(Coord);

impl GridSize {
    /// Smallest playable side.
    pub const MIN: Coord = 6;
    /// Largest playable side.
    pub const MAX: Coord = 25;

    pub fn new(side: u32) -> Result<Self> {
        if (Self::MIN as u32..=Self::MAX as u32).contains(&side) {
            Ok(Self(side as Coord))
        } else {
            Err(GameError::InvalidGridSize)
        }
    }

    /// Pulls any requested side into the playable range.
    pub fn clamped(side: i64) -> Self {
        Self(side.clamp(Self::MIN.into(), Self::MAX.into()) as Coord)
    }

    pub const fn side(self) -> Coord {
        self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(10)
    }
}

/// Addressing for a square grid of `side * side` cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    side: Coord,
}

impl Grid {
    pub const fn new(size: GridSize) -> Self {
        Self { side: size.side() }
    }

    pub const fn side(self) -> Coord {
        self.side
    }

    pub const fn cell_count(self) -> CellCount {
        let side = self.side as CellCount;
        side * side
    }

    pub const fn mine_count(self) -> CellCount {
        mine_count_for(self.cell_count())
    }

    pub const fn contains(self, index: CellIndex) -> bool {
        index < self.cell_count()
    }

    pub fn validate_index(self, index: CellIndex) -> Result<CellIndex> {
        if self.contains(index) {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub const fn coords_of(self, index: CellIndex) -> Coord2 {
        let side = self.side as CellIndex;
        ((index / side) as Coord, (index % side) as Coord)
    }

    pub const fn index_of(self, (row, col): Coord2) -> CellIndex {
        row as CellIndex * self.side as CellIndex + col as CellIndex
    }

    pub fn indices(self) -> impl Iterator<Item = CellIndex> {
        0..self.cell_count()
    }

    /// Up to eight neighbours of `index`, never wrapping across a row edge.
    pub fn adjacent_indices(self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(self, self.coords_of(index))
    }

    pub(crate) fn dim(self) -> (usize, usize) {
        (self.side.into(), self.side.into())
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), side: Coord) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= side {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= side {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    grid: Grid,
    center: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(grid: Grid, center: Coord2) -> Self {
        Self {
            grid,
            center,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(coords) = apply_delta(self.center, delta, self.grid.side) {
                return Some(self.grid.index_of(coords));
            }
        }
    }
}
