use core::fmt;
use serde::{Deserialize, Serialize};

use crate::CellIndex;

pub const FLAG_GLYPH: char = '⥜';
pub const MINE_GLYPH: char = '*';

/// True content of a cell, fixed once mines are placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    Count(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// Player-facing state of a cell during play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Opened,
}

impl CellState {
    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opened)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What the cell shows as its text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayValue {
    Blank,
    Count(u8),
    Flag,
    Mine,
}

impl DisplayValue {
    pub const fn of_value(value: CellValue) -> Self {
        match value {
            CellValue::Mine => Self::Mine,
            CellValue::Count(0) => Self::Blank,
            CellValue::Count(count) => Self::Count(count),
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Count(count) => write!(f, "{}", count),
            Self::Flag => write!(f, "{}", FLAG_GLYPH),
            Self::Mine => write!(f, "{}", MINE_GLYPH),
        }
    }
}

/// How the cell is styled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appearance {
    Hidden,
    Flagged,
    /// Opened by the player.
    Opened,
    /// Uncovered at the end of a lost game.
    Exposed,
    /// The mine that ended the game.
    Triggered,
}

/// A single change the presenter has to draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub index: CellIndex,
    pub display: DisplayValue,
    pub appearance: Appearance,
}

impl CellUpdate {
    pub const fn hidden(index: CellIndex) -> Self {
        Self {
            index,
            display: DisplayValue::Blank,
            appearance: Appearance::Hidden,
        }
    }
}
