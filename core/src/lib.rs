//! Minesweeper rules on a square grid: lazy mine placement, flood reveal, flags and win/loss detection.
#![no_std]

extern crate alloc;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use presenter::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod layout;
mod presenter;
mod types;
