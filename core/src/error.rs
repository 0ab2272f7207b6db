use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index is outside the grid")]
    InvalidIndex,
    #[error("Grid side must be greater than 5 and at most 25")]
    InvalidGridSize,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Mines are not placed yet, the first move must be a reveal")]
    NotStarted,
    #[error("No flags left to place")]
    NoFlagsLeft,
}

pub type Result<T> = core::result::Result<T, GameError>;
