use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board side must be at least 1")]
    InvalidSize,
    #[error("A board needs at least one mine")]
    NoMines,
    #[error("Too many mines, at most {max} fit around a safe first click")]
    TooManyMines { max: CellCount },
    #[error("Unknown difficulty, expected one of small, medium, large")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
