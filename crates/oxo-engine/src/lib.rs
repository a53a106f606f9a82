//! Board model and rules for 3×3 tic-tac-toe.
//!
//! - [`core`] holds the value types ([`Cell`], [`Side`], [`Move`], [`Board`]),
//!   the win/draw rules and the text codec used to pass boards around.
//! - [`engine`] holds [`GameSession`], which applies moves in turn order and
//!   records the history of a single game.
//!
//! Search and difficulty live in the `oxo-ai` crate; this crate has no notion
//! of which move is good, only of which moves are legal.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidMoveError {
    #[display("cell {_0} is already occupied")]
    Occupied(#[error(not(source))] Move),
    #[display("it is not {_0}'s turn")]
    NotYourTurn(#[error(not(source))] Side),
    #[display("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseMoveError {
    #[display("invalid move {_0:?}: expected `row,col` with row and col in 0..3, or a cell number 1-9")]
    Malformed(#[error(not(source))] String),
    #[display("move ({row}, {col}) is outside the board")]
    OutOfRange { row: usize, col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("invalid cell character {_0:?} (expected `X`, `O` or `.`)")]
    InvalidCell(#[error(not(source))] char),
    #[display("expected 9 cells, got {_0}")]
    WrongCellCount(#[error(not(source))] usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("score {_0} is outside -1..=1")]
pub struct InvalidScoreError(#[error(not(source))] i8);
