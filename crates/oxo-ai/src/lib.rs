//! Computer opponent for `oxo-engine`.
//!
//! - [`search`] - Depth-limited minimax over a [`Board`](oxo_engine::Board)
//! - [`DepthSelector`] - Chooses the search depth for each move; [`DifficultySelector`]
//!   draws it from a [`Difficulty`] preset with a seeded RNG
//! - [`AiPlayer`] and [`play_turn`] - Tie the search to a
//!   [`GameSession`](oxo_engine::GameSession): the human moves, then the AI replies

pub use self::{difficulty::*, minimax::*, turn::*};

mod difficulty;
mod minimax;
mod turn;
