//! Game flow on top of the board model.
//!
//! - [`GameSession`] - A single game: board, side to move, move history and result
//! - [`PlayedMove`] - One entry of the move history
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] with the side that moves first
//! 2. Each side plays through [`GameSession::play`], which rejects occupied
//!    cells, out-of-turn moves and moves after the game has ended
//! 3. Stop once [`GameSession::result`] is finished
//!
//! # Example
//!
//! ```
//! use oxo_engine::{GameResult, GameSession, Move, Side};
//!
//! let mut session = GameSession::new(Side::Human);
//! let result = session.play(Side::Human, Move::new(1, 1).unwrap()).unwrap();
//!
//! assert_eq!(result, GameResult::InProgress);
//! assert_eq!(session.to_move(), Side::Ai);
//! ```

pub use self::session::*;

mod session;
