use tracing::{debug, instrument};

use crate::{
    InvalidMoveError,
    core::{Board, GameResult, Move, Side},
};

/// One move of a game, in the order it was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayedMove {
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// A single game of tic-tac-toe with turn order enforcement.
///
/// The bare [`Board`] accepts any placement into an empty cell. The session
/// additionally requires the sides to alternate and refuses moves once the
/// game is decided, so that every board it holds is reachable by legal play.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    to_move: Side,
    history: Vec<PlayedMove>,
    result: GameResult,
}

impl Default for GameSession {
    /// A fresh game where the human moves first.
    fn default() -> Self {
        Self::new(Side::Human)
    }
}

impl GameSession {
    #[must_use]
    pub fn new(first: Side) -> Self {
        Self::from_board(Board::EMPTY, first)
    }

    /// Resumes a game from an existing position.
    ///
    /// The history starts empty; moves already on `board` are not recorded.
    #[must_use]
    pub fn from_board(board: Board, to_move: Side) -> Self {
        Self {
            board,
            to_move,
            history: Vec::with_capacity(board.remaining_moves()),
            result: board.game_result(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    #[must_use]
    pub fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    #[must_use]
    pub fn result(&self) -> GameResult {
        self.result
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_finished()
    }

    /// Plays `mv` for `side` and returns the resulting game state.
    ///
    /// On error the session is left unchanged.
    #[instrument(level = "trace", skip(self), fields(board = %self.board))]
    pub fn play(&mut self, side: Side, mv: Move) -> Result<GameResult, InvalidMoveError> {
        if self.is_finished() {
            return Err(InvalidMoveError::GameOver);
        }
        if side != self.to_move {
            return Err(InvalidMoveError::NotYourTurn(side));
        }
        self.board.place(mv, side)?;

        self.history.push(PlayedMove { side, mv });
        self.to_move = side.opponent();
        self.result = self.board.game_result();
        debug!(%side, %mv, board = %self.board, result = %self.result, "move played");
        Ok(self.result)
    }
}
