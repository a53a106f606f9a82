use oxo_engine::{Board, GameResult, GameSession, InvalidMoveError, Move, Score, Side};
use tracing::{debug, instrument};

use crate::{difficulty::DepthSelector, minimax::search};

/// A move chosen by [`AiPlayer`], with the search details behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AiMove {
    #[serde(rename = "move")]
    pub mv: Move,
    pub depth: usize,
    pub score: Score,
    pub nodes: u64,
}

/// Picks moves by running a minimax search at a depth chosen per move.
#[derive(Debug, Clone)]
pub struct AiPlayer<S> {
    selector: S,
}

impl<S> AiPlayer<S>
where
    S: DepthSelector,
{
    #[must_use]
    pub fn new(selector: S) -> Self {
        Self { selector }
    }

    #[must_use]
    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// Chooses a move for `side` on `board`.
    ///
    /// Returns `None` if the game is already decided or the board is full.
    #[instrument(level = "debug", skip(self, board), fields(board = %board))]
    pub fn choose_move(&mut self, board: &Board, side: Side) -> Option<AiMove> {
        if board.game_result().is_finished() {
            return None;
        }
        let depth = self.selector.select_depth(board.remaining_moves());
        let outcome = search(*board, depth, side);
        let mv = outcome.best_move?;
        debug!(%mv, depth, score = %outcome.score, "move chosen");
        Some(AiMove {
            mv,
            depth,
            score: outcome.score,
            nodes: outcome.nodes,
        })
    }

    /// Chooses and plays a move for the side to move in `session`.
    ///
    /// Returns `Ok(None)` without touching the session if the game is over.
    pub fn play(&mut self, session: &mut GameSession) -> Result<Option<AiMove>, InvalidMoveError> {
        let side = session.to_move();
        let Some(ai_move) = self.choose_move(session.board(), side) else {
            return Ok(None);
        };
        session.play(side, ai_move.mv)?;
        Ok(Some(ai_move))
    }
}

/// What happened during one call to [`play_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TurnReport {
    pub human_move: Move,
    /// The AI's reply, absent when the human's move ended the game.
    pub ai_move: Option<AiMove>,
    pub result: GameResult,
}

/// Plays one full turn: the human's move followed by the AI's reply.
///
/// The human move is validated first; if it is rejected the session is left
/// unchanged and the error is returned for the host to report. If the human
/// move wins or fills the board, the AI does not reply.
#[instrument(level = "debug", skip(session, ai), fields(board = %session.board()))]
pub fn play_turn<S>(
    session: &mut GameSession,
    human_move: Move,
    ai: &mut AiPlayer<S>,
) -> Result<TurnReport, InvalidMoveError>
where
    S: DepthSelector,
{
    session.play(Side::Human, human_move)?;
    let ai_move = ai.play(session)?;
    Ok(TurnReport {
        human_move,
        ai_move,
        result: session.result(),
    })
}
