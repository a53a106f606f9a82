use std::ops::{Deref, DerefMut};

use oxo_engine::{Board, Cell, Move, Score, Side};
use tracing::{debug, instrument, trace};

/// Outcome of a depth-limited minimax search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchOutcome {
    /// Best move for the searching side, or `None` when the search stopped at
    /// the root (depth 0, decided game, or full board).
    pub best_move: Option<Move>,
    /// Score of the position after `best_move`, or of the root itself when
    /// there is no move.
    pub score: Score,
    /// Number of positions visited, the root included.
    pub nodes: u64,
}

/// Searches `board` for the best move of `side`, looking `depth` plies ahead.
///
/// The AI maximizes [`Score`] and the human minimizes it. Moves are tried in
/// [`Board::legal_moves`] order and a candidate only replaces the current best
/// when it is strictly better, so among equally scored moves the first one in
/// row-major order is returned.
///
/// Positions are only scored by whether somebody has won, so at the depth
/// cutoff an undecided position counts as a draw.
///
/// The board is taken by value: the search works on its own copy, placing
/// and removing marks as it goes, and the caller's board never changes.
///
/// # Example
///
/// ```
/// use oxo_ai::search;
/// use oxo_engine::{Board, Move, Side};
///
/// let board: Board = "XX./.O./...".parse().unwrap();
/// let outcome = search(board, 9, Side::Ai);
///
/// // The AI has to block the top row
/// assert_eq!(outcome.best_move, Move::new(0, 2));
/// ```
#[instrument(level = "debug", skip(board), fields(board = %board))]
#[must_use]
pub fn search(board: Board, depth: usize, side: Side) -> SearchOutcome {
    let mut board = board;
    let mut nodes = 0;
    let (best_move, score) = minimax(&mut board, depth, side, &mut nodes);
    debug!(
        best_move = best_move.map(tracing::field::display),
        %score,
        nodes,
        "search finished"
    );
    SearchOutcome {
        best_move,
        score,
        nodes,
    }
}

/// Like [`search`], but returns only the move.
#[must_use]
pub fn best_move(board: Board, depth: usize, side: Side) -> Option<Move> {
    search(board, depth, side).best_move
}

fn minimax(board: &mut Board, depth: usize, side: Side, nodes: &mut u64) -> (Option<Move>, Score) {
    *nodes += 1;
    if depth == 0 || board.wins(Side::Human) || board.wins(Side::Ai) {
        return (None, board.evaluate());
    }

    let mut best: Option<(Move, Score)> = None;
    for mv in board.legal_moves() {
        let score = {
            let mut placed = PlacedMark::new(board, mv, side);
            let (_, score) = minimax(&mut placed, depth - 1, side.opponent(), nodes);
            score
        };
        trace!(depth, %side, %mv, %score, "candidate scored");
        if best.is_none_or(|(_, best_score)| score.improves_on(best_score, side)) {
            best = Some((mv, score));
        }
    }

    match best {
        Some((mv, score)) => (Some(mv), score),
        // Full board without a winner
        None => (None, board.evaluate()),
    }
}

/// A mark placed on the board for the duration of one search branch.
///
/// The cell is emptied again when the guard is dropped, on every exit path.
struct PlacedMark<'a> {
    board: &'a mut Board,
    mv: Move,
}

impl<'a> PlacedMark<'a> {
    fn new(board: &'a mut Board, mv: Move, side: Side) -> Self {
        debug_assert!(board.cell(mv).is_empty());
        board.set_cell(mv, side.into());
        Self { board, mv }
    }
}

impl Deref for PlacedMark<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for PlacedMark<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for PlacedMark<'_> {
    fn drop(&mut self) {
        self.board.set_cell(self.mv, Cell::Empty);
    }
}
