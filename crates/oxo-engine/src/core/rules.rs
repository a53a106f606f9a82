use std::fmt;

use arrayvec::ArrayVec;

use super::board::{Board, Cell, Move, Side};
use crate::InvalidScoreError;

const fn m(row: usize, col: usize) -> Move {
    match Move::new(row, col) {
        Some(mv) => mv,
        None => panic!("win line cell outside the board"),
    }
}

/// The 8 lines that win when uniformly occupied by one side.
pub const WIN_LINES: [[Move; 3]; 8] = [
    // Rows
    [m(0, 0), m(0, 1), m(0, 2)],
    [m(1, 0), m(1, 1), m(1, 2)],
    [m(2, 0), m(2, 1), m(2, 2)],
    // Columns
    [m(0, 0), m(1, 0), m(2, 0)],
    [m(0, 1), m(1, 1), m(2, 1)],
    [m(0, 2), m(1, 2), m(2, 2)],
    // Diagonals
    [m(0, 0), m(1, 1), m(2, 2)],
    [m(2, 0), m(1, 1), m(0, 2)],
];

/// Leaf evaluation of a position, from the AI's point of view.
///
/// Only three values exist: [`Score::HUMAN_WIN`] (-1), [`Score::DRAW`] (0,
/// also used for positions cut off before the game ended) and
/// [`Score::AI_WIN`] (+1).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "i8", into = "i8")]
pub struct Score(i8);

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("0"),
            value => write!(f, "{value:+}"),
        }
    }
}

impl TryFrom<i8> for Score {
    type Error = InvalidScoreError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1..=1 => Ok(Self(value)),
            _ => Err(InvalidScoreError(value)),
        }
    }
}

impl From<Score> for i8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl Score {
    pub const HUMAN_WIN: Self = Self(-1);
    pub const DRAW: Self = Self(0);
    pub const AI_WIN: Self = Self(1);

    #[must_use]
    pub const fn value(self) -> i8 {
        self.0
    }

    /// Returns whether `self` is strictly better than `incumbent` for `side`.
    ///
    /// The AI maximizes the score and the human minimizes it. Equal scores
    /// never improve, so the first candidate reaching a value is kept.
    #[must_use]
    pub fn improves_on(self, incumbent: Self, side: Side) -> bool {
        match side {
            Side::Ai => self > incumbent,
            Side::Human => self < incumbent,
        }
    }
}

/// Classification of a position for the host.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    #[display("human wins")]
    HumanWins,
    #[display("AI wins")]
    AiWins,
    #[display("draw")]
    Draw,
    #[display("in progress")]
    InProgress,
}

impl GameResult {
    #[must_use]
    pub fn is_finished(self) -> bool {
        !self.is_in_progress()
    }

    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            GameResult::HumanWins => Some(Side::Human),
            GameResult::AiWins => Some(Side::Ai),
            GameResult::Draw | GameResult::InProgress => None,
        }
    }
}

impl Board {
    /// Returns whether any of the [`WIN_LINES`] is fully occupied by `side`.
    #[must_use]
    pub fn wins(&self, side: Side) -> bool {
        let target = Cell::from(side);
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&mv| self.cell(mv) == target))
    }

    /// Returns the side holding a win line, checking the AI first.
    ///
    /// Both sides can only win at once on boards unreachable by alternating
    /// play; the AI-first order just makes the answer well-defined there.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        [Side::Ai, Side::Human]
            .into_iter()
            .find(|&side| self.wins(side))
    }

    /// Scores the position: +1 if the AI has won, -1 if the human has, 0 otherwise.
    #[must_use]
    pub fn evaluate(&self) -> Score {
        match self.winner() {
            Some(Side::Ai) => Score::AI_WIN,
            Some(Side::Human) => Score::HUMAN_WIN,
            None => Score::DRAW,
        }
    }

    /// Returns every empty cell in row-major order.
    ///
    /// The order is part of the contract: the search iterates moves in this
    /// order and keeps the first of equally scored moves.
    #[must_use]
    pub fn legal_moves(&self) -> ArrayVec<Move, { Board::CELLS }> {
        self.cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(mv, _)| mv)
            .collect()
    }

    #[must_use]
    pub fn game_result(&self) -> GameResult {
        match self.winner() {
            Some(Side::Ai) => GameResult::AiWins,
            Some(Side::Human) => GameResult::HumanWins,
            None if self.legal_moves().is_empty() => GameResult::Draw,
            None => GameResult::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every assignment of the three cell states to the nine cells.
    fn all_boards() -> impl Iterator<Item = Board> {
        (0..3_usize.pow(9)).map(|mut code| {
            let mut board = Board::EMPTY;
            for mv in Move::ALL {
                let cell = match code % 3 {
                    0 => Cell::Empty,
                    1 => Cell::Human,
                    _ => Cell::Ai,
                };
                board.set_cell(mv, cell);
                code /= 3;
            }
            board
        })
    }

    #[test]
    fn test_each_line_wins() {
        for side in [Side::Human, Side::Ai] {
            for line in WIN_LINES {
                let mut board = Board::EMPTY;
                for mv in line {
                    board.place(mv, side).unwrap();
                }
                assert!(board.wins(side), "{board} should win for {side}");
                assert!(!board.wins(side.opponent()));
            }
        }
    }

    #[test]
    fn test_wins_iff_uniform_line() {
        for board in all_boards() {
            for side in [Side::Human, Side::Ai] {
                let expected = WIN_LINES
                    .iter()
                    .any(|line| line.iter().all(|&mv| board.cell(mv).side() == Some(side)));
                assert_eq!(board.wins(side), expected, "board {board}, side {side}");
            }
        }
    }

    #[test]
    fn test_no_win_on_broken_line() {
        let board: Board = "XXO/.../...".parse().unwrap();
        assert!(!board.wins(Side::Human));
        assert!(!board.wins(Side::Ai));
        assert_eq!(board.evaluate(), Score::DRAW);
    }

    #[test]
    fn test_evaluate() {
        assert_eq!(Board::EMPTY.evaluate(), Score::DRAW);
        let ai: Board = "OOO/XX./X..".parse().unwrap();
        assert_eq!(ai.evaluate(), Score::AI_WIN);
        let human: Board = "XO./XO./X..".parse().unwrap();
        assert_eq!(human.evaluate(), Score::HUMAN_WIN);
    }

    #[test]
    fn test_evaluate_checks_ai_first() {
        let both: Board = "XXX/OOO/...".parse().unwrap();
        assert_eq!(both.winner(), Some(Side::Ai));
        assert_eq!(both.evaluate(), Score::AI_WIN);
        assert_eq!(both.game_result(), GameResult::AiWins);
    }

    #[test]
    fn test_legal_moves_row_major() {
        let board: Board = "X.O/.X./O..".parse().unwrap();
        let moves: Vec<_> = board.legal_moves().iter().map(|mv| mv.index()).collect();
        assert_eq!(moves, [1, 3, 5, 7, 8]);
    }

    #[test]
    fn test_legal_moves_plus_occupied_is_nine() {
        for board in all_boards() {
            assert_eq!(board.legal_moves().len() + board.occupied_count(), 9);
        }
    }

    #[test]
    fn test_legal_moves_empty_iff_full() {
        assert_eq!(Board::EMPTY.legal_moves().len(), 9);
        let full: Board = "XOX/XOO/OXX".parse().unwrap();
        assert!(full.legal_moves().is_empty());
        assert!(full.is_full());
    }

    #[test]
    fn test_game_result() {
        assert_eq!(Board::EMPTY.game_result(), GameResult::InProgress);

        let draw: Board = "XOX/XOO/OXX".parse().unwrap();
        assert_eq!(draw.game_result(), GameResult::Draw);

        let human: Board = "XXX/OO./...".parse().unwrap();
        assert_eq!(human.game_result(), GameResult::HumanWins);
        assert_eq!(human.game_result().winner(), Some(Side::Human));

        // A full board with a completed line is a win, not a draw
        let full_win: Board = "XXX/OOX/XOO".parse().unwrap();
        assert_eq!(full_win.game_result(), GameResult::HumanWins);
    }

    #[test]
    fn test_score_ordering() {
        assert!(Score::AI_WIN.improves_on(Score::DRAW, Side::Ai));
        assert!(!Score::DRAW.improves_on(Score::DRAW, Side::Ai));
        assert!(Score::HUMAN_WIN.improves_on(Score::DRAW, Side::Human));
        assert!(!Score::AI_WIN.improves_on(Score::DRAW, Side::Human));
        assert_eq!(Score::AI_WIN.to_string(), "+1");
        assert_eq!(Score::HUMAN_WIN.to_string(), "-1");
        assert_eq!(Score::DRAW.to_string(), "0");
    }

    #[test]
    fn test_score_serialization_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&Score::HUMAN_WIN).unwrap(), "-1");
        assert_eq!(serde_json::from_str::<Score>("1").unwrap(), Score::AI_WIN);
        assert_eq!(serde_json::from_str::<Score>("0").unwrap(), Score::DRAW);
        assert!(serde_json::from_str::<Score>("5").is_err());
        assert!(serde_json::from_str::<Score>("-2").is_err());
        assert_eq!(Score::try_from(2), Err(InvalidScoreError(2)));
    }
}
