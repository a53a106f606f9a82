use crate::InvalidMoveError;

/// The two players of a game.
///
/// `Human` is the side that moves first in a normal game and is the one the
/// score minimizes; `Ai` is the maximizing side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[display("human")]
    Human,
    #[display("ai")]
    Ai,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Ai,
            Side::Ai => Side::Human,
        }
    }
}

/// State of a single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty,
    Human,
    Ai,
}

impl Cell {
    /// Returns the side occupying this cell, if any.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Human => Some(Side::Human),
            Cell::Ai => Some(Side::Ai),
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Human => 'X',
            Cell::Ai => 'O',
        }
    }

    /// Parses a cell from its text representation.
    ///
    /// Accepts `X`/`O` in either case and `.` or `_` for an empty cell.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::Human),
            'O' | 'o' => Some(Cell::Ai),
            _ => None,
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Human => Cell::Human,
            Side::Ai => Cell::Ai,
        }
    }
}

/// A cell coordinate on the board.
///
/// Both `row` and `col` are always in `0..3`. Whether the move is legal
/// depends on the board it is played on (the target cell must be empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    row: usize,
    col: usize,
}

impl Move {
    /// Every cell of the board in row-major order.
    pub const ALL: [Self; Board::CELLS] = {
        let mut moves = [Move { row: 0, col: 0 }; Board::CELLS];
        let mut i = 0;
        while i < Board::CELLS {
            moves[i] = Move {
                row: i / Board::SIZE,
                col: i % Board::SIZE,
            };
            i += 1;
        }
        moves
    };

    /// Returns `None` if either coordinate is outside the board.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < Board::SIZE && col < Board::SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Returns the move for a row-major cell index (`0..9`).
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Board::CELLS {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Row-major index of the cell (`0..9`).
    #[must_use]
    pub const fn index(self) -> usize {
        self.row * Board::SIZE + self.col
    }
}

/// A 3×3 tic-tac-toe board.
///
/// `Board` is a plain `Copy` value: handing a board to the search always hands
/// over a private copy, so nothing the search does can leak back into the
/// caller's board.
///
/// The board does not track whose turn it is and does not enforce alternation;
/// use [`GameSession`](crate::GameSession) for that.
///
/// # Example
///
/// ```
/// use oxo_engine::{Board, Cell, Move, Side};
///
/// let mut board = Board::EMPTY;
/// let center = Move::new(1, 1).unwrap();
///
/// board.place(center, Side::Ai).unwrap();
/// assert_eq!(board.cell(center), Cell::Ai);
///
/// // Playing into an occupied cell is rejected and leaves the board intact
/// assert!(board.place(center, Side::Human).is_err());
/// assert_eq!(board.occupied_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Cell; Board::SIZE]; Board::SIZE],
}

impl Board {
    pub const SIZE: usize = 3;
    pub const CELLS: usize = Self::SIZE * Self::SIZE;

    pub const EMPTY: Self = Self {
        cells: [[Cell::Empty; Self::SIZE]; Self::SIZE],
    };

    #[must_use]
    pub const fn cell(&self, mv: Move) -> Cell {
        self.cells[mv.row][mv.col]
    }

    /// Overwrites a cell without any legality check.
    ///
    /// Intended for search backtracking and for setting up positions; game
    /// flow should go through [`Self::place`].
    pub const fn set_cell(&mut self, mv: Move, cell: Cell) {
        self.cells[mv.row][mv.col] = cell;
    }

    /// Places `side` on an empty cell.
    ///
    /// Returns [`InvalidMoveError::Occupied`] and leaves the board untouched if
    /// the cell is already taken.
    pub fn place(&mut self, mv: Move, side: Side) -> Result<(), InvalidMoveError> {
        if !self.cell(mv).is_empty() {
            return Err(InvalidMoveError::Occupied(mv));
        }
        self.set_cell(mv, side.into());
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; Self::SIZE]> {
        self.cells.iter()
    }

    /// Iterates over all cells in row-major order, paired with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (Move, Cell)> + '_ {
        Move::ALL.into_iter().map(|mv| (mv, self.cell(mv)))
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells().filter(|(_, cell)| !cell.is_empty()).count()
    }

    /// Number of empty cells left.
    #[must_use]
    pub fn remaining_moves(&self) -> usize {
        Self::CELLS - self.occupied_count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.remaining_moves() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert_eq!(board, Board::default());
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.remaining_moves(), 9);
        assert!(!board.is_full());
        for (_, cell) in board.cells() {
            assert_eq!(cell, Cell::Empty);
        }
    }

    #[test]
    fn test_move_bounds() {
        assert!(Move::new(0, 0).is_some());
        assert!(Move::new(2, 2).is_some());
        assert!(Move::new(3, 0).is_none());
        assert!(Move::new(0, 3).is_none());
        assert!(Move::from_index(9).is_none());
    }

    #[test]
    fn test_move_all_is_row_major() {
        for (i, mv) in Move::ALL.into_iter().enumerate() {
            assert_eq!(mv.index(), i);
            assert_eq!(Move::from_index(i), Some(mv));
            assert_eq!(mv.row(), i / 3);
            assert_eq!(mv.col(), i % 3);
        }
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut board = Board::EMPTY;
        let mv = Move::new(0, 2).unwrap();

        board.place(mv, Side::Human).unwrap();
        let before = board;

        assert_eq!(
            board.place(mv, Side::Ai),
            Err(InvalidMoveError::Occupied(mv))
        );
        assert_eq!(board, before);
        assert_eq!(board.cell(mv), Cell::Human);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::EMPTY;
        for (i, mv) in Move::ALL.into_iter().enumerate() {
            let side = if i % 2 == 0 { Side::Human } else { Side::Ai };
            board.place(mv, side).unwrap();
        }
        assert!(board.is_full());
        assert_eq!(board.occupied_count(), 9);
    }

    #[test]
    fn test_side_opponent_and_cell_conversion() {
        assert_eq!(Side::Human.opponent(), Side::Ai);
        assert_eq!(Side::Ai.opponent(), Side::Human);
        assert_eq!(Cell::from(Side::Human).side(), Some(Side::Human));
        assert_eq!(Cell::from(Side::Ai).side(), Some(Side::Ai));
        assert_eq!(Cell::Empty.side(), None);
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("human".parse::<Side>().unwrap(), Side::Human);
        assert_eq!("Ai".parse::<Side>().unwrap(), Side::Ai);
        assert!("robot".parse::<Side>().is_err());
    }

    #[test]
    fn test_cell_char_conversion() {
        for cell in [Cell::Empty, Cell::Human, Cell::Ai] {
            assert_eq!(Cell::from_char(cell.as_char()), Some(cell));
        }
        assert_eq!(Cell::from_char('x'), Some(Cell::Human));
        assert_eq!(Cell::from_char('o'), Some(Cell::Ai));
        assert_eq!(Cell::from_char('_'), Some(Cell::Empty));
        assert_eq!(Cell::from_char('?'), None);
    }
}
