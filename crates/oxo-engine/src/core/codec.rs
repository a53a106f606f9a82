//! Text encoding of boards and moves.
//!
//! Boards have a compact one-line form, three rows of `X` (human), `O` (AI)
//! and `.` (empty) separated by `/`:
//!
//! ```text
//! XX./.O./...
//! ```
//!
//! Parsing is lenient about layout: whitespace and `/` are ignored, so the
//! three-line grid form parses as well. Serde uses the compact form.
//!
//! Moves are written `row,col`. When parsing, a single digit `1`-`9` is also
//! accepted and refers to the cell number shown by [`BoardGrid`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseBoardError, ParseMoveError};

use super::board::{Board, Cell, Move};

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row(), self.col())
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || ParseMoveError::Malformed(s.to_owned());

        if let [digit @ b'1'..=b'9'] = s.as_bytes() {
            let index = usize::from(digit - b'1');
            return Move::from_index(index).ok_or_else(malformed);
        }

        let mut parts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty());
        let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let row = row.parse::<usize>().map_err(|_| malformed())?;
        let col = col.parse::<usize>().map_err(|_| malformed())?;
        Move::new(row, col).ok_or(ParseMoveError::OutOfRange { row, col })
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                f.write_str("/")?;
            }
            for cell in row {
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .map(|c| Cell::from_char(c).ok_or(ParseBoardError::InvalidCell(c)))
            .collect::<Result<Vec<_>, _>>()?;
        if cells.len() != Board::CELLS {
            return Err(ParseBoardError::WrongCellCount(cells.len()));
        }

        let mut board = Board::EMPTY;
        for (mv, cell) in Move::ALL.into_iter().zip(cells) {
            board.set_cell(mv, cell);
        }
        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Multi-line rendering of a board for terminal play.
///
/// While the game is running, each empty cell shows the digit (`1`-`9`) that
/// selects it. Once the game is finished, empty cells render blank so that
/// nothing looks selectable anymore.
///
/// ```text
///  X | X | 3
/// ---+---+---
///  4 | O | 6
/// ---+---+---
///  7 | 8 | 9
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BoardGrid<'a> {
    board: &'a Board,
    finished: bool,
}

impl Board {
    #[must_use]
    pub fn grid(&self, finished: bool) -> BoardGrid<'_> {
        BoardGrid {
            board: self,
            finished,
        }
    }
}

impl fmt::Display for BoardGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (mv, cell) in self.board.cells() {
            if mv.col() == 0 && mv.row() > 0 {
                writeln!(f, "---+---+---")?;
            }
            if mv.col() > 0 {
                f.write_str("|")?;
            }
            match cell {
                Cell::Empty if self.finished => f.write_str("   ")?,
                Cell::Empty => write!(f, " {} ", mv.index() + 1)?,
                cell => write!(f, " {cell} ")?,
            }
            if mv.col() == Board::SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
