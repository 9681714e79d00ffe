use itertools::Itertools;
use thiserror::Error;

use crate::util::{ray, DIAGONAL};

/// A `(row, col)` pair, 0-indexed.
pub type Position = (usize, usize);

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("board size must be at least 1, got {0}")]
    InvalidSize(usize),
    #[error("position {0:?} is off the board")]
    OutOfBounds(Position),
    #[error("malformed board: {0}")]
    MalformedBoard(String),
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),
}

/// An N-by-N grid of queen occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Box<[Box<[bool]>]>,
    n: usize,
}

// Helpers
impl Board {
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn is_loc(&self, (row, col): Position) -> bool {
        (0..self.n).contains(&row) && (0..self.n).contains(&col)
    }

    /// Every cell, in row-major order.
    pub fn all_locs(&self) -> impl Iterator<Item = Position> {
        (0..self.n).cartesian_product(0..self.n)
    }

    pub fn has_queen(&self, (row, col): Position) -> bool {
        self.cells[row][col]
    }

    /// Occupied cells, in row-major order.
    pub fn queens(&self) -> impl Iterator<Item = Position> + '_ {
        self.all_locs().filter(move |&loc| self.has_queen(loc))
    }

    pub fn is_empty(&self) -> bool {
        self.queens().next().is_none()
    }
}

// Constructors
impl Board {
    pub fn new(n: usize) -> Result<Self, Error> {
        if n < 1 {
            return Err(Error::InvalidSize(n));
        }
        let cells = vec![vec![false; n].into_boxed_slice(); n].into_boxed_slice();
        Ok(Self { cells, n })
    }

    /// Parses a square board written one row per line, `Q` for a queen and `.` for an empty cell.
    pub fn from_save(save: &[u8]) -> Result<Self, Error> {
        let mut rows = vec![];
        let mut row = vec![];
        for &byte in save {
            match byte {
                b'\n' => {
                    rows.push(row.into_boxed_slice());
                    row = vec![];
                }
                b'\r' => (),
                b'Q' => row.push(true),
                b'.' => row.push(false),
                other => {
                    return Err(Error::MalformedBoard(format!(
                        "unexpected character {:?}",
                        other as char
                    )))
                }
            }
        }
        if !row.is_empty() {
            rows.push(row.into_boxed_slice());
        }

        // Validate board size.
        let n = rows.len();
        if n == 0 {
            return Err(Error::InvalidSize(0));
        }
        if let Some((i, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(Error::MalformedBoard(format!(
                "row {} has {} cells, expected {}",
                i,
                bad.len(),
                n
            )));
        }

        Ok(Self {
            cells: rows.into_boxed_slice(),
            n,
        })
    }
}

// Placing and removing.
impl Board {
    pub fn place(&mut self, (row, col): Position) {
        self.cells[row][col] = true;
    }

    pub fn clear(&mut self, (row, col): Position) {
        self.cells[row][col] = false;
    }

    /// A copy of this board with one more queen on it.
    pub fn with_queen(&self, loc: Position) -> Self {
        let mut board = self.clone();
        board.place(loc);
        board
    }
}

// Safety checks.
impl Board {
    /// Whether a queen could go on `loc` without sharing a column or a diagonal with another queen.
    /// The row is not scanned, since the search never puts two queens in a row. The diagonal scan
    /// includes `loc` itself, so an occupied cell is never safe.
    pub fn is_safe(&self, loc: Position) -> bool {
        let (row, col) = loc;
        if (0..self.n).any(|r| r != row && self.cells[r][col]) {
            return false;
        }
        if self.has_queen(loc) {
            return false;
        }
        DIAGONAL
            .iter()
            .all(|&dir| ray(self.n, loc, dir).all(|cell| !self.has_queen(cell)))
    }

    /// Number of columns in `row` that pass `is_safe`.
    pub fn safe_count_in_row(&self, row: usize) -> usize {
        (0..self.n).filter(|&col| self.is_safe((row, col))).count()
    }

    /// Number of cells on the whole board that pass `is_safe`.
    pub fn safe_count(&self) -> usize {
        self.all_locs().filter(|&loc| self.is_safe(loc)).count()
    }
}
