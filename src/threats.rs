use std::ops::Index;

use serde::Serialize;

use crate::{
    board::Position,
    util::{attacks, lines_through},
};

/// Per-cell count of the queens attacking that cell.
///
/// A queen counts once against its own cell, so a cell is zero exactly when a queen could be put
/// there without being attacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatMatrix {
    counts: Box<[Box<[i32]>]>,
    #[serde(skip)]
    n: usize,
}

// Construction.
impl ThreatMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            counts: vec![vec![0; n].into_boxed_slice(); n].into_boxed_slice(),
            n,
        }
    }

    /// Recount every cell by scanning `positions` directly.
    pub fn from_positions<'a, I>(n: usize, positions: I) -> Self
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let positions: Vec<Position> = positions.into_iter().cloned().collect();
        let mut matrix = Self::new(n);
        for row in 0..n {
            for col in 0..n {
                matrix.counts[row][col] = positions
                    .iter()
                    .filter(|&&queen| attacks(queen, (row, col)))
                    .count() as i32;
            }
        }
        matrix
    }
}

// Incremental updates.
impl ThreatMatrix {
    /// Adds `delta` to the queen's own cell and to every cell on its row, column and diagonals.
    pub fn apply(&mut self, queen: Position, delta: i32) {
        debug_assert!(delta == 1 || delta == -1, "threat delta must be +1 or -1");
        let (row, col) = queen;
        self.counts[row][col] += delta;
        for (r, c) in lines_through(self.n, queen) {
            self.counts[r][c] += delta;
        }
    }

    pub fn place(&mut self, queen: Position) {
        self.apply(queen, 1);
    }

    pub fn remove(&mut self, queen: Position) {
        self.apply(queen, -1);
    }
}

// Queries.
impl ThreatMatrix {
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn is_free(&self, (row, col): Position) -> bool {
        self.counts[row][col] == 0
    }

    /// Columns of `row` with no threats, ascending.
    pub fn free_columns(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.counts[row]
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(col, _)| col)
    }

    pub fn free_count(&self, row: usize) -> usize {
        self.free_columns(row).count()
    }

    pub fn has_free(&self, row: usize) -> bool {
        self.free_columns(row).next().is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        self.counts.iter().map(|row| &row[..])
    }
}

impl Index<Position> for ThreatMatrix {
    type Output = i32;

    fn index(&self, (row, col): Position) -> &i32 {
        &self.counts[row][col]
    }
}
