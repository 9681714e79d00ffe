//! The backtracking search over rows.
//!
//! One `Engine` covers every combination of variable ordering, value ordering and filtering. It
//! owns the board, the threat matrix (when the strategy needs one), the stack of placed queens and
//! the set of filled rows for as long as it lives, and resets them at the start of each run.

pub mod filter;
pub mod observer;
pub mod ordering;
pub mod strategy;

use std::sync::{
    atomic::{AtomicBool, Ordering as AtomicOrdering},
    Arc,
};

use indexmap::IndexSet;
use log::{debug, warn};
use serde::Serialize;

use self::{
    observer::{Observer, Silent, Step, StepKind},
    strategy::{Filtering, Strategy},
};
use crate::{
    board::{Board, Error, Position},
    threats::ThreatMatrix,
    util::attacks,
    CHECK_INVARIANTS,
};

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct Counters {
    /// Placements plus removals.
    pub steps: usize,
    pub placements: usize,
    pub backtracks: usize,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Solved,
    /// Every branch failed. This is an answer, not an error.
    Exhausted,
    /// The cancel flag was cleared. Queens placed so far stay on the board.
    Cancelled,
}

/// The state a failed branch has to hand back untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    board: Board,
    threats: Option<ThreatMatrix>,
    positions: Vec<Position>,
    used_rows: IndexSet<usize>,
}

pub struct Engine {
    n: usize,
    strategy: Strategy,
    board: Board,
    threats: Option<ThreatMatrix>,
    positions: Vec<Position>,
    used_rows: IndexSet<usize>,
    counters: Counters,
    active: Option<Arc<AtomicBool>>,
    outcome: Option<Outcome>,
}

// Construction.
impl Engine {
    pub fn configure(n: usize, strategy: Strategy) -> Result<Self, Error> {
        let board = Board::new(n)?;
        Ok(Self {
            n,
            strategy,
            board,
            threats: strategy.tracks_threats().then(|| ThreatMatrix::new(n)),
            positions: vec![],
            used_rows: IndexSet::new(),
            counters: Counters::default(),
            active: None,
            outcome: None,
        })
    }

    /// Attach a "still active" flag. The search checks it before each row and gives up as soon as
    /// it reads `false`.
    pub fn with_cancel_flag(mut self, active: Arc<AtomicBool>) -> Self {
        self.active = Some(active);
        self
    }
}

// Observable state.
impl Engine {
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn threats(&self) -> Option<&ThreatMatrix> {
        self.threats.as_ref()
    }

    /// Queens on the board, in the order they were placed.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn used_rows(&self) -> &IndexSet<usize> {
        &self.used_rows
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// How the last run ended, if there was one.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn solution(&self) -> Option<&[Position]> {
        match self.outcome {
            Some(Outcome::Solved) => Some(&self.positions),
            _ => None,
        }
    }
}

// Running a search.
impl Engine {
    pub fn solve(&mut self) -> bool {
        self.solve_with(&mut Silent)
    }

    pub fn solve_with<O: Observer>(&mut self, observer: &mut O) -> bool {
        self.reset();
        debug!("solving {}-queens with {}", self.n, self.strategy);
        let outcome = self.search(observer);
        self.finish(outcome)
    }

    pub fn repair_and_solve<I>(&mut self, seeds: I) -> Result<bool, Error>
    where
        I: IntoIterator<Item = Position>,
    {
        self.repair_and_solve_with(seeds, &mut Silent)
    }

    /// Start from a given, possibly conflicting, set of queens. Seeds are placed in order, then the
    /// queen attacked by the most others is removed (the latest one on ties) until no two queens
    /// attack each other, and the search carries on from whatever is left. If the search fails,
    /// the board holds the surviving seeds.
    pub fn repair_and_solve_with<I, O>(&mut self, seeds: I, observer: &mut O) -> Result<bool, Error>
    where
        I: IntoIterator<Item = Position>,
        O: Observer,
    {
        let seeds: IndexSet<Position> = seeds.into_iter().collect();
        if let Some(&off_board) = seeds.iter().find(|&&seed| !self.board.is_loc(seed)) {
            return Err(Error::OutOfBounds(off_board));
        }

        self.reset();
        for &seed in &seeds {
            self.put(seed);
            self.notify(StepKind::Placed, seed, observer);
        }
        self.resolve_conflicts(observer);
        self.used_rows = self.positions.iter().map(|&(row, _)| row).collect();
        self.check_rows();
        debug!(
            "kept {} of {} seeds, solving {}-queens with {}",
            self.positions.len(),
            seeds.len(),
            self.n,
            self.strategy,
        );

        let outcome = self.search(observer);
        Ok(self.finish(outcome))
    }

    fn reset(&mut self) {
        for &queen in &self.positions {
            self.board.clear(queen);
        }
        self.positions.clear();
        self.used_rows.clear();
        if let Some(threats) = &mut self.threats {
            *threats = ThreatMatrix::new(self.n);
        }
        self.counters = Counters::default();
        self.outcome = None;
    }

    fn finish(&mut self, outcome: Outcome) -> bool {
        self.outcome = Some(outcome);
        let Counters {
            steps,
            placements,
            backtracks,
        } = self.counters;
        match outcome {
            Outcome::Cancelled => warn!(
                "search cancelled after {} steps with {} queens on the board",
                steps,
                self.positions.len(),
            ),
            _ => debug!(
                "{:?} after {} steps ({} placements, {} backtracks)",
                outcome, steps, placements, backtracks,
            ),
        }
        outcome == Outcome::Solved
    }

    fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .map_or(true, |active| active.load(AtomicOrdering::SeqCst))
    }
}

// The search itself.
impl Engine {
    fn search<O: Observer>(&mut self, observer: &mut O) -> Outcome {
        if self.used_rows.len() == self.n {
            return Outcome::Solved;
        }
        if !self.is_active() {
            return Outcome::Cancelled;
        }

        let row = match ordering::select_row(
            self.strategy.variable,
            &self.board,
            self.threats.as_ref(),
            &self.used_rows,
        ) {
            Some(row) => row,
            None => return Outcome::Solved,
        };

        let pruned = match (self.strategy.filtering, &self.threats) {
            (Filtering::ForwardChecking, Some(threats)) => {
                if !filter::forward_check(threats, &self.used_rows) {
                    return Outcome::Exhausted;
                }
                IndexSet::new()
            }
            (Filtering::ArcConsistency, Some(threats)) => {
                filter::arc_consistency(threats, &self.used_rows, row)
            }
            _ => IndexSet::new(),
        };
        let candidates = self
            .safe_columns(row)
            .into_iter()
            .filter(|col| !pruned.contains(col))
            .collect();
        let columns = ordering::order_values(self.strategy.value, &self.board, row, candidates);

        let before = if CHECK_INVARIANTS {
            Some(self.snapshot())
        } else {
            None
        };
        for col in columns {
            self.place((row, col), observer);
            match self.search(observer) {
                Outcome::Exhausted => self.remove((row, col), observer),
                done => return done,
            }
        }
        if let Some(before) = before {
            assert_eq!(
                before,
                self.snapshot(),
                "failed branch at row {} did not restore the board",
                row
            );
        }

        Outcome::Exhausted
    }

    /// Columns of `row` a queen could take right now, ascending.
    fn safe_columns(&self, row: usize) -> Vec<usize> {
        match &self.threats {
            Some(threats) => threats.free_columns(row).collect(),
            None => (0..self.n)
                .filter(|&col| self.board.is_safe((row, col)))
                .collect(),
        }
    }

    fn resolve_conflicts<O: Observer>(&mut self, observer: &mut O) {
        loop {
            let positions = &self.positions;
            let worst = positions
                .iter()
                .enumerate()
                .map(|(i, &queen)| {
                    let conflicts = positions
                        .iter()
                        .filter(|&&other| other != queen && attacks(queen, other))
                        .count();
                    (i, conflicts)
                })
                .filter(|&(_, conflicts)| conflicts > 0)
                .max_by_key(|&(i, conflicts)| (conflicts, i));

            match worst {
                Some((index, conflicts)) => {
                    let queen = self.lift(index);
                    debug!("evicted seed {:?}, attacked by {} queens", queen, conflicts);
                    self.notify(StepKind::Removed, queen, observer);
                }
                None => break,
            }
        }
    }
}

// Placing and removing queens.
impl Engine {
    fn place<O: Observer>(&mut self, queen: Position, observer: &mut O) {
        self.put(queen);
        self.used_rows.insert(queen.0);
        self.check_rows();
        self.notify(StepKind::Placed, queen, observer);
    }

    fn remove<O: Observer>(&mut self, queen: Position, observer: &mut O) {
        debug_assert_eq!(self.positions.last(), Some(&queen));
        self.lift(self.positions.len() - 1);
        self.used_rows.shift_remove(&queen.0);
        self.check_rows();
        self.notify(StepKind::Removed, queen, observer);
    }

    /// Board, threats, stack and counters for a placement. Rows are the caller's business.
    fn put(&mut self, queen: Position) {
        self.board.place(queen);
        if let Some(threats) = &mut self.threats {
            threats.place(queen);
        }
        self.positions.push(queen);
        self.counters.placements += 1;
        self.counters.steps += 1;
        self.check_threats();
    }

    /// Inverse of `put` for the queen at `index` on the stack.
    fn lift(&mut self, index: usize) -> Position {
        let queen = self.positions.remove(index);
        self.board.clear(queen);
        if let Some(threats) = &mut self.threats {
            threats.remove(queen);
        }
        self.counters.backtracks += 1;
        self.counters.steps += 1;
        self.check_threats();
        queen
    }

    fn notify<O: Observer>(&self, kind: StepKind, position: Position, observer: &mut O) {
        observer.on_step(&Step {
            kind,
            position,
            board: &self.board,
            positions: &self.positions,
            threats: self.threats.as_ref(),
            counters: self.counters,
        });
    }
}

// Invariants.
impl Engine {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            threats: self.threats.clone(),
            positions: self.positions.clone(),
            used_rows: self.used_rows.clone(),
        }
    }

    fn check_threats(&self) {
        if !CHECK_INVARIANTS {
            return;
        }
        if let Some(threats) = &self.threats {
            assert_eq!(
                *threats,
                ThreatMatrix::from_positions(self.n, &self.positions),
                "threat matrix drifted from the placed queens"
            );
        }
        assert_eq!(self.board.queens().count(), self.positions.len());
        assert!(self.positions.iter().all(|&queen| self.board.has_queen(queen)));
    }

    fn check_rows(&self) {
        if !CHECK_INVARIANTS {
            return;
        }
        let rows: IndexSet<usize> = self.positions.iter().map(|&(row, _)| row).collect();
        assert_eq!(rows.len(), self.positions.len(), "two queens share a row");
        assert_eq!(rows, self.used_rows);
    }
}
