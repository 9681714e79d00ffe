//! Hand-played boards. Queens go down one at a time on unthreatened cells, and whatever is on the
//! board can be handed to the engine to finish.

use indexmap::IndexSet;
use log::debug;
use rand::{distributions::Uniform, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    board::{Board, Error, Position},
    solver::{strategy::Strategy, Counters, Engine},
    threats::ThreatMatrix,
    util::attacks,
};

type BaseRng = Xoshiro256PlusPlus;

/// What a toggle did.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Toggle {
    Placed,
    Removed,
    /// The cell is attacked by this many queens. Nothing changed.
    Blocked(i32),
}

#[derive(Debug, Clone)]
pub struct Playground {
    board: Board,
    positions: Vec<Position>,
    counters: Counters,
}

// Constructors
impl Playground {
    pub fn new(n: usize) -> Result<Self, Error> {
        Ok(Self {
            board: Board::new(n)?,
            positions: vec![],
            counters: Counters::default(),
        })
    }

    /// Start from any set of queens, attacking each other or not. Repeats are dropped.
    pub fn from_positions<I>(n: usize, positions: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut playground = Self::new(n)?;
        let positions: IndexSet<Position> = positions.into_iter().collect();
        for queen in positions {
            if !playground.board.is_loc(queen) {
                return Err(Error::OutOfBounds(queen));
            }
            playground.board.place(queen);
            playground.positions.push(queen);
        }
        Ok(playground)
    }

    pub fn from_save(save: &[u8]) -> Result<Self, Error> {
        let board = Board::from_save(save)?;
        Self::from_positions(board.n(), board.queens())
    }

    /// Up to `count` queens on random cells. Cells drawn twice hold one queen.
    pub fn scattered(n: usize, count: usize, seed: u64) -> Result<Self, Error> {
        if n < 1 {
            return Err(Error::InvalidSize(n));
        }
        let mut randos = BaseRng::seed_from_u64(seed);
        let range = Uniform::from(0..n);
        let locs: Vec<_> = (0..count)
            .map(|_| (randos.sample(range), randos.sample(range)))
            .collect();
        Self::from_positions(n, locs)
    }
}

// Inspection
impl Playground {
    pub fn n(&self) -> usize {
        self.board.n()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Threat counts recomputed from the queens on the board.
    pub fn hints(&self) -> ThreatMatrix {
        ThreatMatrix::from_positions(self.n(), &self.positions)
    }

    pub fn threats_at(&self, pos: Position) -> Result<i32, Error> {
        if !self.board.is_loc(pos) {
            return Err(Error::OutOfBounds(pos));
        }
        Ok(self.hints()[pos])
    }

    /// N queens, none attacking another.
    pub fn is_solved(&self) -> bool {
        self.positions.len() == self.n()
            && self
                .positions
                .iter()
                .enumerate()
                .all(|(i, &a)| self.positions[i + 1..].iter().all(|&b| !attacks(a, b)))
    }
}

// Playing
impl Playground {
    /// Remove the queen on `pos`, or place one there if nothing attacks the cell.
    pub fn toggle(&mut self, pos: Position) -> Result<Toggle, Error> {
        let threats = self.threats_at(pos)?;
        if self.board.has_queen(pos) {
            self.board.clear(pos);
            self.positions.retain(|&queen| queen != pos);
            self.counters.backtracks += 1;
            self.counters.steps += 1;
            Ok(Toggle::Removed)
        } else if threats == 0 {
            self.board.place(pos);
            self.positions.push(pos);
            self.counters.placements += 1;
            self.counters.steps += 1;
            Ok(Toggle::Placed)
        } else {
            Ok(Toggle::Blocked(threats))
        }
    }

    /// Let the engine finish from the current queens. The board takes whatever the engine ends
    /// with: a solution, or the seeds that survived repair.
    pub fn solve(&mut self, strategy: Strategy) -> Result<Engine, Error> {
        let mut engine = Engine::configure(self.n(), strategy)?;
        let solved = engine.repair_and_solve(self.positions.iter().cloned())?;
        debug!(
            "playground handed {} queens to {}, solved: {}",
            self.positions.len(),
            strategy,
            solved
        );

        for &queen in &self.positions {
            self.board.clear(queen);
        }
        self.positions = engine.positions().to_vec();
        for &queen in &self.positions {
            self.board.place(queen);
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::{
        strategy::{Filtering, ValueOrdering, VariableOrdering},
        Outcome,
    };

    fn banner() -> Playground {
        Playground::from_save(include_bytes!("../testing/boards/ai_queens.txt"))
            .expect("board to parse correctly from file.")
    }

    #[test]
    fn toggle_places_removes_and_blocks() {
        let mut playground = Playground::new(4).unwrap();
        assert_eq!(playground.toggle((0, 1)), Ok(Toggle::Placed));
        // Same column, and same row.
        assert_eq!(playground.toggle((3, 1)), Ok(Toggle::Blocked(1)));
        assert_eq!(playground.toggle((0, 3)), Ok(Toggle::Blocked(1)));
        assert_eq!(playground.toggle((1, 3)), Ok(Toggle::Placed));
        // Diagonal of (1, 3).
        assert_eq!(playground.toggle((2, 2)), Ok(Toggle::Blocked(1)));
        assert_eq!(playground.toggle((0, 1)), Ok(Toggle::Removed));
        assert_eq!(playground.positions(), &[(1, 3)]);
        assert_eq!(
            playground.counters(),
            Counters {
                steps: 3,
                placements: 2,
                backtracks: 1,
            }
        );
        assert_eq!(
            playground.toggle((4, 0)),
            Err(Error::OutOfBounds((4, 0)))
        );
    }

    #[test]
    fn solved_by_hand() {
        let mut playground = Playground::new(4).unwrap();
        for &queen in &[(0, 1), (1, 3), (2, 0)] {
            assert_eq!(playground.toggle(queen), Ok(Toggle::Placed));
            assert!(!playground.is_solved());
        }
        assert_eq!(playground.threats_at((3, 2)), Ok(0));
        assert_eq!(playground.toggle((3, 2)), Ok(Toggle::Placed));
        assert!(playground.is_solved());
        assert_eq!(playground.hints().free_count(3), 0);
    }

    #[test]
    fn conflicting_boards_are_not_solved() {
        let playground = Playground::from_positions(1, vec![(0, 0), (0, 0)]).unwrap();
        assert!(playground.is_solved());

        let playground = Playground::from_positions(2, vec![(0, 0), (1, 1)]).unwrap();
        assert!(!playground.is_solved());
        assert_eq!(playground.threats_at((0, 0)), Ok(2));

        assert_eq!(
            Playground::from_positions(3, vec![(1, 3)]).map(|p| p.n()),
            Err(Error::OutOfBounds((1, 3)))
        );
    }

    #[test]
    fn scattered_is_seeded() {
        let first = Playground::scattered(8, 6, 42).unwrap();
        let second = Playground::scattered(8, 6, 42).unwrap();
        assert_eq!(first.positions(), second.positions());
        assert!(first.positions().len() <= 6);
        assert!(!first.positions().is_empty());
        assert!(first.positions().iter().all(|&queen| first.board().is_loc(queen)));
        assert_eq!(
            Playground::scattered(0, 3, 1).map(|p| p.n()),
            Err(Error::InvalidSize(0))
        );
    }

    #[test]
    fn solve_finishes_hand_placed_queens() {
        let mut playground = Playground::new(4).unwrap();
        playground.toggle((0, 1)).unwrap();
        let engine = playground.solve(Strategy::default()).unwrap();
        assert_eq!(engine.outcome(), Some(Outcome::Solved));
        assert!(playground.is_solved());
        assert_eq!(playground.positions(), &[(0, 1), (1, 3), (2, 0), (3, 2)]);
        assert_eq!(playground.board().queens().count(), 4);
    }

    #[test]
    fn banner_is_full_of_conflicts() {
        let playground = banner();
        assert_eq!(playground.n(), 16);
        assert_eq!(playground.positions().len(), 31);
        assert!(!playground.is_solved());
        // Foot of the `I`: its own queen plus twelve others.
        assert_eq!(playground.threats_at((10, 11)), Ok(13));
    }

    #[test]
    fn solve_repairs_conflicts_first() {
        let mut playground = Playground::from_positions(4, vec![(0, 1), (0, 2), (1, 3)]).unwrap();
        let strategy = Strategy::new(
            VariableOrdering::Mrv,
            ValueOrdering::Lcv,
            Filtering::ArcConsistency,
        );
        let engine = playground.solve(strategy).unwrap();
        assert_eq!(engine.outcome(), Some(Outcome::Solved));
        assert!(playground.is_solved());
        assert!(!playground.positions().contains(&(0, 2)));
        assert_eq!(&playground.positions()[..2], &[(0, 1), (1, 3)]);
        assert_eq!(engine.counters().backtracks, 1);
    }
}
