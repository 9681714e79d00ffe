pub mod board;
pub mod playground;
pub mod solver;
pub mod threats;
mod util;

pub use board::{Board, Error, Position};
pub use playground::{Playground, Toggle};
pub use solver::{
    observer::{Frame, FrameRecorder, Observer, Silent, Step, StepKind, StepLog},
    strategy::{Filtering, Strategy, ValueOrdering, VariableOrdering},
    Counters, Engine, Outcome,
};
pub use threats::ThreatMatrix;

/// Check the threat matrix against a brute-force recount after every step, and check that failed
/// branches restore the state they started from.
pub const CHECK_INVARIANTS: bool = cfg!(any(test, feature = "check_invariants"));
