use std::collections::VecDeque;

use log::trace;
use serde::Serialize;

use crate::{
    board::{Board, Position},
    solver::Counters,
    threats::ThreatMatrix,
};

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Placed,
    Removed,
}

/// The engine's state right after a queen was placed or removed.
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    pub kind: StepKind,
    pub position: Position,
    pub board: &'a Board,
    pub positions: &'a [Position],
    /// Only present when the strategy keeps a threat matrix.
    pub threats: Option<&'a ThreatMatrix>,
    pub counters: Counters,
}

/// Called synchronously after every placement and removal. Anything that wants to pace or pause
/// the search does it inside `on_step`.
pub trait Observer {
    fn on_step(&mut self, step: &Step<'_>);
}

/// Ignores every step.
#[derive(Debug, Default, Copy, Clone)]
pub struct Silent;

impl Observer for Silent {
    fn on_step(&mut self, _step: &Step<'_>) {}
}

impl<F> Observer for F
where
    F: FnMut(&Step<'_>),
{
    fn on_step(&mut self, step: &Step<'_>) {
        self(step)
    }
}

/// Writes each step to the `trace` log.
#[derive(Debug, Default, Copy, Clone)]
pub struct StepLog;

impl Observer for StepLog {
    fn on_step(&mut self, step: &Step<'_>) {
        trace!(
            "step {}: {:?} {:?}, {} on board",
            step.counters.steps,
            step.kind,
            step.position,
            step.positions.len(),
        );
    }
}

/// An owned copy of a `Step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub kind: StepKind,
    pub position: Position,
    pub positions: Vec<Position>,
    pub threats: Option<ThreatMatrix>,
    pub counters: Counters,
}

impl From<&Step<'_>> for Frame {
    fn from(step: &Step<'_>) -> Self {
        Self {
            kind: step.kind,
            position: step.position,
            positions: step.positions.to_vec(),
            threats: step.threats.cloned(),
            counters: step.counters,
        }
    }
}

/// Keeps the most recent `capacity` frames, oldest first.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    capacity: usize,
    frames: VecDeque<Frame>,
}

impl FrameRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames.into_iter().collect()
    }
}

impl Observer for FrameRecorder {
    fn on_step(&mut self, step: &Step<'_>) {
        if self.capacity == 0 {
            return;
        }
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(step.into());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn step_at<'a>(board: &'a Board, positions: &'a [Position], steps: usize) -> Step<'a> {
        Step {
            kind: StepKind::Placed,
            position: positions[positions.len() - 1],
            board,
            positions,
            threats: None,
            counters: Counters {
                steps,
                placements: steps,
                backtracks: 0,
            },
        }
    }

    #[test]
    fn recorder_keeps_latest_frames() {
        let board = Board::new(4).unwrap();
        let positions = [(0, 1), (1, 3), (2, 0)];
        let mut recorder = FrameRecorder::new(2);
        for i in 1..=3 {
            recorder.on_step(&step_at(&board, &positions[..i], i));
        }
        assert_eq!(recorder.len(), 2);
        let frames = recorder.into_frames();
        assert_eq!(frames[0].counters.steps, 2);
        assert_eq!(frames[1].positions, vec![(0, 1), (1, 3), (2, 0)]);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let board = Board::new(4).unwrap();
        let mut recorder = FrameRecorder::new(0);
        recorder.on_step(&step_at(&board, &[(0, 0)], 1));
        assert!(recorder.is_empty());
    }

    #[test]
    fn closures_observe() {
        let board = Board::new(4).unwrap();
        let mut seen = vec![];
        {
            let mut observer = |step: &Step<'_>| seen.push(step.position);
            observer.on_step(&step_at(&board, &[(0, 2)], 1));
        }
        assert_eq!(seen, vec![(0, 2)]);
    }
}
