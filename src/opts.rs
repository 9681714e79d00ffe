use std::path::PathBuf;

use structopt::StructOpt;

use nqueens::{Filtering, Strategy, ValueOrdering, VariableOrdering};

#[derive(StructOpt)]
#[structopt(name = "nqueens", about = "Places N queens on an N by N board by constrained backtracking.")]
pub struct Opts {
    /// Log more. Once for info, twice for debug, three times for every step.
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Solve with one strategy.
    Solve {
        #[structopt(flatten)]
        size: Size,
        #[structopt(flatten)]
        strategy: StrategyOpts,
        #[structopt(flatten)]
        output: Output,
        /// Pause after every placement and removal.
        #[structopt(long)]
        delay_ms: Option<u64>,
        /// Print the last K steps of the search.
        #[structopt(long)]
        frames: Option<usize>,
    },
    /// Solve with all twelve strategies and compare the counters.
    Compare {
        #[structopt(flatten)]
        size: Size,
        #[structopt(flatten)]
        output: Output,
    },
    /// Start from a board full of queens, clear the conflicts, and finish it.
    Repair {
        /// Saved board, one row per line, `Q` for a queen and `.` for an empty cell.
        #[structopt(long, parse(from_os_str), required_unless = "scatter", conflicts_with = "scatter")]
        board: Option<PathBuf>,
        /// Scatter this many queens at random instead.
        #[structopt(long)]
        scatter: Option<usize>,
        #[structopt(long, default_value = "0")]
        seed: u64,
        #[structopt(flatten)]
        size: Size,
        #[structopt(flatten)]
        strategy: StrategyOpts,
        #[structopt(flatten)]
        output: Output,
    },
}

#[derive(StructOpt)]
pub struct Size {
    /// Board size. Saved boards bring their own.
    #[structopt(short = "n", long = "size", default_value = "8")]
    pub n: usize,
}

#[derive(StructOpt)]
pub struct StrategyOpts {
    /// natural or mrv
    #[structopt(long, default_value = "natural")]
    pub variable: VariableOrdering,
    /// natural or lcv
    #[structopt(long, default_value = "natural")]
    pub value: ValueOrdering,
    /// none, fc or ac
    #[structopt(long, default_value = "none")]
    pub filtering: Filtering,
}

impl StrategyOpts {
    pub fn strategy(&self) -> Strategy {
        Strategy::new(self.variable, self.value, self.filtering)
    }
}

#[derive(StructOpt)]
pub struct Output {
    /// Print JSON instead of text.
    #[structopt(long)]
    pub json: bool,
}
