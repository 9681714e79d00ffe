use std::{error::Error as StdError, fs, process, thread, time::Duration};

use itertools::Itertools;
use log::info;
use serde::Serialize;
use structopt::StructOpt;

use nqueens::{
    Counters, Engine, Frame, FrameRecorder, Observer, Outcome, Playground, Position, Step,
    StepLog, Strategy,
};

mod opts;
use opts::{Command, Opts};

type AnyError = Box<dyn StdError>;

/// Everything worth printing about one run.
#[derive(Serialize)]
struct Report<'a> {
    n: usize,
    strategy: Strategy,
    label: String,
    outcome: Option<Outcome>,
    positions: &'a [Position],
    counters: Counters,
    #[serde(skip_serializing_if = "Option::is_none")]
    seeds: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    frames: Vec<Frame>,
}

impl<'a> Report<'a> {
    fn new(engine: &'a Engine) -> Self {
        Self {
            n: engine.n(),
            strategy: engine.strategy(),
            label: engine.strategy().to_string(),
            outcome: engine.outcome(),
            positions: engine.positions(),
            counters: engine.counters(),
            seeds: None,
            frames: vec![],
        }
    }

    fn print(&self) {
        if let Some(seeds) = self.seeds {
            println!("Started from {} queens.", seeds);
        }
        for frame in &self.frames {
            println!(
                "step {:>6}: {:?} {:?} -> {:?}",
                frame.counters.steps, frame.kind, frame.position, frame.positions,
            );
        }
        match self.outcome {
            Some(Outcome::Solved) => {
                println!("{}-queens solved with {}:", self.n, self.label);
                for line in self.positions.chunks(4) {
                    println!("  {}", line.iter().map(|pos| format!("{:?}", pos)).join(" "));
                }
            }
            Some(Outcome::Cancelled) => println!("Search cancelled."),
            _ => println!("No solution exists."),
        }
        let Counters {
            steps,
            placements,
            backtracks,
        } = self.counters;
        println!(
            "steps: {}, placements: {}, backtracks: {}",
            steps, placements, backtracks
        );
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn solve(
    n: usize,
    strategy: Strategy,
    json: bool,
    delay: Option<Duration>,
    frames: Option<usize>,
) -> Result<(), AnyError> {
    let mut engine = Engine::configure(n, strategy)?;
    let mut recorder = FrameRecorder::new(frames.unwrap_or(0));
    let mut log = StepLog;
    engine.solve_with(&mut |step: &Step<'_>| {
        log.on_step(step);
        recorder.on_step(step);
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
    });

    let mut report = Report::new(&engine);
    report.frames = recorder.into_frames();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}

fn compare(n: usize, json: bool) -> Result<(), AnyError> {
    let engines = Strategy::all()
        .map(|strategy| -> Result<Engine, nqueens::Error> {
            let mut engine = Engine::configure(n, strategy)?;
            engine.solve();
            info!("{}: {:?}", strategy, engine.counters());
            Ok(engine)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let reports: Vec<_> = engines.iter().map(Report::new).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    println!(
        "{:<36} {:>7} {:>10} {:>10} {:>10}",
        "strategy", "solved", "steps", "placed", "backtracks"
    );
    for report in &reports {
        println!(
            "{:<36} {:>7} {:>10} {:>10} {:>10}",
            report.label,
            report.outcome == Some(Outcome::Solved),
            report.counters.steps,
            report.counters.placements,
            report.counters.backtracks,
        );
    }
    Ok(())
}

fn repair(mut playground: Playground, strategy: Strategy, json: bool) -> Result<(), AnyError> {
    let seeds = playground.positions().len();
    let engine = playground.solve(strategy)?;

    let mut report = Report::new(&engine);
    report.seeds = Some(seeds);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}

fn run(opts: Opts) -> Result<(), AnyError> {
    match opts.cmd {
        Command::Solve {
            size,
            strategy,
            output,
            delay_ms,
            frames,
        } => solve(
            size.n,
            strategy.strategy(),
            output.json,
            delay_ms.map(Duration::from_millis),
            frames,
        ),
        Command::Compare { size, output } => compare(size.n, output.json),
        Command::Repair {
            board,
            scatter,
            seed,
            size,
            strategy,
            output,
        } => {
            let playground = match (board, scatter) {
                (Some(path), _) => Playground::from_save(&fs::read(path)?)?,
                (None, Some(count)) => Playground::scattered(size.n, count, seed)?,
                (None, None) => return Err("either --board or --scatter is required".into()),
            };
            repair(playground, strategy.strategy(), output.json)
        }
    }
}

fn main() {
    let opts = Opts::from_args();
    init_logging(opts.verbose);

    if let Err(err) = run(opts) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
