//! Headless driver for the battle simulation core.
//!
//! Loads a scenario descriptor produced by an external loader (RON), drives
//! the simulation at unbounded speed, and maps outcomes to process exit
//! codes:
//!
//! - `0` — normal termination (victory, defeat, or tick cap reached) or a
//!   successful replay verification
//! - `1` — scenario ingestion failure or any other fatal error
//! - `2` — replay hash verification failure

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use battle_runtime::{ReplayError, ReplayLog, ScenarioDescriptor, Simulation, replay};
use clap::Parser;

/// Headless tactical-battle simulation driver.
#[derive(Parser)]
#[command(name = "battle-cli")]
#[command(about = "Run, verify, and soak-test battle simulations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scenario to termination or a tick cap
    Run(RunCmd),

    /// Verify a replay log against a scenario
    Verify(VerifyCmd),

    /// Run a scenario repeatedly and check determinism and throughput
    Soak(SoakCmd),
}

#[derive(Parser)]
struct RunCmd {
    /// Scenario descriptor file (RON)
    scenario: PathBuf,

    /// RNG seed for the run
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop after this many ticks without a terminal outcome
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Write the replay log of the run to this file
    #[arg(long)]
    replay_out: Option<PathBuf>,

    /// Write the final snapshot as JSON to this file
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

#[derive(Parser)]
struct VerifyCmd {
    /// Scenario descriptor file (RON)
    scenario: PathBuf,

    /// Replay log file (RON)
    replay: PathBuf,
}

#[derive(Parser)]
struct SoakCmd {
    /// Scenario descriptor file (RON)
    scenario: PathBuf,

    /// Number of identical runs to compare
    #[arg(long, default_value_t = 10)]
    runs: u32,

    /// RNG seed shared by every run
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Tick cap per run
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Verify(cmd) => cmd.execute(),
        Command::Soak(cmd) => cmd.execute(),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn load_scenario(path: &Path) -> Result<ScenarioDescriptor> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let scenario = ScenarioDescriptor::from_ron(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    scenario
        .validate()
        .with_context(|| format!("validating scenario {}", path.display()))?;
    Ok(scenario)
}

impl RunCmd {
    fn execute(self) -> Result<ExitCode> {
        let scenario = load_scenario(&self.scenario)?;
        let mut sim = Simulation::new(&scenario, self.seed)?;

        let started = Instant::now();
        let outcome = sim.run_until_outcome(self.max_ticks)?;
        let elapsed = started.elapsed();

        let ticks = sim.ticks();
        match outcome {
            Some(outcome) => println!("{outcome} after {ticks} ticks ({elapsed:.2?})"),
            None => println!("no outcome within {ticks} ticks ({elapsed:.2?})"),
        }
        println!("state root: {}", sim.state_root());

        if let Some(path) = self.replay_out {
            sim.replay_log()
                .write_file(&path)
                .with_context(|| format!("writing replay {}", path.display()))?;
            println!("replay written to {}", path.display());
        }
        if let Some(path) = self.snapshot_out {
            let json = serde_json::to_string_pretty(&sim.snapshot())?;
            std::fs::write(&path, json)
                .with_context(|| format!("writing snapshot {}", path.display()))?;
            println!("snapshot written to {}", path.display());
        }

        Ok(ExitCode::SUCCESS)
    }
}

impl VerifyCmd {
    fn execute(self) -> Result<ExitCode> {
        let scenario = load_scenario(&self.scenario)?;
        let log = ReplayLog::read_file(&self.replay)
            .with_context(|| format!("reading replay {}", self.replay.display()))?;

        match replay(&scenario, &log) {
            Ok(report) => {
                println!(
                    "replay verified: {} commands, root {}",
                    report.commands_applied, report.final_root
                );
                Ok(ExitCode::SUCCESS)
            }
            Err(err @ ReplayError::HashMismatch { .. }) => {
                eprintln!("verification failed: {err}");
                Ok(ExitCode::from(2))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl SoakCmd {
    fn execute(self) -> Result<ExitCode> {
        let scenario = load_scenario(&self.scenario)?;

        let started = Instant::now();
        let mut reference: Option<String> = None;
        let mut total_ticks: u64 = 0;

        for run in 0..self.runs {
            let mut sim = Simulation::new(&scenario, self.seed)?;
            sim.run_until_outcome(self.max_ticks)?;
            total_ticks += sim.ticks().0;
            let root = sim.state_root();

            match &reference {
                None => reference = Some(root),
                Some(expected) if *expected != root => {
                    anyhow::bail!(
                        "determinism failure on run {run}: root {root} != {expected}"
                    );
                }
                Some(_) => {}
            }
        }

        let elapsed = started.elapsed();
        let per_second = total_ticks as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        println!(
            "{} identical runs, {total_ticks} ticks in {elapsed:.2?} ({per_second:.0} ticks/s)",
            self.runs
        );

        Ok(ExitCode::SUCCESS)
    }
}
