//! Skyhop headless runner
//!
//! Plays sessions with the autopilot and replays recorded input tapes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use skyhop::Autopilot;
use skyhop::sim::{InputTape, TapeRecorder, replay_strict};
use skyhop::tuning::Tuning;

#[derive(Parser)]
#[command(name = "skyhop")]
#[command(about = "Headless endless-runner sessions: autopilot play and tape replay")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a session driven by the autopilot
    Play {
        /// Seed for platform placement
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop after this many ticks
        #[arg(long, default_value_t = 10_000)]
        ticks: u64,
        /// Tuning JSON file (defaults to $SKYHOP_TUNING or config/tuning.json)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Write the recorded input tape here
        #[arg(long)]
        tape_out: Option<PathBuf>,
        /// Write the final session snapshot here
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
        /// Check session invariants after every tick
        #[arg(long)]
        strict: bool,
    },
    /// Replay a recorded tape with invariant checks and print the result
    Replay {
        /// Tape JSON file
        tape: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Play {
            seed,
            ticks,
            tuning,
            tape_out,
            snapshot_out,
            strict,
        } => {
            let tuning = match tuning {
                Some(path) => load_tuning(&path)?,
                None => Tuning::load(),
            };
            play(seed, ticks, tuning, tape_out.as_deref(), snapshot_out.as_deref(), strict)
        }
        Command::Replay { tape: path } => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            let tape = InputTape::from_json(&json)
                .with_context(|| format!("invalid tape {}", path.display()))?;
            tape.tuning
                .validate()
                .with_context(|| format!("invalid tuning in tape {}", path.display()))?;
            let result = replay_strict(&tape)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

fn load_tuning(path: &Path) -> Result<Tuning> {
    Tuning::load_from_path(path).with_context(|| format!("failed loading tuning {}", path.display()))
}

fn play(
    seed: u64,
    ticks: u64,
    tuning: Tuning,
    tape_out: Option<&Path>,
    snapshot_out: Option<&Path>,
    strict: bool,
) -> Result<()> {
    log::info!("Playing seed {seed} for up to {ticks} ticks");
    let mut recorder = TapeRecorder::new(seed, tuning);
    let mut pilot = Autopilot::new();

    for _ in 0..ticks {
        let held = pilot.next_input(recorder.session());
        recorder.advance(held);
        if strict {
            if let Err(rule) = recorder.session().validate() {
                bail!(
                    "rule violation at tick {}: {rule}",
                    recorder.session().tick_count()
                );
            }
        }
        if recorder.session().is_game_over() {
            break;
        }
    }

    let session = recorder.session();
    println!(
        "seed={seed} ticks={} score={} best={} game_over={}",
        session.tick_count(),
        session.score(),
        session.best_score(),
        session.is_game_over()
    );

    if let Some(path) = snapshot_out {
        let json = serde_json::to_string_pretty(&session.snapshot())?;
        write_file(path, &json)?;
    }
    if let Some(path) = tape_out {
        let json = recorder.tape().to_json()?;
        write_file(path, &json)?;
        log::info!("Wrote {} ticks of input to {}", recorder.tape().len(), path.display());
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed writing {}", path.display()))
}
