//! orson-harness: plays a headless game at a fixed 60 Hz frame clock.
//!
//! An autopilot clicks on the threat closest to the ground; when the run
//! ends the score goes to the leaderboard.
//!
//! Usage:
//!   orson-harness --seed 7 --difficulty hard --leaderboard scores.json --name Ada
//!   RUST_LOG=debug orson-harness --max-frames 3600

use std::path::PathBuf;
use std::process;

use clap::Parser;

use orson_core::commands::PlayerCommand;
use orson_core::config::GameConfig;
use orson_core::constants::FRAME_PERIOD_MS;
use orson_core::enums::{Difficulty, RunStatus};
use orson_core::events::Notification;
use orson_core::state::GameStateSnapshot;
use orson_leaderboard::{JsonFileStore, Leaderboard, MemoryStore, ScoreStore};
use orson_sim::{SimConfig, SimulationEngine};

#[derive(Parser, Debug)]
#[command(name = "orson-harness", about = "Headless Orson Cyber War runner")]
struct Args {
    /// RNG seed for the run.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Difficulty preset: simple, medium or hard.
    #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
    difficulty: Difficulty,

    /// Stop after this many frames even if the run is still going.
    #[arg(long, default_value_t = 36_000)]
    max_frames: u64,

    /// Frames between autopilot clicks.
    #[arg(long, default_value_t = 20)]
    fire_every: u64,

    /// JSON file with configuration overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON leaderboard file. Without it scores are kept in memory.
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Name submitted with the final score.
    #[arg(long, default_value = "autopilot")]
    name: String,

    /// Print the final snapshot as JSON.
    #[arg(long)]
    dump_snapshot: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::parse(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let game = match &args.config {
        Some(path) => match GameConfig::from_json_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading {}: {err}", path.display());
                process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let mut engine = match SimulationEngine::new(SimConfig {
        seed: args.seed,
        game,
        difficulty: args.difficulty,
    }) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    let snapshot = run(&mut engine, &args);
    report(&snapshot, &engine);

    if args.dump_snapshot {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("Error serializing snapshot: {err}"),
        }
    }

    if snapshot.status.is_terminal() {
        match &args.leaderboard {
            Some(path) => match JsonFileStore::open(path) {
                Ok(store) => submit(Leaderboard::new(store), &args.name, snapshot.score),
                Err(err) => {
                    log::warn!("cannot open {}: {err}", path.display());
                    submit(Leaderboard::new(MemoryStore::new()), &args.name, snapshot.score);
                }
            },
            None => submit(Leaderboard::new(MemoryStore::new()), &args.name, snapshot.score),
        }
    } else {
        println!("Run did not finish within {} frames; score not submitted.", args.max_frames);
    }
}

/// Drive the engine until the run ends or the frame budget runs out.
fn run(engine: &mut SimulationEngine, args: &Args) -> GameStateSnapshot {
    engine.queue_command(PlayerCommand::StartMission);

    let mut snapshot = engine.tick(0.0);
    log_notifications(&snapshot.notifications);

    for frame in 1..=args.max_frames {
        if frame % args.fire_every.max(1) == 0 {
            if let Some((x, y)) = pick_target(&snapshot) {
                engine.queue_command(PlayerCommand::Fire { x, y });
            }
        }

        snapshot = engine.tick(frame as f64 * FRAME_PERIOD_MS);
        log_notifications(&snapshot.notifications);

        if snapshot.status != RunStatus::Playing {
            break;
        }
    }
    snapshot
}

/// The untracked threat nearest the ground.
fn pick_target(snapshot: &GameStateSnapshot) -> Option<(f64, f64)> {
    snapshot
        .threats
        .iter()
        .filter(|t| !snapshot.interceptors.iter().any(|m| m.tracking == Some(t.id)))
        .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
        .map(|t| (t.position.x, t.position.y))
}

fn log_notifications(notifications: &[Notification]) {
    for note in notifications {
        match note {
            Notification::StatusChanged { from, to } => log::info!("status {from:?} -> {to:?}"),
            Notification::LevelCompleted { level, ammo_bonus } => {
                log::info!("level {level} cleared, bonus {ammo_bonus}")
            }
            Notification::ComboAchieved { message } => log::info!("combo: {message}"),
            other => log::debug!("{other:?}"),
        }
    }
}

fn report(snapshot: &GameStateSnapshot, engine: &SimulationEngine) {
    let stats = engine.stats();
    println!("Status:      {:?}", snapshot.status);
    println!("Difficulty:  {}", snapshot.difficulty.as_str());
    println!("Score:       {}", snapshot.score);
    println!("Level:       {}", snapshot.level.number);
    println!("Frames:      {}", snapshot.time.tick);
    println!(
        "Threats:     {} killed, {} impacted",
        stats.threats_killed, stats.threats_impacted
    );
    println!("Fired:       {} interceptors", stats.interceptors_fired);
    println!(
        "Batteries:   {} destroyed, ammo {:?}",
        snapshot.destroyed_batteries(),
        snapshot.ammo()
    );
    println!(
        "Cities:      {}/{} standing",
        snapshot.cities.iter().filter(|c| !c.destroyed).count(),
        snapshot.cities.len()
    );
}

fn submit<S: ScoreStore>(mut board: Leaderboard<S>, name: &str, score: u32) {
    match board.submit(name, score) {
        Ok(entry) => println!("Recorded {} for {} on {}", entry.score, entry.name, entry.date),
        Err(err) => {
            eprintln!("Score not recorded: {err}");
            return;
        }
    }
    if board.is_degraded() {
        println!("(leaderboard unavailable, showing this session only)");
    }
    println!("Top scores:");
    for (rank, entry) in board.top().iter().enumerate() {
        println!("  {:>2}. {:<16} {:>6}  {}", rank + 1, entry.name, entry.score, entry.date);
    }
}
