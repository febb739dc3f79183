//! Headless Skyfire runner: starts the simulation threads, flies a mission
//! with the autopilot and prints the result.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use skyfire_app::autopilot::Autopilot;
use skyfire_app::control;
use skyfire_app::state::AppState;
use skyfire_core::commands::PlayerCommand;
use skyfire_core::config::Roster;
use skyfire_core::enums::Screen;
use skyfire_sim::SimConfig;

/// Fly a Skyfire mission without a window.
#[derive(Debug, Parser)]
#[command(name = "skyfire", version, about)]
struct Args {
    /// RNG seed for enemy placement.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Mission index in the roster.
    #[arg(long, default_value_t = 0)]
    mission: usize,
    /// Jet index in the roster.
    #[arg(long, default_value_t = 0)]
    jet: usize,
    /// Roster JSON file. The built-in roster is used when omitted.
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Give up after this many seconds of wall time.
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,
    /// Render thread frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn load_roster(path: Option<&PathBuf>) -> Result<Roster> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading roster {}", path.display()))?;
            Ok(Roster::load_or_default(&json))
        }
        None => Ok(Roster::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let roster = load_roster(args.roster.as_ref())?;
    let config = SimConfig {
        seed: args.seed,
        mission: args.mission,
        jet: args.jet,
        roster,
    };

    let state = AppState::new();
    control::start_simulation(&state, config, args.fps)?;
    for command in [
        PlayerCommand::OpenCustomize,
        PlayerCommand::SelectJet { index: args.jet },
        PlayerCommand::OpenMissionSelect,
        PlayerCommand::SelectMission { index: args.mission },
        PlayerCommand::StartMission,
    ] {
        control::send_command(&state, command)?;
    }

    let mut pilot = Autopilot::new();
    let deadline = Instant::now() + Duration::from_secs_f64(args.seconds.max(0.0));
    let mut last = None;
    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(100));
        let Some(snapshot) = control::get_snapshot(&state) else {
            continue;
        };
        if matches!(snapshot.screen, Screen::Win | Screen::Dead) {
            last = Some(snapshot);
            break;
        }
        for command in pilot.next(&snapshot) {
            control::send_command(&state, command)?;
        }
        last = Some(snapshot);
    }

    let render = control::stop_simulation(&state)?;
    log::info!(
        "rendered {} frames (peak {} items, {} bullets)",
        render.frames,
        render.peak_items,
        render.peak_bullets
    );

    match last {
        Some(snapshot) => {
            let stats = snapshot.stats;
            println!(
                "{:?} after {:.1}s: score {}, kills {}/{}, hits {}/{}, hull {:.0}%",
                snapshot.screen,
                snapshot.time.elapsed_secs,
                snapshot.score,
                stats.kills,
                stats.enemies_total,
                stats.hits,
                stats.shots_fired,
                snapshot.hp_fraction * 100.0
            );
        }
        None => println!("no snapshot received"),
    }
    Ok(())
}
