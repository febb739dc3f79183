//! Control surface over the running simulation.
//!
//! The shell (CLI today, a UI later) drives the simulation only through
//! these functions. They bridge requests to the game loop thread via the
//! command channel and read back the latest published snapshot.

use std::sync::atomic::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{bail, Context, Result};

use skyfire_core::commands::PlayerCommand;
use skyfire_core::state::HudSnapshot;
use skyfire_sim::{SimConfig, SimulationEngine};

use crate::game_loop;
use crate::render_loop::{self, RenderStats};
use crate::state::{AppState, GameLoopCommand};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Start the simulation: spawns the game loop and the render loop.
pub fn start_simulation(state: &AppState, config: SimConfig, frame_rate: u32) -> Result<()> {
    if state.is_running() {
        bail!("simulation already running");
    }

    let engine = SimulationEngine::new(config);
    let world = engine.world();
    let (cmd_tx, game_handle) =
        game_loop::spawn_game_loop(engine, state.latest_snapshot.clone(), state.running.clone())
            .context("failed to spawn game loop thread")?;
    let render_handle =
        match render_loop::spawn_render_loop(world.clone(), state.running.clone(), frame_rate) {
            Ok(handle) => handle,
            Err(e) => {
                let _ = cmd_tx.send(GameLoopCommand::Shutdown);
                let _ = game_handle.join();
                return Err(e).context("failed to spawn render thread");
            }
        };

    *lock(&state.command_tx) = Some(cmd_tx);
    *lock(&state.world) = Some(world);
    *lock(&state.game_loop) = Some(game_handle);
    *lock(&state.render_loop) = Some(render_handle);
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<()> {
    let tx = lock(&state.command_tx);
    match tx.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .context("game loop is gone"),
        None => bail!("simulation not started"),
    }
}

/// Latest snapshot, if the game loop has published one.
pub fn get_snapshot(state: &AppState) -> Option<HudSnapshot> {
    lock(&state.latest_snapshot).clone()
}

/// Stop both threads and wait for them. Returns the render totals.
pub fn stop_simulation(state: &AppState) -> Result<RenderStats> {
    if let Some(tx) = lock(&state.command_tx).take() {
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    state.running.store(false, Ordering::Release);

    if let Some(handle) = lock(&state.game_loop).take() {
        if handle.join().is_err() {
            bail!("game loop thread panicked");
        }
    }
    let stats = match lock(&state.render_loop).take() {
        Some(handle) => match handle.join() {
            Ok(stats) => stats,
            Err(_) => bail!("render thread panicked"),
        },
        None => RenderStats::default(),
    };
    *lock(&state.world) = None;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use skyfire_core::enums::Screen;

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        assert!(send_command(&state, PlayerCommand::Pause).is_err());
        assert!(get_snapshot(&state).is_none());
    }

    #[test]
    fn test_start_send_stop() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default(), 120).unwrap();
        assert!(start_simulation(&state, SimConfig::default(), 120).is_err());

        send_command(&state, PlayerCommand::OpenMissionSelect).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut screen = None;
        while Instant::now() < deadline {
            screen = get_snapshot(&state).map(|s| s.screen);
            if screen == Some(Screen::MissionSelect) {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(screen, Some(Screen::MissionSelect));

        stop_simulation(&state).unwrap();
        assert!(!state.is_running());
        assert!(state.world.lock().unwrap().is_none());
        assert!(send_command(&state, PlayerCommand::Pause).is_err());
    }
}
