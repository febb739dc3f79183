//! Game loop thread. Runs the simulation engine at the tick rate and
//! publishes snapshots.
//!
//! Commands arrive via `mpsc` channel. The loop checks the shared `running`
//! flag once per tick and exits when it is cleared, on `Shutdown`, or when
//! every sender is gone.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use skyfire_core::constants::TICK_RATE;
use skyfire_core::state::HudSnapshot;
use skyfire_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle; join the handle after
/// clearing `running` or sending `Shutdown`.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<HudSnapshot>>>,
    running: Arc<AtomicBool>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    running.store(true, Ordering::Release);
    let handle = std::thread::Builder::new()
        .name("skyfire-game-loop".into())
        .spawn(move || {
            log::info!("game loop started");
            run_game_loop(engine, cmd_rx, &latest_snapshot, &running);
            running.store(false, Ordering::Release);
            log::info!("game loop stopped");
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until `running` is cleared, Shutdown, or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<HudSnapshot>>,
    running: &AtomicBool,
) {
    let mut next_tick_time = Instant::now();

    while running.load(Ordering::Acquire) {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        log::trace!("tick {} on {:?}", snapshot.time.tick, snapshot.screen);

        // 3. Store latest snapshot for polling
        *latest_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot);

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // More than two ticks behind: drop the backlog
            log::debug!("game loop fell behind by {:?}", now - next_tick_time);
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_core::commands::PlayerCommand;
    use skyfire_core::enums::Screen;
    use skyfire_sim::SimConfig;

    fn wait_for(
        latest: &Mutex<Option<HudSnapshot>>,
        pred: impl Fn(&HudSnapshot) -> bool,
    ) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if latest.lock().unwrap().as_ref().is_some_and(&pred) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_queued_shutdown_stops_loop_before_ticking() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::OpenMissionSelect))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let latest = Mutex::new(None);
        let running = AtomicBool::new(true);
        run_game_loop(SimulationEngine::new(SimConfig::default()), rx, &latest, &running);

        // Shutdown drains with the rest of the queue, so no tick runs.
        assert!(latest.lock().unwrap().is_none());
        assert!(running.load(Ordering::Acquire));
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.queue_commands([
            PlayerCommand::OpenMissionSelect,
            PlayerCommand::SelectMission { index: 1 },
            PlayerCommand::StartMission,
        ]);
        for _ in 0..50 {
            engine.tick();
        }

        let snapshot = engine.tick();
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(json.contains("\"screen\":\"Game\""));
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.666ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_loop_publishes_snapshots_and_follows_commands() {
        let latest = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(false));
        let engine = SimulationEngine::new(SimConfig::default());
        let (tx, handle) = spawn_game_loop(engine, latest.clone(), running.clone()).unwrap();
        assert!(running.load(Ordering::Acquire));

        for cmd in [
            PlayerCommand::OpenMissionSelect,
            PlayerCommand::SelectMission { index: 0 },
            PlayerCommand::StartMission,
        ] {
            tx.send(GameLoopCommand::PlayerCommand(cmd)).unwrap();
        }
        assert!(wait_for(&latest, |s| s.screen == Screen::Game && s.time.tick > 2));

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
        assert!(!running.load(Ordering::Acquire));
    }

    #[test]
    fn test_clearing_running_flag_stops_loop() {
        let latest = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(false));
        let engine = SimulationEngine::new(SimConfig::default());
        let (_tx, handle) = spawn_game_loop(engine, latest.clone(), running.clone()).unwrap();

        assert!(wait_for(&latest, |_| true));
        running.store(false, Ordering::Release);
        handle.join().unwrap();
    }

    #[test]
    fn test_dropped_sender_stops_loop() {
        let latest = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(false));
        let engine = SimulationEngine::new(SimConfig::default());
        let (tx, handle) = spawn_game_loop(engine, latest, running.clone()).unwrap();
        drop(tx);
        handle.join().unwrap();
        assert!(!running.load(Ordering::Acquire));
    }
}
