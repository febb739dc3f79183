//! Application state shared between the control surface, the game loop
//! thread and the render thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use skyfire_core::commands::PlayerCommand;
use skyfire_core::state::HudSnapshot;
use skyfire_sim::SharedWorld;

use crate::render_loop::RenderStats;

/// Commands sent from the control surface to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` holds state that does not exist before `start_simulation`
/// - `running` is polled once per tick by the game loop and once per frame
///   by the render loop; clearing it stops both.
pub struct AppState {
    /// Channel sender to the game loop thread. `None` before start.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<HudSnapshot>>>,
    pub running: Arc<AtomicBool>,
    /// Entity collections of the running simulation.
    pub world: Mutex<Option<Arc<SharedWorld>>>,
    pub game_loop: Mutex<Option<JoinHandle<()>>>,
    pub render_loop: Mutex<Option<JoinHandle<RenderStats>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            world: Mutex::new(None),
            game_loop: Mutex::new(None),
            render_loop: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
