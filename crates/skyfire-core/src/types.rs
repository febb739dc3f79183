//! Fundamental simulation value types.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::Team;

/// Snapshot of another object's identity and position.
///
/// Never a live reference: consumers re-resolve the callsign against the
/// current tick's contacts before trusting it. `Signal::NONE` means "no target".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub position: Vec3,
    pub team: Team,
    pub callsign: u32,
}

impl Signal {
    pub const NONE: Signal = Signal {
        position: Vec3::ZERO,
        team: Team::Invalid,
        callsign: 0,
    };

    pub fn new(position: Vec3, team: Team, callsign: u32) -> Self {
        Self {
            position,
            team,
            callsign,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.team != Team::Invalid
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick.
    pub fn dt(&self) -> f32 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += f64::from(self.dt());
    }
}
