//! HUD snapshot: read-only scalars published to the UI after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{BulletKind, Screen};
use crate::events::AudioEvent;
use crate::types::SimTime;

/// Everything the HUD reads. The UI never feeds back into the simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub time: SimTime,
    pub screen: Screen,
    /// Player health in `[0, 1]`.
    pub hp_fraction: f32,
    pub speed: f32,
    /// Player energy in `[0, 1]`.
    pub energy_fraction: f32,
    pub score: u32,
    pub weapons: Vec<WeaponView>,
    pub enemies_remaining: usize,
    /// Callsign of the locked target, if any.
    pub locked_target: Option<u32>,
    pub stats: MissionStats,
    pub audio_events: Vec<AudioEvent>,
}

/// Per-slot weapon readout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponView {
    pub name: String,
    pub kind: BulletKind,
    /// `cooldown / delay`, 1.0 when ready to fire.
    pub reload_fraction: f32,
    pub clip: u32,
    pub capacity: u32,
}

/// Per-mission counters, reset by map creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStats {
    pub shots_fired: u32,
    pub hits: u32,
    pub kills: u32,
    pub enemies_total: u32,
}
