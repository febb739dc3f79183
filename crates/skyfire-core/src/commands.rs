//! Commands and input actions sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::constants::PLAYER_MAX_WEAPONS;

/// Remapped input event, as delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Stick axes in `[-1, 1]`.
    Pitch { value: f32 },
    Yaw { value: f32 },
    Roll { value: f32 },
    /// Throttle change in `[-1, 1]`.
    Throttle { value: f32 },
    /// Trigger for weapon slot 0..3.
    Shoot { slot: usize, pressed: bool },
    /// Lock the best target in the aim cone (or drop the lock if none).
    Target,
    /// Toggle between Game and GamePaused.
    Pause,
}

/// Per-tick player input state, accumulated from `Action`s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub throttle: f32,
    pub shoot: [bool; PLAYER_MAX_WEAPONS],
    /// Edge-triggered; consumed by the player update.
    pub target_requested: bool,
}

impl InputState {
    /// Fold one action into the state. Pause is a screen command and is ignored here.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Pitch { value } => self.pitch = value.clamp(-1.0, 1.0),
            Action::Yaw { value } => self.yaw = value.clamp(-1.0, 1.0),
            Action::Roll { value } => self.roll = value.clamp(-1.0, 1.0),
            Action::Throttle { value } => self.throttle = value.clamp(-1.0, 1.0),
            Action::Shoot { slot, pressed } => {
                if let Some(trigger) = self.shoot.get_mut(slot) {
                    *trigger = pressed;
                } else {
                    log::warn!("shoot action for unknown weapon slot {slot}");
                }
            }
            Action::Target => self.target_requested = true,
            Action::Pause => {}
        }
    }

    /// Take the pending target request, clearing it.
    pub fn take_target_request(&mut self) -> bool {
        std::mem::take(&mut self.target_requested)
    }
}

/// All possible player commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Menus ---
    OpenMissionSelect,
    OpenCustomize,
    /// Pick a jet while in Customize.
    SelectJet { index: usize },
    /// Pick a mission while in MissionSelect; moves to the briefing.
    SelectMission { index: usize },
    /// Leave the briefing and fly. Creates the map data.
    StartMission,
    /// Abandon or finish a mission. Clears the map data.
    ReturnToMissionSelect,
    ReturnToMenu,

    // --- Simulation control ---
    Pause,
    Resume,

    // --- Flight ---
    Input { action: Action },
}
