//! Scripted pilot for headless runs. Turns each polled snapshot into the
//! input a player would give: sweep for a target, lock it, shoot it.

use skyfire_core::commands::{Action, PlayerCommand};
use skyfire_core::enums::Screen;
use skyfire_core::state::HudSnapshot;

/// Polls between direction changes of the search sweep.
const SWEEP_PERIOD: u32 = 12;

#[derive(Debug, Default)]
pub struct Autopilot {
    polls: u32,
    locked: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands to send after seeing `snapshot`.
    pub fn next(&mut self, snapshot: &HudSnapshot) -> Vec<PlayerCommand> {
        if snapshot.screen != Screen::Game {
            return Vec::new();
        }
        self.polls += 1;

        let mut actions = Vec::new();
        match (snapshot.locked_target, self.locked) {
            (Some(_), false) => {
                self.locked = true;
                actions.push(Action::Yaw { value: 0.0 });
                actions.push(Action::Shoot { slot: 0, pressed: true });
                actions.push(Action::Shoot { slot: 1, pressed: true });
            }
            (None, true) => {
                self.locked = false;
                actions.push(Action::Shoot { slot: 0, pressed: false });
                actions.push(Action::Shoot { slot: 1, pressed: false });
            }
            _ => {}
        }

        if !self.locked {
            let direction = if (self.polls / SWEEP_PERIOD) % 2 == 0 { 0.6 } else { -0.6 };
            actions.push(Action::Yaw { value: direction });
            actions.push(Action::Target);
        }

        let laser_ready = snapshot
            .weapons
            .get(2)
            .is_some_and(|w| w.reload_fraction >= 1.0 && w.clip > 0);
        actions.push(Action::Shoot {
            slot: 2,
            pressed: self.locked && laser_ready && snapshot.energy_fraction > 0.5,
        });

        actions
            .into_iter()
            .map(|action| PlayerCommand::Input { action })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(locked_target: Option<u32>) -> HudSnapshot {
        HudSnapshot {
            screen: Screen::Game,
            locked_target,
            energy_fraction: 1.0,
            ..HudSnapshot::default()
        }
    }

    fn actions(commands: Vec<PlayerCommand>) -> Vec<Action> {
        commands
            .into_iter()
            .filter_map(|c| match c {
                PlayerCommand::Input { action } => Some(action),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_idle_outside_game() {
        let mut pilot = Autopilot::new();
        let snapshot = HudSnapshot {
            screen: Screen::GamePaused,
            ..HudSnapshot::default()
        };
        assert!(pilot.next(&snapshot).is_empty());
    }

    #[test]
    fn test_searches_until_locked_then_fires() {
        let mut pilot = Autopilot::new();
        let searching = actions(pilot.next(&game(None)));
        assert!(searching.contains(&Action::Target));

        let engaging = actions(pilot.next(&game(Some(4))));
        assert!(engaging.contains(&Action::Shoot { slot: 0, pressed: true }));
        assert!(!engaging.contains(&Action::Target));

        let lost = actions(pilot.next(&game(None)));
        assert!(lost.contains(&Action::Shoot { slot: 0, pressed: false }));
        assert!(lost.contains(&Action::Target));
    }
}
