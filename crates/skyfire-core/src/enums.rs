//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a simulated object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Dead,
    #[default]
    Alive,
    /// Left the play area. Reserved; gameplay never sets it.
    Out,
    /// Present but not drawn. Reserved; gameplay never sets it.
    Invisible,
}

/// Allegiance of an object. `Invalid` doubles as the "no target" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Invalid,
    Player,
    Enemy,
}

/// Projectile family. Drives collision ray length, piercing and lead behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletKind {
    /// Slow homing projectile.
    Torpedo,
    /// Fast unguided bolt.
    #[default]
    Blaster,
    /// Instant-hit laser that fades out; damage falls off with its alpha.
    Slug,
}

impl BulletKind {
    /// Parse a roster weapon type. Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "torpedo" => Some(BulletKind::Torpedo),
            "blaster" => Some(BulletKind::Blaster),
            "slug" | "laser" => Some(BulletKind::Slug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BulletKind::Torpedo => "Torpedo",
            BulletKind::Blaster => "Blaster",
            BulletKind::Slug => "Slug",
        }
    }

    /// Whether a hit kills the projectile.
    pub fn is_piercing(&self) -> bool {
        matches!(self, BulletKind::Slug)
    }

    /// Whether the projectile carries the shooter's target and homes on it.
    pub fn tracks_target(&self) -> bool {
        matches!(self, BulletKind::Torpedo)
    }

    /// Whether the shooter aims at the predicted lead point.
    pub fn leads_target(&self) -> bool {
        matches!(self, BulletKind::Blaster | BulletKind::Slug)
    }
}

/// Closed set of simulated object variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Bullet(BulletKind),
    Enemy,
    Player,
}

/// Top-level screen state. Only `Game` advances the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    MainMenu,
    MissionSelect,
    Customize,
    GameBriefing,
    Game,
    GamePaused,
    Dead,
    Win,
}

impl Screen {
    /// Screens during which map data (player, enemies, bullets) exists.
    pub fn has_map_data(&self) -> bool {
        matches!(
            self,
            Screen::Game | Screen::GamePaused | Screen::Dead | Screen::Win
        )
    }
}
