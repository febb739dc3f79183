//! Events emitted by the simulation for audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::{BulletKind, Screen, Team};

/// Fire-and-forget audio cues, drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A weapon fired successfully.
    WeaponFired { kind: BulletKind, team: Team },
    /// An enemy was destroyed.
    EnemyDestroyed { callsign: u32 },
    /// The player took a hit.
    PlayerHit { damage: f32 },
    /// Target lock acquired.
    TargetLocked { callsign: u32 },
    /// The screen changed (mission win, death, pause...).
    ScreenChanged { screen: Screen },
}
