//! Error types for configuration loading and simulation invariants.

use thiserror::Error;

/// Problems found while loading the weapon/jet/mission roster.
///
/// Reported once at load and replaced by a fallback; never reaches the tick loop.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed roster: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("roster has no {0}")]
    EmptyRoster(&'static str),
    #[error("'{owner}' references unknown weapon '{name}'")]
    UnknownReference { owner: String, name: String },
}

/// Simulation invariant violations surfaced as recoverable results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("object pool exhausted (capacity {capacity})")]
    PoolExhausted { capacity: usize },
    #[error("weapon slot {slot} out of range ({slots} slots)")]
    WeaponSlotOutOfRange { slot: usize, slots: usize },
    #[error("no map data loaded")]
    NoMapData,
}
