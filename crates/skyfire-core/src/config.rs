//! Weapon, jet and mission roster.
//!
//! The asset loader hands us the roster as JSON. Bad entries are reported
//! once here and replaced by a safe fallback so the simulation never sees
//! a malformed profile.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_BULLET_SPEED, PLAYER_MAX_WEAPONS};
use crate::enums::BulletKind;
use crate::error::ConfigError;

/// Immutable weapon configuration, shared by every slot and bullet using it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponProfile {
    pub name: String,
    pub kind: BulletKind,
    pub damage: f32,
    /// Projectile speed (units/s). Ignored by Slug, which does not move.
    pub speed: f32,
    /// Cooldown between shots (seconds).
    pub delay: f32,
    /// Time to refill an empty clip (seconds).
    pub reload: f32,
    /// Clip size.
    pub capacity: u32,
    pub energy_cost: f32,
    pub max_distance: f32,
    pub score_per_hit: u32,
}

/// A selectable player aircraft.
#[derive(Debug, Clone)]
pub struct JetProfile {
    pub name: String,
    pub max_speed: f32,
    /// At most `PLAYER_MAX_WEAPONS` entries.
    pub weapons: Vec<Arc<WeaponProfile>>,
}

/// A selectable mission.
#[derive(Debug, Clone)]
pub struct MissionProfile {
    pub name: String,
    pub enemy_count: usize,
    pub enemy_speed: f32,
    pub enemy_weapon: Arc<WeaponProfile>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    weapons: Vec<WeaponEntry>,
    jets: Vec<JetEntry>,
    missions: Vec<MissionEntry>,
}

#[derive(Debug, Deserialize)]
struct WeaponEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    damage: f32,
    #[serde(default)]
    speed: f32,
    delay: f32,
    #[serde(default)]
    reload: f32,
    capacity: u32,
    #[serde(default)]
    energy_cost: f32,
    max_distance: f32,
    #[serde(default)]
    score_per_hit: u32,
}

#[derive(Debug, Deserialize)]
struct JetEntry {
    name: String,
    max_speed: f32,
    weapons: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MissionEntry {
    name: String,
    enemy_count: usize,
    enemy_speed: f32,
    enemy_weapon: String,
}

/// Every weapon, jet and mission the game knows about.
///
/// Always holds at least one of each; constructors guarantee it.
#[derive(Debug, Clone)]
pub struct Roster {
    weapons: Vec<Arc<WeaponProfile>>,
    jets: Vec<JetProfile>,
    missions: Vec<MissionProfile>,
}

impl Roster {
    /// Parse a roster. Unknown weapon types and dangling weapon names are
    /// defaulted with a warning; structural problems are errors.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: RosterFile = serde_json::from_str(json)?;
        if file.weapons.is_empty() {
            return Err(ConfigError::EmptyRoster("weapons"));
        }
        if file.jets.is_empty() {
            return Err(ConfigError::EmptyRoster("jets"));
        }
        if file.missions.is_empty() {
            return Err(ConfigError::EmptyRoster("missions"));
        }

        let weapons: Vec<Arc<WeaponProfile>> = file
            .weapons
            .into_iter()
            .map(|entry| Arc::new(resolve_weapon(entry)))
            .collect();

        let jets = file
            .jets
            .into_iter()
            .map(|entry| {
                let mut slots: Vec<Arc<WeaponProfile>> = entry
                    .weapons
                    .iter()
                    .map(|name| lookup_weapon(&weapons, name, &entry.name))
                    .collect();
                if slots.len() > PLAYER_MAX_WEAPONS {
                    log::warn!(
                        "jet '{}' lists {} weapons, keeping the first {}",
                        entry.name,
                        slots.len(),
                        PLAYER_MAX_WEAPONS
                    );
                    slots.truncate(PLAYER_MAX_WEAPONS);
                }
                if slots.is_empty() {
                    log::warn!("jet '{}' has no weapons, fitting '{}'", entry.name, weapons[0].name);
                    slots.push(weapons[0].clone());
                }
                JetProfile {
                    name: entry.name,
                    max_speed: entry.max_speed,
                    weapons: slots,
                }
            })
            .collect();

        let missions = file
            .missions
            .into_iter()
            .map(|entry| MissionProfile {
                enemy_weapon: lookup_weapon(&weapons, &entry.enemy_weapon, &entry.name),
                name: entry.name,
                enemy_count: entry.enemy_count,
                enemy_speed: entry.enemy_speed,
            })
            .collect();

        Ok(Self {
            weapons,
            jets,
            missions,
        })
    }

    /// Parse a roster, falling back to the built-in one on any error.
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(roster) => {
                log::info!(
                    "loaded roster: {} weapons, {} jets, {} missions",
                    roster.weapons.len(),
                    roster.jets.len(),
                    roster.missions.len()
                );
                roster
            }
            Err(e) => {
                log::warn!("{e}; using built-in roster");
                Self::default()
            }
        }
    }

    pub fn weapons(&self) -> &[Arc<WeaponProfile>] {
        &self.weapons
    }

    pub fn jets(&self) -> &[JetProfile] {
        &self.jets
    }

    pub fn missions(&self) -> &[MissionProfile] {
        &self.missions
    }

    /// Look up a weapon by name.
    pub fn weapon(&self, name: &str) -> Option<Arc<WeaponProfile>> {
        self.weapons.iter().find(|w| w.name == name).cloned()
    }

    /// Jet at `index`, or the first jet when out of range.
    pub fn jet(&self, index: usize) -> &JetProfile {
        self.jets.get(index).unwrap_or(&self.jets[0])
    }

    /// Mission at `index`, or the first mission when out of range.
    pub fn mission(&self, index: usize) -> &MissionProfile {
        self.missions.get(index).unwrap_or(&self.missions[0])
    }
}

impl Default for Roster {
    fn default() -> Self {
        let blaster = Arc::new(WeaponProfile {
            name: "Blaster".into(),
            kind: BulletKind::Blaster,
            damage: 10.0,
            speed: 400.0,
            delay: 0.15,
            reload: 1.5,
            capacity: 30,
            energy_cost: 0.0,
            max_distance: 800.0,
            score_per_hit: 10,
        });
        let torpedo = Arc::new(WeaponProfile {
            name: "Torpedo".into(),
            kind: BulletKind::Torpedo,
            damage: 40.0,
            speed: 150.0,
            delay: 1.0,
            reload: 4.0,
            capacity: 4,
            energy_cost: 0.0,
            max_distance: 1200.0,
            score_per_hit: 50,
        });
        let laser = Arc::new(WeaponProfile {
            name: "Laser".into(),
            kind: BulletKind::Slug,
            damage: 35.0,
            speed: 0.0,
            delay: 0.8,
            reload: 0.0,
            capacity: 1,
            energy_cost: 25.0,
            max_distance: 1000.0,
            score_per_hit: 25,
        });
        let enemy_blaster = Arc::new(WeaponProfile {
            name: "Enemy Blaster".into(),
            kind: BulletKind::Blaster,
            damage: 5.0,
            speed: 300.0,
            delay: 1.2,
            reload: 3.0,
            capacity: 8,
            energy_cost: 0.0,
            max_distance: 600.0,
            score_per_hit: 0,
        });

        Self {
            jets: vec![JetProfile {
                name: "Interceptor".into(),
                max_speed: 140.0,
                weapons: vec![blaster.clone(), torpedo.clone(), laser.clone()],
            }],
            missions: vec![
                MissionProfile {
                    name: "Patrol".into(),
                    enemy_count: 4,
                    enemy_speed: 45.0,
                    enemy_weapon: enemy_blaster.clone(),
                },
                MissionProfile {
                    name: "Strike".into(),
                    enemy_count: 12,
                    enemy_speed: 60.0,
                    enemy_weapon: enemy_blaster.clone(),
                },
            ],
            weapons: vec![blaster, torpedo, laser, enemy_blaster],
        }
    }
}

fn resolve_weapon(entry: WeaponEntry) -> WeaponProfile {
    let kind = BulletKind::parse(&entry.kind).unwrap_or_else(|| {
        log::warn!(
            "weapon '{}' has unknown type '{}', defaulting to {}",
            entry.name,
            entry.kind,
            BulletKind::default().as_str()
        );
        BulletKind::default()
    });
    let speed = if kind.is_piercing() || entry.speed > 0.0 {
        entry.speed.max(0.0)
    } else {
        log::warn!(
            "weapon '{}' has no usable speed ({}), defaulting to {FALLBACK_BULLET_SPEED}",
            entry.name,
            entry.speed
        );
        FALLBACK_BULLET_SPEED
    };
    WeaponProfile {
        name: entry.name,
        kind,
        damage: entry.damage.max(0.0),
        speed,
        delay: entry.delay.max(0.0),
        reload: entry.reload.max(0.0),
        capacity: entry.capacity.max(1),
        energy_cost: entry.energy_cost.max(0.0),
        max_distance: entry.max_distance.max(0.0),
        score_per_hit: entry.score_per_hit,
    }
}

fn lookup_weapon(weapons: &[Arc<WeaponProfile>], name: &str, owner: &str) -> Arc<WeaponProfile> {
    match weapons.iter().find(|w| w.name == name) {
        Some(w) => w.clone(),
        None => {
            let err = ConfigError::UnknownReference {
                owner: owner.to_string(),
                name: name.to_string(),
            };
            log::warn!("{err}, using '{}'", weapons[0].name);
            weapons[0].clone()
        }
    }
}
