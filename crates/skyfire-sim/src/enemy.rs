//! Enemy fighters. They pursue the player and shoot when the lead point
//! falls inside their aim cone.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;

use skyfire_core::config::{MissionProfile, WeaponProfile};
use skyfire_core::constants::*;
use skyfire_core::enums::{ObjectKind, Team};
use skyfire_core::math::{distance, normalize_or, random_range, random_unit_vector};
use skyfire_core::types::Signal;

use crate::bullet::Bullet;
use crate::guidance;
use crate::object::{SimObject, Vitals};
use crate::registry::Registry;
use crate::weapon::{Energy, WeaponSlot};

#[derive(Debug, Clone)]
pub struct Enemy {
    callsign: u32,
    vitals: Vitals,
    position: Vec3,
    direction: Vec3,
    speed: f32,
    weapon: WeaponSlot,
    energy: Energy,
    target: Signal,
}

impl Enemy {
    pub fn new(
        callsign: u32,
        position: Vec3,
        direction: Vec3,
        speed: f32,
        weapon: Arc<WeaponProfile>,
    ) -> Self {
        Self {
            callsign,
            vitals: Vitals::new(),
            position,
            direction: normalize_or(direction, Vec3::Z),
            speed,
            weapon: WeaponSlot::new(weapon),
            energy: Energy::unlimited(),
            target: Signal::NONE,
        }
    }

    /// Place an enemy for `mission` on a random shell around `center`,
    /// heading roughly toward it.
    pub fn spawn_around<R: Rng + ?Sized>(
        rng: &mut R,
        callsign: u32,
        center: Vec3,
        mission: &MissionProfile,
    ) -> Self {
        let radius = random_range(rng, ENEMY_SPAWN_MIN_RADIUS, ENEMY_SPAWN_MAX_RADIUS);
        let position = center + random_unit_vector(rng) * radius;
        let jitter = random_unit_vector(rng) * 0.2;
        let direction = normalize_or(center - position, Vec3::Z) + jitter;
        Self::new(
            callsign,
            position,
            direction,
            mission.enemy_speed,
            mission.enemy_weapon.clone(),
        )
    }

    pub fn target(&self) -> Signal {
        self.target
    }

    pub fn weapon(&self) -> &WeaponSlot {
        &self.weapon
    }

    /// Advance one tick. Returns the bullet fired this tick, if any.
    pub fn update(&mut self, dt: f32, registry: &Registry) -> Option<Bullet> {
        if !self.is_alive() {
            return None;
        }

        let contact = registry.of_team(Team::Player).next().copied();
        self.target = contact.map(|c| c.signal).unwrap_or(Signal::NONE);

        if let Some(contact) = &contact {
            let rate = guidance::turn_rate(self.speed, dt);
            self.direction =
                guidance::intercept(self.direction, self.position, contact.position(), rate);
        }
        self.position += self.direction * self.speed * dt;
        self.weapon.update(dt);

        let contact = contact?;
        let profile = self.weapon.profile().clone();
        let aim_point = if profile.kind.leads_target() {
            guidance::predict_lead(profile.speed, self.position, contact.position(), contact.velocity)
        } else {
            contact.position()
        };
        if distance(self.position, aim_point) > profile.max_distance
            || !guidance::matches(self.direction, self.position, aim_point)
        {
            return None;
        }
        let aim = normalize_or(aim_point - self.position, self.direction);
        self.weapon
            .fire(&mut self.energy, self.position, aim, Team::Enemy, self.target)
    }
}

impl SimObject for Enemy {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Enemy
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn direction(&self) -> Vec3 {
        self.direction
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn collision_radius(&self) -> f32 {
        ENEMY_COLLISION_RADIUS
    }

    fn team(&self) -> Team {
        Team::Enemy
    }

    fn callsign(&self) -> Option<u32> {
        Some(self.callsign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skyfire_core::config::Roster;

    use crate::registry::Contact;

    fn player_at(position: Vec3) -> Registry {
        let mut registry = Registry::new();
        registry.push(Contact {
            signal: Signal::new(position, Team::Player, PLAYER_CALLSIGN),
            handle: None,
            velocity: Vec3::ZERO,
            radius: PLAYER_COLLISION_RADIUS,
        });
        registry
    }

    fn enemy_blaster() -> Arc<WeaponProfile> {
        Roster::default().weapon("Enemy Blaster").unwrap()
    }

    #[test]
    fn test_fires_at_player_in_cone_and_range() {
        let mut enemy = Enemy::new(1, Vec3::ZERO, Vec3::Z, 40.0, enemy_blaster());
        let registry = player_at(Vec3::new(0.0, 0.0, 200.0));
        let bullet = enemy.update(DT, &registry).expect("should fire");
        assert_eq!(bullet.owner(), Team::Enemy);
        assert!(bullet.direction().z > 0.99);
        assert_eq!(enemy.target().callsign, PLAYER_CALLSIGN);

        assert!(enemy.update(DT, &registry).is_none(), "cooling down");
    }

    #[test]
    fn test_holds_fire_out_of_range() {
        let mut enemy = Enemy::new(1, Vec3::ZERO, Vec3::Z, 40.0, enemy_blaster());
        let registry = player_at(Vec3::new(0.0, 0.0, 5000.0));
        assert!(enemy.update(DT, &registry).is_none());
    }

    #[test]
    fn test_holds_fire_outside_cone_and_turns_toward_player() {
        let mut enemy = Enemy::new(1, Vec3::ZERO, Vec3::Z, 40.0, enemy_blaster());
        let registry = player_at(Vec3::new(200.0, 0.0, 0.0));
        assert!(enemy.update(DT, &registry).is_none());
        assert!(enemy.direction().x > 0.0);
    }

    #[test]
    fn test_without_player_flies_straight() {
        let mut enemy = Enemy::new(1, Vec3::ZERO, Vec3::Z, 60.0, enemy_blaster());
        assert!(enemy.update(1.0, &Registry::new()).is_none());
        assert_eq!(enemy.position(), Vec3::new(0.0, 0.0, 60.0));
        assert!(!enemy.target().is_valid());
    }

    #[test]
    fn test_spawn_around_is_on_shell_and_targetable() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let roster = Roster::default();
        let mission = roster.mission(0);
        for callsign in 1..20 {
            let enemy = Enemy::spawn_around(&mut rng, callsign, Vec3::ZERO, mission);
            let r = enemy.position().length();
            assert!(r >= ENEMY_SPAWN_MIN_RADIUS - 1e-2 && r <= ENEMY_SPAWN_MAX_RADIUS + 1e-2);
            assert_eq!(enemy.signal().callsign, callsign);
            assert_eq!(enemy.speed(), mission.enemy_speed);
        }
    }
}
