//! Projectiles: Blaster bolts, homing Torpedoes and fading Slug lasers.

use std::sync::Arc;

use glam::Vec3;

use skyfire_core::config::WeaponProfile;
use skyfire_core::constants::*;
use skyfire_core::enums::{BulletKind, ObjectKind, Team};
use skyfire_core::math::normalize_or;
use skyfire_core::types::Signal;

use crate::collision::{self, Hit};
use crate::guidance;
use crate::object::{SimObject, Vitals};
use crate::registry::{Contact, Registry};

#[derive(Debug, Clone)]
pub struct Bullet {
    profile: Arc<WeaponProfile>,
    vitals: Vitals,
    owner: Team,
    position: Vec3,
    direction: Vec3,
    travel_distance: f32,
    target: Signal,
    /// Callsigns this bullet has already damaged. A piercing Slug crosses
    /// the same targets on every tick of its lifetime.
    collided: Vec<u32>,
    alpha: f32,
}

impl Bullet {
    /// A fresh projectile leaving `origin` along `direction`.
    ///
    /// `target` is only kept by kinds that home.
    pub fn new(
        profile: &Arc<WeaponProfile>,
        owner: Team,
        origin: Vec3,
        direction: Vec3,
        target: Signal,
    ) -> Self {
        Self {
            profile: profile.clone(),
            vitals: Vitals::new(),
            owner,
            position: origin,
            direction: normalize_or(direction, Vec3::Z),
            travel_distance: 0.0,
            target: if profile.kind.tracks_target() {
                target
            } else {
                Signal::NONE
            },
            collided: Vec::new(),
            alpha: 1.0,
        }
    }

    pub fn bullet_kind(&self) -> BulletKind {
        self.profile.kind
    }

    pub fn profile(&self) -> &Arc<WeaponProfile> {
        &self.profile
    }

    pub fn owner(&self) -> Team {
        self.owner
    }

    pub fn travel_distance(&self) -> f32 {
        self.travel_distance
    }

    pub fn max_distance(&self) -> f32 {
        self.profile.max_distance
    }

    pub fn target(&self) -> Signal {
        self.target
    }

    pub fn has_hit(&self, callsign: u32) -> bool {
        self.collided.contains(&callsign)
    }

    /// Damage dealt by a hit right now. Slug damage fades with its alpha.
    pub fn damage(&self) -> f32 {
        match self.profile.kind {
            BulletKind::Slug => self.profile.damage * self.alpha,
            BulletKind::Blaster | BulletKind::Torpedo => self.profile.damage,
        }
    }

    pub fn score_per_hit(&self) -> u32 {
        self.profile.score_per_hit
    }

    /// Advance one tick. Torpedoes steer toward their target if it is still
    /// in the registry; a lost target is dropped and the torpedo flies straight.
    pub fn update(&mut self, dt: f32, registry: &Registry) {
        if !self.is_alive() {
            return;
        }
        match self.profile.kind {
            BulletKind::Slug => {
                self.alpha = (self.alpha - SLUG_FADE_PER_SEC * dt).max(0.0);
                if self.alpha <= 0.0 {
                    self.vitals.kill();
                }
            }
            BulletKind::Torpedo => {
                if self.target.is_valid() {
                    match registry.resolve(&self.target) {
                        Some(contact) => {
                            self.target = contact.signal;
                            let rate = guidance::turn_rate(self.profile.speed, dt);
                            self.direction = guidance::intercept(
                                self.direction,
                                self.position,
                                contact.position(),
                                rate,
                            );
                        }
                        None => {
                            log::trace!("torpedo lost target {}", self.target.callsign);
                            self.target = Signal::NONE;
                        }
                    }
                }
                self.advance(dt);
            }
            BulletKind::Blaster => self.advance(dt),
        }
    }

    fn advance(&mut self, dt: f32) {
        let step = self.profile.speed * dt;
        self.position += self.direction * step;
        self.travel_distance += step;
        if self.travel_distance > self.profile.max_distance {
            self.vitals.kill();
        }
    }

    /// Segment swept this tick, relative to the current position.
    pub fn collision_ray(&self, dt: f32) -> Vec3 {
        match self.profile.kind {
            BulletKind::Blaster => self.direction * self.profile.speed * dt * BLASTER_RAY_FACTOR,
            BulletKind::Torpedo => self.direction * self.profile.speed * dt * TORPEDO_RAY_FACTOR,
            BulletKind::Slug => self.direction * SLUG_RAY_LENGTH,
        }
    }

    /// Test this bullet against one target and, on a hit, resolve the
    /// bullet's side of it. The target's side is applied by the caller.
    pub fn process_collision(&mut self, target: &Contact, dt: f32) -> Option<Hit> {
        if !self.is_alive() || target.signal.team == self.owner {
            return None;
        }
        if self.has_hit(target.signal.callsign) {
            return None;
        }
        let radius_sum = self.collision_radius() + target.radius;
        if !collision::ray_hits(self.position, self.collision_ray(dt), target.position(), radius_sum) {
            return None;
        }

        let hit = Hit {
            target: target.handle,
            callsign: target.signal.callsign,
            damage: self.damage(),
            score: self.score_per_hit(),
        };
        if self.profile.kind.is_piercing() {
            self.collided.push(target.signal.callsign);
        } else {
            self.vitals.kill();
        }
        Some(hit)
    }
}

impl SimObject for Bullet {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Bullet(self.profile.kind)
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
        match self.profile.kind {
            BulletKind::Slug => 0.0,
            BulletKind::Blaster | BulletKind::Torpedo => self.profile.speed,
        }
    }

    fn collision_radius(&self) -> f32 {
        match self.profile.kind {
            BulletKind::Blaster => BLASTER_COLLISION_RADIUS,
            BulletKind::Torpedo => TORPEDO_COLLISION_RADIUS,
            BulletKind::Slug => SLUG_COLLISION_RADIUS,
        }
    }

    fn team(&self) -> Team {
        self.owner
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }
}
