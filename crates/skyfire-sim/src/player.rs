//! The player's aircraft: flight model, target lock and weapon slots.

use glam::{Quat, Vec3};

use skyfire_core::commands::{Action, InputState};
use skyfire_core::config::JetProfile;
use skyfire_core::constants::*;
use skyfire_core::enums::{ObjectKind, Team};
use skyfire_core::error::SimError;
use skyfire_core::math::normalize_or;
use skyfire_core::types::Signal;

use crate::bullet::Bullet;
use crate::guidance;
use crate::object::{SimObject, Vitals};
use crate::registry::{Contact, Registry};
use crate::weapon::{Energy, WeaponSlot};

/// Result of one player update.
#[derive(Debug, Default)]
pub struct PlayerTick {
    pub bullets: Vec<Bullet>,
    /// Callsign newly locked this tick.
    pub locked: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Player {
    vitals: Vitals,
    position: Vec3,
    orientation: Quat,
    speed: f32,
    max_speed: f32,
    weapons: Vec<WeaponSlot>,
    energy: Energy,
    input: InputState,
    target: Signal,
}

impl Player {
    pub fn new(jet: &JetProfile, position: Vec3, heading: Vec3) -> Self {
        let max_speed = jet.max_speed.max(PLAYER_MIN_SPEED);
        Self {
            vitals: Vitals::new(),
            position,
            orientation: Quat::from_rotation_arc(Vec3::Z, normalize_or(heading, Vec3::Z)),
            speed: PLAYER_DEFAULT_SPEED.clamp(PLAYER_MIN_SPEED, max_speed),
            max_speed,
            weapons: jet
                .weapons
                .iter()
                .take(PLAYER_MAX_WEAPONS)
                .cloned()
                .map(WeaponSlot::new)
                .collect(),
            energy: Energy::player(),
            input: InputState::default(),
            target: Signal::NONE,
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        self.input.apply(action);
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn weapon(&self, slot: usize) -> Result<&WeaponSlot, SimError> {
        self.weapons.get(slot).ok_or(SimError::WeaponSlotOutOfRange {
            slot,
            slots: self.weapons.len(),
        })
    }

    pub fn weapons(&self) -> &[WeaponSlot] {
        &self.weapons
    }

    pub fn energy(&self) -> &Energy {
        &self.energy
    }

    pub fn target(&self) -> Signal {
        self.target
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Advance one tick: fly, refresh the lock, then pull every held trigger.
    pub fn update(&mut self, dt: f32, registry: &Registry) -> PlayerTick {
        let mut tick = PlayerTick::default();
        if !self.is_alive() {
            return tick;
        }

        self.fly(dt);
        self.energy.update(dt);
        for slot in &mut self.weapons {
            slot.update(dt);
        }

        let contact = self.refresh_target(registry, &mut tick);

        for index in 0..self.weapons.len() {
            if !self.input.shoot[index] {
                continue;
            }
            if let Some(bullet) = self.fire_slot(index, contact.as_ref()) {
                tick.bullets.push(bullet);
            }
        }
        tick
    }

    fn fly(&mut self, dt: f32) {
        let input = self.input;
        let turn = Quat::from_rotation_x(-input.pitch * PLAYER_PITCH_RATE * dt)
            * Quat::from_rotation_y(-input.yaw * PLAYER_YAW_RATE * dt)
            * Quat::from_rotation_z(input.roll * PLAYER_ROLL_RATE * dt);
        self.orientation = (self.orientation * turn).normalize();
        self.speed = (self.speed + input.throttle * PLAYER_THROTTLE_ACCEL * dt)
            .clamp(PLAYER_MIN_SPEED, self.max_speed);
        self.position += self.direction() * self.speed * dt;
    }

    /// Handle a pending lock request and re-resolve the current target.
    /// A target missing from the registry is dropped.
    fn refresh_target(&mut self, registry: &Registry, tick: &mut PlayerTick) -> Option<Contact> {
        if self.input.take_target_request() {
            match registry.best_in_cone(Team::Enemy, self.position, self.direction()) {
                Some(contact) => {
                    log::debug!("target locked: {}", contact.signal.callsign);
                    self.target = contact.signal;
                    tick.locked = Some(contact.signal.callsign);
                }
                None => self.target = Signal::NONE,
            }
        }
        if !self.target.is_valid() {
            return None;
        }
        match registry.resolve(&self.target) {
            Some(contact) => {
                self.target = contact.signal;
                Some(*contact)
            }
            None => {
                log::debug!("target lost: {}", self.target.callsign);
                self.target = Signal::NONE;
                None
            }
        }
    }

    fn fire_slot(&mut self, index: usize, contact: Option<&Contact>) -> Option<Bullet> {
        let direction = self.direction();
        let origin = self.position + direction * MUZZLE_OFFSET;
        let slot = self.weapons.get_mut(index)?;
        let profile = slot.profile().clone();

        let mut aim = direction;
        if let Some(contact) = contact.filter(|_| profile.kind.leads_target()) {
            let lead = guidance::predict_lead(
                profile.speed,
                origin,
                contact.position(),
                contact.velocity,
            );
            if guidance::matches(direction, origin, lead) {
                aim = normalize_or(lead - origin, direction);
            }
        }
        slot.fire(&mut self.energy, origin, aim, Team::Player, self.target)
    }
}

impl SimObject for Player {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Player
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
        self.orientation * Vec3::Z
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn collision_radius(&self) -> f32 {
        PLAYER_COLLISION_RADIUS
    }

    fn team(&self) -> Team {
        Team::Player
    }

    fn callsign(&self) -> Option<u32> {
        Some(PLAYER_CALLSIGN)
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }
}
