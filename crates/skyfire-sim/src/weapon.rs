//! Weapon slots: cooldown, clip and energy gating.

use std::sync::Arc;

use glam::Vec3;

use skyfire_core::config::WeaponProfile;
use skyfire_core::constants::{PLAYER_ENERGY_REGEN, PLAYER_MAX_ENERGY};
use skyfire_core::enums::Team;
use skyfire_core::state::WeaponView;
use skyfire_core::types::Signal;

use crate::bullet::Bullet;

/// Energy reservoir drawn on by energy weapons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energy {
    current: f32,
    max: f32,
    regen_per_sec: f32,
}

impl Energy {
    pub fn new(max: f32, regen_per_sec: f32) -> Self {
        Self {
            current: max,
            max,
            regen_per_sec,
        }
    }

    pub fn player() -> Self {
        Self::new(PLAYER_MAX_ENERGY, PLAYER_ENERGY_REGEN)
    }

    /// Enemies never run dry.
    pub fn unlimited() -> Self {
        Self::new(f32::INFINITY, 0.0)
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn fraction(&self) -> f32 {
        if self.max.is_finite() && self.max > 0.0 {
            self.current / self.max
        } else {
            1.0
        }
    }

    pub fn can_spend(&self, amount: f32) -> bool {
        self.current >= amount
    }

    fn spend(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn update(&mut self, dt: f32) {
        self.current = (self.current + self.regen_per_sec * dt).min(self.max);
    }
}

#[derive(Debug, Clone)]
pub struct WeaponSlot {
    profile: Arc<WeaponProfile>,
    /// Seconds since the last shot, capped at `delay`.
    cooldown: f32,
    clip: u32,
    reload_timer: f32,
}

impl WeaponSlot {
    /// A slot with a full clip that can fire immediately.
    pub fn new(profile: Arc<WeaponProfile>) -> Self {
        Self {
            cooldown: profile.delay,
            clip: profile.capacity,
            reload_timer: 0.0,
            profile,
        }
    }

    pub fn profile(&self) -> &Arc<WeaponProfile> {
        &self.profile
    }

    pub fn clip(&self) -> u32 {
        self.clip
    }

    pub fn is_reloading(&self) -> bool {
        self.clip == 0
    }

    pub fn update(&mut self, dt: f32) {
        self.cooldown = (self.cooldown + dt).min(self.profile.delay);
        if self.clip == 0 {
            self.reload_timer += dt;
            if self.reload_timer >= self.profile.reload {
                self.clip = self.profile.capacity;
                self.reload_timer = 0.0;
            }
        }
    }

    pub fn ready(&self, energy: &Energy) -> bool {
        self.cooldown >= self.profile.delay
            && self.clip > 0
            && energy.can_spend(self.profile.energy_cost)
    }

    /// Fire if ready, spending a round and the weapon's energy cost.
    pub fn fire(
        &mut self,
        energy: &mut Energy,
        origin: Vec3,
        direction: Vec3,
        owner: Team,
        target: Signal,
    ) -> Option<Bullet> {
        if !self.ready(energy) {
            return None;
        }
        self.cooldown = 0.0;
        self.clip -= 1;
        energy.spend(self.profile.energy_cost);
        Some(Bullet::new(&self.profile, owner, origin, direction, target))
    }

    /// `cooldown / delay`; 1.0 means ready.
    pub fn reload_fraction(&self) -> f32 {
        if self.profile.delay <= 0.0 {
            1.0
        } else {
            self.cooldown / self.profile.delay
        }
    }

    pub fn view(&self) -> WeaponView {
        WeaponView {
            name: self.profile.name.clone(),
            kind: self.profile.kind,
            reload_fraction: self.reload_fraction(),
            clip: self.clip,
            capacity: self.profile.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_core::enums::BulletKind;

    fn profile(delay: f32, capacity: u32, energy_cost: f32) -> Arc<WeaponProfile> {
        Arc::new(WeaponProfile {
            name: "Test".into(),
            kind: BulletKind::Blaster,
            damage: 10.0,
            speed: 100.0,
            delay,
            reload: 1.0,
            capacity,
            energy_cost,
            max_distance: 100.0,
            score_per_hit: 1,
        })
    }

    fn shoot(slot: &mut WeaponSlot, energy: &mut Energy) -> bool {
        slot.fire(energy, Vec3::ZERO, Vec3::Z, Team::Player, Signal::NONE)
            .is_some()
    }

    #[test]
    fn test_new_slot_fires_immediately_then_cools_down() {
        let mut slot = WeaponSlot::new(profile(0.5, 10, 0.0));
        let mut energy = Energy::unlimited();
        assert_eq!(slot.reload_fraction(), 1.0);
        assert!(shoot(&mut slot, &mut energy));
        assert!(!shoot(&mut slot, &mut energy));
        assert_eq!(slot.reload_fraction(), 0.0);

        slot.update(0.25);
        assert!((slot.reload_fraction() - 0.5).abs() < 1e-6);
        assert!(!shoot(&mut slot, &mut energy));
        slot.update(0.3);
        assert_eq!(slot.reload_fraction(), 1.0);
        assert!(shoot(&mut slot, &mut energy));
    }

    #[test]
    fn test_empty_clip_reloads_after_reload_time() {
        let mut slot = WeaponSlot::new(profile(0.0, 2, 0.0));
        let mut energy = Energy::unlimited();
        assert!(shoot(&mut slot, &mut energy));
        assert!(shoot(&mut slot, &mut energy));
        assert!(slot.is_reloading());
        assert!(!shoot(&mut slot, &mut energy));

        slot.update(0.5);
        assert!(slot.is_reloading());
        slot.update(0.5);
        assert_eq!(slot.clip(), 2);
        assert!(shoot(&mut slot, &mut energy));
    }

    #[test]
    fn test_energy_gates_firing_and_regenerates() {
        let mut slot = WeaponSlot::new(profile(0.0, 100, 40.0));
        let mut energy = Energy::new(100.0, 10.0);
        assert!(shoot(&mut slot, &mut energy));
        assert!(shoot(&mut slot, &mut energy));
        assert!(!shoot(&mut slot, &mut energy), "20 energy left, costs 40");
        energy.update(2.0);
        assert_eq!(energy.current(), 40.0);
        assert!(shoot(&mut slot, &mut energy));
        energy.update(100.0);
        assert_eq!(energy.current(), 100.0);
    }

    #[test]
    fn test_unlimited_energy_reads_full() {
        let mut energy = Energy::unlimited();
        energy.spend(1.0e9);
        assert_eq!(energy.fraction(), 1.0);
        assert!(energy.can_spend(1.0e9));
    }

    #[test]
    fn test_view_reports_slot_state() {
        let mut slot = WeaponSlot::new(profile(1.0, 3, 0.0));
        shoot(&mut slot, &mut Energy::unlimited());
        let view = slot.view();
        assert_eq!(view.clip, 2);
        assert_eq!(view.capacity, 3);
        assert_eq!(view.reload_fraction, 0.0);
    }
}
