//! Shared capability set of every simulated object.
//!
//! The variant set is closed (Bullet, Enemy, Player) and every system is
//! generic over `SimObject`, so dispatch is static.

use glam::{Quat, Vec3};

use skyfire_core::constants::MAX_HEALTH;
use skyfire_core::enums::{ObjectKind, Status, Team};
use skyfire_core::types::Signal;

use crate::render::{DrawItem, DrawSink, ViewContext};

/// Status, health and score, kept together so a killing blow updates
/// health and status in one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    status: Status,
    health: f32,
    score: u32,
}

impl Vitals {
    pub fn new() -> Self {
        Self {
            status: Status::Alive,
            health: MAX_HEALTH,
            score: 0,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    /// Apply non-negative damage. Returns true when this blow killed.
    ///
    /// Damage to a dead object is ignored so a kill is never applied twice.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.status == Status::Dead {
            return false;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.health = (self.health - amount).max(0.0);
        if self.health == 0.0 {
            self.status = Status::Dead;
            return true;
        }
        false
    }

    /// Kill outright (bullets expiring or hitting).
    pub fn kill(&mut self) {
        self.health = 0.0;
        self.status = Status::Dead;
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new()
    }
}

pub trait SimObject {
    fn kind(&self) -> ObjectKind;
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;
    fn position(&self) -> Vec3;
    /// Unit heading.
    fn direction(&self) -> Vec3;
    fn speed(&self) -> f32;
    fn collision_radius(&self) -> f32;
    fn team(&self) -> Team;

    /// Identity for targeting. Only targetable objects have one.
    fn callsign(&self) -> Option<u32> {
        None
    }

    fn orientation(&self) -> Quat {
        Quat::from_rotation_arc(Vec3::Z, self.direction())
    }

    fn alpha(&self) -> f32 {
        1.0
    }

    fn status(&self) -> Status {
        self.vitals().status()
    }

    fn health(&self) -> f32 {
        self.vitals().health()
    }

    fn score(&self) -> u32 {
        self.vitals().score()
    }

    fn is_alive(&self) -> bool {
        self.vitals().is_alive()
    }

    fn velocity(&self) -> Vec3 {
        self.direction() * self.speed()
    }

    fn add_score(&mut self, points: u32) {
        self.vitals_mut().add_score(points);
    }

    fn take_damage(&mut self, amount: f32) -> bool {
        self.vitals_mut().take_damage(amount)
    }

    /// Snapshot of this object for others to target. `Signal::NONE` if untargetable.
    fn signal(&self) -> Signal {
        match self.callsign() {
            Some(callsign) => Signal::new(self.position(), self.team(), callsign),
            None => Signal::NONE,
        }
    }

    /// Emit this object's draw item if it is alive and in view.
    fn render(&self, ctx: &ViewContext, sink: &mut dyn DrawSink) {
        if self.status() != Status::Alive || !ctx.is_visible(self.position()) {
            return;
        }
        sink.draw(DrawItem::new(
            ctx,
            self.kind(),
            self.callsign(),
            self.position(),
            self.orientation(),
            self.alpha(),
        ));
    }
}
