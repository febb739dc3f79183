//! Bullet vs target collision.
//!
//! Brute force: every live bullet is tested once per tick against every
//! contact of the opposing team. The sweep runs against a snapshot of the
//! targets, so the bullet list and the target list are never borrowed (or
//! locked) at the same time. Hits are applied to the targets afterwards.

use glam::Vec3;

use skyfire_core::math::segment_point_distance;

use crate::bullet::Bullet;
use crate::entity_list::EntityList;
use crate::object::SimObject;
use crate::pool::Handle;
use crate::registry::Contact;

/// Whether the segment `origin..origin + ray` passes within `radius_sum` of
/// `point`. The boundary counts as a hit.
pub fn ray_hits(origin: Vec3, ray: Vec3, point: Vec3, radius_sum: f32) -> bool {
    segment_point_distance(origin, ray, point) <= radius_sum
}

/// One bullet striking one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Pool handle of the target; `None` for the player.
    pub target: Option<Handle>,
    pub callsign: u32,
    pub damage: f32,
    /// Points credited to the shooter.
    pub score: u32,
}

/// Outcome of applying a batch of hits to a target list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    /// Hits that landed on a target still alive at the time.
    pub landed: u32,
    pub score: u32,
    /// Callsigns killed by this batch.
    pub kills: Vec<u32>,
}

/// Test every active bullet against `targets` and collect the hits.
pub fn sweep(bullets: &mut EntityList<Bullet>, targets: &[Contact], dt: f32) -> Vec<Hit> {
    let mut hits = Vec::new();
    bullets.for_each_active_mut(|_, bullet| {
        for target in targets {
            if !bullet.is_alive() {
                break;
            }
            if let Some(hit) = bullet.process_collision(target, dt) {
                log::trace!("hit {} for {:.1}", hit.callsign, hit.damage);
                hits.push(hit);
            }
        }
    });
    hits
}

/// Apply hits to pooled targets. Hits on an already dead target are skipped.
pub fn apply_hits<T: SimObject>(targets: &mut EntityList<T>, hits: &[Hit]) -> HitReport {
    let mut report = HitReport::default();
    for hit in hits {
        let Some(target) = hit.target.and_then(|h| targets.get_mut(h)) else {
            continue;
        };
        if let Some(kill) = land(target, hit, &mut report) {
            report.kills.push(kill);
        }
    }
    report
}

/// Apply hits to a single unpooled target (the player).
pub fn apply_hits_to<T: SimObject>(target: &mut T, hits: &[Hit]) -> HitReport {
    let mut report = HitReport::default();
    for hit in hits {
        if let Some(kill) = land(target, hit, &mut report) {
            report.kills.push(kill);
        }
    }
    report
}

fn land<T: SimObject>(target: &mut T, hit: &Hit, report: &mut HitReport) -> Option<u32> {
    if !target.is_alive() {
        return None;
    }
    report.landed += 1;
    report.score += hit.score;
    target.take_damage(hit.damage).then_some(hit.callsign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use skyfire_core::config::WeaponProfile;
    use skyfire_core::constants::*;
    use skyfire_core::enums::{BulletKind, Team};
    use skyfire_core::types::Signal;

    use crate::enemy::Enemy;
    use crate::registry::Registry;

    fn blaster(damage: f32) -> Arc<WeaponProfile> {
        Arc::new(WeaponProfile {
            name: "Blaster".into(),
            kind: BulletKind::Blaster,
            damage,
            speed: 60.0,
            delay: 0.1,
            reload: 1.0,
            capacity: 10,
            energy_cost: 0.0,
            max_distance: 1000.0,
            score_per_hit: 10,
        })
    }

    #[test]
    fn test_ray_boundary_is_inclusive() {
        let r1 = BLASTER_COLLISION_RADIUS;
        let r2 = ENEMY_COLLISION_RADIUS;
        let origin = Vec3::ZERO;
        let ray = Vec3::new(0.0, 0.0, 10.0);
        let at_edge = Vec3::new(r1 + r2, 0.0, 5.0);
        assert!(ray_hits(origin, ray, at_edge, r1 + r2));
        let past_edge = Vec3::new(r1 + r2 + 1e-3, 0.0, 5.0);
        assert!(!ray_hits(origin, ray, past_edge, r1 + r2));
    }

    #[test]
    fn test_ray_clamps_to_segment_ends() {
        let ray = Vec3::new(0.0, 0.0, 10.0);
        assert!(!ray_hits(Vec3::ZERO, ray, Vec3::new(0.0, 0.0, -2.0), 1.0));
        assert!(ray_hits(Vec3::ZERO, ray, Vec3::new(0.0, 0.0, -0.5), 1.0));
        assert!(!ray_hits(Vec3::ZERO, ray, Vec3::new(0.0, 0.0, 12.0), 1.0));
        assert!(ray_hits(Vec3::ZERO, ray, Vec3::new(0.0, 0.0, 10.5), 1.0));
    }

    #[test]
    fn test_sweep_and_apply_kills_once() {
        let mut enemies = EntityList::with_capacity(4);
        let profile = blaster(60.0);
        let target = enemies
            .spawn(Enemy::new(1, Vec3::new(0.0, 0.0, 1.0), Vec3::Z, 0.0, profile.clone()))
            .unwrap();

        let mut bullets = EntityList::with_capacity(8);
        for _ in 0..3 {
            bullets
                .spawn(Bullet::new(&profile, Team::Player, Vec3::ZERO, Vec3::Z, Signal::NONE))
                .unwrap();
        }

        let mut registry = Registry::new();
        registry.extend_from(&enemies);
        let hits = sweep(&mut bullets, registry.contacts(), DT);
        assert_eq!(hits.len(), 3);

        let report = apply_hits(&mut enemies, &hits);
        assert_eq!(report.landed, 2, "third hit lands on a dead target");
        assert_eq!(report.score, 20);
        assert_eq!(report.kills, vec![1]);
        assert!(!enemies.get(target).unwrap().is_alive());
        assert_eq!(bullets.retire_dead(), 3);
    }

    #[test]
    fn test_sweep_skips_own_team() {
        let profile = blaster(10.0);
        let mut bullets = EntityList::with_capacity(2);
        bullets
            .spawn(Bullet::new(&profile, Team::Enemy, Vec3::ZERO, Vec3::Z, Signal::NONE))
            .unwrap();
        let friendly = Contact {
            signal: Signal::new(Vec3::new(0.0, 0.0, 1.0), Team::Enemy, 3),
            handle: None,
            velocity: Vec3::ZERO,
            radius: ENEMY_COLLISION_RADIUS,
        };
        assert!(sweep(&mut bullets, &[friendly], DT).is_empty());
    }

    #[test]
    fn test_stale_handle_hit_is_ignored() {
        let profile = blaster(10.0);
        let mut enemies = EntityList::with_ttl(1, 1);
        let h = enemies
            .spawn(Enemy::new(1, Vec3::ZERO, Vec3::Z, 0.0, profile.clone()))
            .unwrap();
        enemies.clear();
        let fresh = enemies
            .spawn(Enemy::new(2, Vec3::ZERO, Vec3::Z, 0.0, profile))
            .unwrap();
        let hit = Hit {
            target: Some(h),
            callsign: 1,
            damage: 50.0,
            score: 1,
        };
        let report = apply_hits(&mut enemies, &[hit]);
        assert_eq!(report.landed, 0);
        assert_eq!(enemies.get(fresh).unwrap().health(), MAX_HEALTH);
    }
}
