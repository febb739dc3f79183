//! Targeting math: pursuit steering for homing projectiles and AI, lead
//! prediction and the auto-aim cone.

use glam::Vec3;

use skyfire_core::constants::*;
use skyfire_core::math::{distance, normalize_or};

/// Per-tick turn rate (radians) for an object flying at `speed`.
pub fn turn_rate(speed: f32, dt: f32) -> f32 {
    speed * TURN_RATE_FACTOR * dt
}

/// Steer `direction` toward `target_position` at a constant turn rate.
///
/// Constant-turn-rate pursuit, not proportional navigation: the perpendicular
/// component of the heading is kept and a component along the line of sight,
/// scaled by `tan(atan(dot) - turn_rate)`, is added. Flight feel depends on
/// this exact shape.
pub fn intercept(direction: Vec3, position: Vec3, target_position: Vec3, turn_rate: f32) -> Vec3 {
    let tgt_dir = (position - target_position).normalize_or_zero();
    if tgt_dir == Vec3::ZERO {
        return direction;
    }
    let angle = direction.dot(tgt_dir).atan() - turn_rate;
    let arc = angle.tan();
    let steered = tgt_dir.cross(direction.cross(tgt_dir)) + tgt_dir * arc;
    let steered = normalize_or(steered, direction);
    if steered.is_finite() {
        steered
    } else {
        direction
    }
}

/// Predict where to aim a projectile of `speed` fired from `position` to hit
/// a target moving linearly at `target_velocity`.
///
/// Fixed-point iteration on flight time; a non-positive speed returns the
/// target's current position.
pub fn predict_lead(
    speed: f32,
    position: Vec3,
    target_position: Vec3,
    target_velocity: Vec3,
) -> Vec3 {
    if speed <= 0.0 {
        return target_position;
    }
    let mut predicted = target_position;
    for _ in 0..LEAD_ITERATIONS {
        let time = distance(position, predicted) / speed;
        predicted = target_position + target_velocity * time;
    }
    predicted
}

/// Whether `target` lies within the aim cone around `facing` from `position`.
///
/// The boundary is inclusive.
pub fn matches(facing: Vec3, position: Vec3, target: Vec3) -> bool {
    let bearing = (target - position).normalize_or_zero();
    let facing = facing.normalize_or_zero();
    if bearing == Vec3::ZERO || facing == Vec3::ZERO {
        return false;
    }
    facing.dot(bearing) >= cone_cosine() - AIM_CONE_EPSILON
}

fn cone_cosine() -> f32 {
    AIM_CONE_HALF_ANGLE_DEG.to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_core::math::angle_between;

    fn bearing_at(degrees: f32) -> Vec3 {
        let r = degrees.to_radians();
        Vec3::new(r.sin(), 0.0, r.cos()) * 100.0
    }

    #[test]
    fn test_intercept_straight_ahead_keeps_heading() {
        let position = Vec3::new(5.0, -2.0, 1.0);
        let direction = Vec3::Z;
        let target = position + direction * 250.0;
        for rate in [0.0, 0.01, 0.1, 0.5] {
            let new_dir = intercept(direction, position, target, rate);
            assert!(
                angle_between(new_dir, direction) < 1e-3,
                "deviated with turn rate {rate}: {new_dir:?}"
            );
        }
    }

    #[test]
    fn test_intercept_turns_toward_offset_target() {
        let direction = Vec3::Z;
        let target = Vec3::new(100.0, 0.0, 100.0);
        let new_dir = intercept(direction, Vec3::ZERO, target, 0.05);
        assert!((new_dir.length() - 1.0).abs() < 1e-5);
        assert!(new_dir.x > 0.0, "should swing toward +x: {new_dir:?}");
        assert!(angle_between(new_dir, target) < angle_between(direction, target));
    }

    #[test]
    fn test_intercept_on_top_of_target_keeps_heading() {
        let d = Vec3::X;
        assert_eq!(intercept(d, Vec3::ONE, Vec3::ONE, 0.1), d);
    }

    #[test]
    fn test_pursuit_converges_on_stationary_target() {
        let mut position = Vec3::ZERO;
        let mut direction = Vec3::Z;
        let target = Vec3::new(300.0, 50.0, 200.0);
        let speed = 60.0;
        let mut closest = f32::MAX;
        for _ in 0..2000 {
            direction = intercept(direction, position, target, turn_rate(speed, DT));
            position += direction * speed * DT;
            closest = closest.min(position.distance(target));
        }
        assert!(closest < 10.0, "closest approach {closest}");
    }

    #[test]
    fn test_lead_of_stationary_target_is_target() {
        let target = Vec3::new(10.0, 20.0, 30.0);
        assert_eq!(predict_lead(100.0, Vec3::ZERO, target, Vec3::ZERO), target);
    }

    #[test]
    fn test_lead_converges_to_fixed_point() {
        let shooter = Vec3::ZERO;
        let target = Vec3::new(0.0, 0.0, 500.0);
        let velocity = Vec3::new(40.0, 0.0, 0.0);
        let speed = 400.0;
        let lead = predict_lead(speed, shooter, target, velocity);

        assert!(lead.x > 0.0);
        let time = shooter.distance(lead) / speed;
        let expected = target + velocity * time;
        assert!(lead.distance(expected) < 0.01, "{lead:?} vs {expected:?}");
    }

    #[test]
    fn test_cone_boundary_inclusive_at_fifteen_degrees() {
        let facing = Vec3::Z;
        assert!(matches(facing, Vec3::ZERO, bearing_at(0.0)));
        assert!(matches(facing, Vec3::ZERO, bearing_at(15.0)));
        assert!(!matches(facing, Vec3::ZERO, bearing_at(15.01)));
        assert!(!matches(facing, Vec3::ZERO, bearing_at(-15.01)));
        assert!(!matches(facing, Vec3::ZERO, bearing_at(180.0)));
    }

    #[test]
    fn test_cone_rejects_degenerate_bearing() {
        assert!(!matches(Vec3::Z, Vec3::ONE, Vec3::ONE));
    }
}
