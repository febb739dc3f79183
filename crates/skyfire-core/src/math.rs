//! Vector and geometry helpers shared by collision and targeting.
//!
//! Thin wrappers over `glam::Vec3`. Pure functions, no state.

use glam::Vec3;
use rand::Rng;

/// Distance between two points.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (b - a).length()
}

/// Normalize `v`, returning `fallback` when `v` has no usable direction.
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let n = v.normalize_or_zero();
    if n == Vec3::ZERO {
        fallback
    } else {
        n
    }
}

/// Nearest point to `point` on the segment starting at `origin` and spanning `ray`.
///
/// `t = dot(point - origin, ray)`. At or behind the origin the origin is
/// nearest; past the far end the end is nearest; otherwise the projection.
pub fn closest_point_on_segment(origin: Vec3, ray: Vec3, point: Vec3) -> Vec3 {
    let t = (point - origin).dot(ray);
    if t <= 0.0 {
        return origin;
    }
    let len_sq = ray.dot(ray);
    if len_sq <= t {
        return origin + ray;
    }
    origin + ray * (t / len_sq)
}

/// Distance from `point` to the segment `origin .. origin + ray`.
pub fn segment_point_distance(origin: Vec3, ray: Vec3, point: Vec3) -> f32 {
    distance(point, closest_point_on_segment(origin, ray, point))
}

/// Unsigned angle between two vectors in radians. Zero vectors yield 0.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let (a, b) = (a.normalize_or_zero(), b.normalize_or_zero());
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Uniform sample in `[lo, hi)`. Returns `lo` when the range is empty.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..hi)
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    // Rejection sample inside the unit ball, then project.
    loop {
        let v = Vec3::new(
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_closest_point_behind_origin() {
        let p = closest_point_on_segment(Vec3::ZERO, Vec3::Z * 10.0, Vec3::new(1.0, 0.0, -5.0));
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn test_closest_point_past_end() {
        let p = closest_point_on_segment(Vec3::ZERO, Vec3::Z * 10.0, Vec3::new(1.0, 0.0, 25.0));
        assert_eq!(p, Vec3::Z * 10.0);
    }

    #[test]
    fn test_closest_point_projection() {
        let p = closest_point_on_segment(Vec3::ZERO, Vec3::Z * 10.0, Vec3::new(3.0, 0.0, 5.0));
        assert_eq!(p, Vec3::new(0.0, 0.0, 5.0));
        let d = segment_point_distance(Vec3::ZERO, Vec3::Z * 10.0, Vec3::new(3.0, 0.0, 5.0));
        assert_eq!(d, 3.0);
    }

    #[test]
    fn test_zero_length_segment_is_a_point() {
        let d = segment_point_distance(Vec3::ONE, Vec3::ZERO, Vec3::new(1.0, 4.0, 1.0));
        assert!((d - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_or_fallback() {
        assert_eq!(normalize_or(Vec3::ZERO, Vec3::Z), Vec3::Z);
        assert_eq!(normalize_or(Vec3::X * 4.0, Vec3::Z), Vec3::X);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(Vec3::X, Vec3::Y);
        assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(angle_between(Vec3::ZERO, Vec3::Y), 0.0);
    }

    #[test]
    fn test_random_helpers_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let r = random_range(&mut rng, 2.0, 5.0);
            assert!((2.0..5.0).contains(&r));
            let u = random_unit_vector(&mut rng);
            assert!((u.length() - 1.0).abs() < 1e-4);
        }
        assert_eq!(random_range(&mut rng, 3.0, 3.0), 3.0);
    }
}
