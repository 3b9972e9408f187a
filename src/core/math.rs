//! Small vector helpers on top of `glam::Vec3`.
//!
//! Add/sub/scale/dot/cross/length come straight from glam. What lives here
//! are the closed-form axis rotations and a normalize that tolerates
//! degenerate input.

use glam::Vec3;

/// Vectors shorter than this normalize to zero instead of blowing up.
pub const NORMALIZE_EPSILON: f32 = 0.0001;

/// Unit vector in the direction of `v`, or `Vec3::ZERO` when `v` is (near) zero length.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > NORMALIZE_EPSILON {
        v * (1.0 / len)
    } else {
        Vec3::ZERO
    }
}

pub fn rotate_x(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

pub fn rotate_z(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn samples() -> Vec<Vec3> {
        vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, -0.6, 0.5),
            Vec3::new(2.8, 0.3, -0.4),
            Vec3::new(-3.0, 3.0, 3.0),
            Vec3::new(0.01, -0.02, 0.03),
        ]
    }

    #[test]
    fn normalize_gives_unit_length() {
        for v in samples() {
            let n = normalize(v);
            assert!((n.length() - 1.0).abs() < EPS, "{v:?} -> {n:?}");
        }
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(normalize(Vec3::splat(1e-6)), Vec3::ZERO);
    }

    #[test]
    fn rotations_preserve_length() {
        let angles = [0.0, 0.3, -1.2, std::f32::consts::PI, 7.5, -42.0];
        for v in samples() {
            for &a in &angles {
                for r in [rotate_x(v, a), rotate_y(v, a), rotate_z(v, a)] {
                    assert!((r.length() - v.length()).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn quarter_turns_match_right_hand_rule() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        assert!(rotate_x(Vec3::Y, half_pi).abs_diff_eq(Vec3::Z, EPS));
        assert!(rotate_y(Vec3::Z, half_pi).abs_diff_eq(Vec3::X, EPS));
        assert!(rotate_z(Vec3::X, half_pi).abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn rotation_leaves_its_axis_alone() {
        let v = Vec3::new(0.7, -1.1, 2.0);
        assert_eq!(rotate_x(v, 1.0).x, v.x);
        assert_eq!(rotate_y(v, 1.0).y, v.y);
        assert_eq!(rotate_z(v, 1.0).z, v.z);
    }
}
