//! Device angles to camera rotation.
//!
//! The sensor reports intrinsic Tait-Bryan angles of type Z-X'-Y''. In the
//! camera's Y-up frame that is the YXZ Euler sequence `(x = beta, y = alpha,
//! z = -gamma)`.

use glam::{DQuat, DVec3};
use std::f64::consts::FRAC_1_SQRT_2;

use crate::sample::{AbsencePolicy, OrientationSample, resolve_angle};

/// -90° about X: the camera looks out of the back of the device, not the top.
pub const CAMERA_OUT_BACK: DQuat = DQuat::from_xyzw(-FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);

/// Angles in radians, ready for [`orientation_quaternion`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleSet {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub orient: f64,
}

impl AngleSet {
    /// Normalize a raw sample plus screen angle into radians.
    ///
    /// The alpha offset only applies when alpha itself is present.
    pub fn resolve(
        sample: &OrientationSample,
        screen_degrees: i32,
        alpha_offset: f64,
        policy: AbsencePolicy,
    ) -> Self {
        let alpha = resolve_angle(sample.alpha, policy)
            .map(|a| a + alpha_offset)
            .unwrap_or(0.0);
        let beta = resolve_angle(sample.beta, policy).unwrap_or(0.0);
        let gamma = resolve_angle(sample.gamma, policy).unwrap_or(0.0);
        let orient = if screen_degrees != 0 {
            f64::from(screen_degrees).to_radians()
        } else {
            0.0
        };
        Self {
            alpha,
            beta,
            gamma,
            orient,
        }
    }

    pub fn quaternion(&self) -> DQuat {
        orientation_quaternion(self.alpha, self.beta, self.gamma, self.orient)
    }
}

/// Rotation for the given device angles and screen orientation (radians).
///
/// Composition order is fixed: `euler(YXZ) * CAMERA_OUT_BACK * Rz(-orient)`.
pub fn orientation_quaternion(alpha: f64, beta: f64, gamma: f64, orient: f64) -> DQuat {
    let device = DQuat::from_rotation_y(alpha)
        * DQuat::from_rotation_x(beta)
        * DQuat::from_rotation_z(-gamma);
    let screen = DQuat::from_axis_angle(DVec3::Z, -orient);
    device * CAMERA_OUT_BACK * screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::EulerRot;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn assert_quat_eq(a: DQuat, b: DQuat) {
        assert!(
            (a.x - b.x).abs() < 1e-9
                && (a.y - b.y).abs() < 1e-9
                && (a.z - b.z).abs() < 1e-9
                && (a.w - b.w).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn zero_angles_give_camera_out_back() {
        let q = orientation_quaternion(0.0, 0.0, 0.0, 0.0);
        assert_quat_eq(q, DQuat::from_xyzw(-0.5f64.sqrt(), 0.0, 0.0, 0.5f64.sqrt()));
    }

    #[test]
    fn alpha_quarter_turn_matches_closed_form() {
        // Ry(pi/2) = (0, s, 0, s); times (-s, 0, 0, s) = (-1/2, 1/2, 1/2, 1/2)
        let q = orientation_quaternion(FRAC_PI_2, 0.0, 0.0, 0.0);
        assert_quat_eq(q, DQuat::from_xyzw(-0.5, 0.5, 0.5, 0.5));
    }

    #[test]
    fn screen_rotation_is_applied_last() {
        let q = orientation_quaternion(0.0, 0.0, 0.0, FRAC_PI_2);
        let expected = CAMERA_OUT_BACK * DQuat::from_rotation_z(-FRAC_PI_2);
        assert_quat_eq(q, expected);
        // Applying the screen rotation first gives a different result.
        let reordered = DQuat::from_rotation_z(-FRAC_PI_2) * CAMERA_OUT_BACK;
        assert!(q.angle_between(reordered) > 1e-3);
    }

    #[test]
    fn beta_quarter_turn_cancels_camera_tilt() {
        // Rx(pi/2) * Rx(-pi/2) = identity
        let q = orientation_quaternion(0.0, FRAC_PI_2, 0.0, 0.0);
        assert_quat_eq(q, DQuat::IDENTITY);
        let flipped = orientation_quaternion(0.0, -FRAC_PI_2, 0.0, 0.0);
        assert!(flipped.angle_between(DQuat::IDENTITY) > 1.0);
    }

    #[test]
    fn alpha_applies_before_beta() {
        // Ry(pi/2) * Rx(pi/2) * Rx(-pi/2) = Ry(pi/2)
        let q = orientation_quaternion(FRAC_PI_2, FRAC_PI_2, 0.0, 0.0);
        let s = 0.5f64.sqrt();
        assert_quat_eq(q, DQuat::from_xyzw(0.0, s, 0.0, s));
    }

    #[test]
    fn all_angles_follow_yxz_euler() {
        let (a, b, g, o) = (0.7, -0.4, 0.25, FRAC_PI_2);
        let expected = DQuat::from_euler(EulerRot::YXZ, a, b, -g)
            * CAMERA_OUT_BACK
            * DQuat::from_rotation_z(-o);
        assert_quat_eq(orientation_quaternion(a, b, g, o), expected);
    }

    #[test]
    fn gamma_is_negated() {
        let q = orientation_quaternion(0.0, 0.0, 0.3, 0.0);
        let expected = DQuat::from_rotation_z(-0.3) * CAMERA_OUT_BACK;
        assert_quat_eq(q, expected);
    }

    #[test]
    fn result_is_unit_length() {
        let q = orientation_quaternion(1.1, -0.4, 0.7, PI);
        assert!((q.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn resolve_adds_offset_only_when_alpha_present() {
        let absent = OrientationSample::default();
        let a = AngleSet::resolve(&absent, 0, FRAC_PI_4, AbsencePolicy::Legacy);
        assert_eq!(a.alpha, 0.0);

        let present = OrientationSample {
            alpha: Some(10.0),
            ..Default::default()
        };
        let a = AngleSet::resolve(&present, 0, FRAC_PI_4, AbsencePolicy::Legacy);
        assert!((a.alpha - (10.0 * PI / 180.0 + FRAC_PI_4)).abs() < 1e-12);
    }

    #[test]
    fn resolve_screen_degrees() {
        let a = AngleSet::resolve(&OrientationSample::default(), -90, 0.0, AbsencePolicy::Legacy);
        assert!((a.orient + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn explicit_policy_offsets_zero_alpha() {
        let sample = OrientationSample::new(0.0, 0.0, 0.0);
        let legacy = AngleSet::resolve(&sample, 0, 0.5, AbsencePolicy::Legacy);
        let explicit = AngleSet::resolve(&sample, 0, 0.5, AbsencePolicy::Explicit);
        assert_eq!(legacy.alpha, 0.0);
        assert_eq!(explicit.alpha, 0.5);
    }
}
