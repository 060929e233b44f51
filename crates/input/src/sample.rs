use serde::{Deserialize, Serialize};

/// One reading from the device orientation sensor, in degrees.
///
/// Any axis may be missing; the platform reports what it has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Rotation about the device Z axis, `[0, 360)`.
    #[serde(default)]
    pub alpha: Option<f64>,
    /// Rotation about the device X axis, `[-180, 180)`.
    #[serde(default)]
    pub beta: Option<f64>,
    /// Rotation about the device Y axis, `[-90, 90)`.
    #[serde(default)]
    pub gamma: Option<f64>,
}

impl OrientationSample {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }
}

/// What counts as a missing angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsencePolicy {
    /// Missing, zero and NaN readings are all ignored.
    #[default]
    Legacy,
    /// Only missing readings are ignored; 0° is a real angle.
    Explicit,
}

impl AbsencePolicy {
    pub fn is_present(self, value: Option<f64>) -> bool {
        match (self, value) {
            (_, None) => false,
            (Self::Legacy, Some(v)) => v != 0.0 && !v.is_nan(),
            (Self::Explicit, Some(v)) => !v.is_nan(),
        }
    }
}

/// Degrees to radians for a present angle, `None` otherwise.
pub fn resolve_angle(value: Option<f64>, policy: AbsencePolicy) -> Option<f64> {
    value
        .filter(|_| policy.is_present(value))
        .map(f64::to_radians)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_treats_zero_as_absent() {
        assert_eq!(resolve_angle(Some(0.0), AbsencePolicy::Legacy), None);
        assert_eq!(resolve_angle(None, AbsencePolicy::Legacy), None);
        assert_eq!(resolve_angle(Some(f64::NAN), AbsencePolicy::Legacy), None);
    }

    #[test]
    fn explicit_keeps_zero() {
        assert_eq!(resolve_angle(Some(0.0), AbsencePolicy::Explicit), Some(0.0));
        assert_eq!(resolve_angle(None, AbsencePolicy::Explicit), None);
        assert_eq!(resolve_angle(Some(f64::NAN), AbsencePolicy::Explicit), None);
    }

    #[test]
    fn present_angle_is_converted_to_radians() {
        let r = resolve_angle(Some(180.0), AbsencePolicy::Legacy).unwrap();
        assert!((r - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn sample_deserializes_with_missing_axes() {
        let s: OrientationSample = serde_json::from_str(r#"{"alpha": 12.5}"#).unwrap();
        assert_eq!(s.alpha, Some(12.5));
        assert_eq!(s.beta, None);
        assert_eq!(s.gamma, None);
    }
}
