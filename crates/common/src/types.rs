use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis sequence used when a rotation is expressed as Euler angles.
///
/// The sequence is intrinsic: `Yxz` rotates about Y, then the rotated X,
/// then the twice-rotated Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RotationOrder {
    #[default]
    Xyz,
    Yxz,
    Zxy,
    Zyx,
    Yzx,
    Xzy,
}

impl RotationOrder {
    pub const ALL: [RotationOrder; 6] = [
        Self::Xyz,
        Self::Yxz,
        Self::Zxy,
        Self::Zyx,
        Self::Yzx,
        Self::Xzy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xyz => "XYZ",
            Self::Yxz => "YXZ",
            Self::Zxy => "ZXY",
            Self::Zyx => "ZYX",
            Self::Yzx => "YZX",
            Self::Xzy => "XZY",
        }
    }

    /// The matching glam Euler convention.
    pub fn euler_rot(self) -> EulerRot {
        match self {
            Self::Xyz => EulerRot::XYZ,
            Self::Yxz => EulerRot::YXZ,
            Self::Zxy => EulerRot::ZXY,
            Self::Zyx => EulerRot::ZYX,
            Self::Yzx => EulerRot::YZX,
            Self::Xzy => EulerRot::XZY,
        }
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown rotation order {0:?}")]
pub struct ParseRotationOrderError(pub String);

impl FromStr for RotationOrder {
    type Err = ParseRotationOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRotationOrderError(s.to_string()))
    }
}

/// Anything whose rotation can be driven by an orientation controller.
///
/// The controller pins the rotation order once and then overwrites the
/// quaternion on every update.
pub trait Orientable {
    fn rotation_order(&self) -> RotationOrder;
    fn set_rotation_order(&mut self, order: RotationOrder);
    fn quaternion(&self) -> DQuat;
    fn set_quaternion(&mut self, rotation: DQuat);
}

/// A scene object with a position and an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedObject {
    pub position: DVec3,
    pub rotation: DQuat,
    pub order: RotationOrder,
}

impl Default for OrientedObject {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            order: RotationOrder::default(),
        }
    }
}

impl OrientedObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation decomposed into Euler angles (radians) for the current order.
    pub fn euler(&self) -> (f64, f64, f64) {
        self.rotation.to_euler(self.order.euler_rot())
    }

    /// Direction the object looks along (-Z in its local frame).
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }
}

impl Orientable for OrientedObject {
    fn rotation_order(&self) -> RotationOrder {
        self.order
    }

    fn set_rotation_order(&mut self, order: RotationOrder) {
        self.order = order;
    }

    fn quaternion(&self) -> DQuat {
        self.rotation
    }

    fn set_quaternion(&mut self, rotation: DQuat) {
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_object_is_identity() {
        let o = OrientedObject::default();
        assert_eq!(o.position, DVec3::ZERO);
        assert_eq!(o.rotation, DQuat::IDENTITY);
        assert_eq!(o.order, RotationOrder::Xyz);
        assert_eq!(o.forward(), DVec3::NEG_Z);
    }

    #[test]
    fn rotation_order_parses_case_insensitively() {
        assert_eq!("YXZ".parse::<RotationOrder>().unwrap(), RotationOrder::Yxz);
        assert_eq!("zyx".parse::<RotationOrder>().unwrap(), RotationOrder::Zyx);
        assert!("XYY".parse::<RotationOrder>().is_err());
    }

    #[test]
    fn rotation_order_display_matches_parse() {
        for order in RotationOrder::ALL {
            assert_eq!(order.to_string().parse::<RotationOrder>().unwrap(), order);
        }
    }

    #[test]
    fn euler_uses_current_order() {
        let mut o = OrientedObject::new();
        o.set_rotation_order(RotationOrder::Yxz);
        o.set_quaternion(DQuat::from_euler(EulerRot::YXZ, 0.3, -0.2, 0.1));
        let (a, b, c) = o.euler();
        assert!((a - 0.3).abs() < 1e-9);
        assert!((b + 0.2).abs() < 1e-9);
        assert!((c - 0.1).abs() < 1e-9);
    }
}
