use glam::{DQuat, DVec3};
use gyrocam_common::{Orientable, RotationOrder};
use serde::Serialize;

/// Orientation inspector for developer tooling.
///
/// Provides read-only summaries of anything [`Orientable`] for debugging
/// and trace replay output.
pub struct OrientationInspector;

impl OrientationInspector {
    /// Produce a summary of an object's current orientation.
    pub fn summary<T: Orientable>(object: &T) -> OrientationSummary {
        Self::summarize(object.quaternion(), object.rotation_order())
    }

    pub fn summarize(rotation: DQuat, order: RotationOrder) -> OrientationSummary {
        let (a, b, c) = rotation.to_euler(order.euler_rot());
        let forward = rotation * DVec3::NEG_Z;
        let up = rotation * DVec3::Y;
        OrientationSummary {
            order,
            quaternion: [rotation.x, rotation.y, rotation.z, rotation.w],
            euler_degrees: [a.to_degrees(), b.to_degrees(), c.to_degrees()],
            forward: forward.to_array(),
            up: up.to_array(),
        }
    }
}

/// Snapshot of an orientation in several representations.
///
/// `euler_degrees` follows `order`: for YXZ it is `[y, x, z]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrientationSummary {
    pub order: RotationOrder,
    pub quaternion: [f64; 4],
    pub euler_degrees: [f64; 3],
    pub forward: [f64; 3],
    pub up: [f64; 3],
}

impl std::fmt::Display for OrientationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z, w] = self.quaternion;
        let [e0, e1, e2] = self.euler_degrees;
        write!(
            f,
            "quat=({x:.4}, {y:.4}, {z:.4}, {w:.4}) euler[{}]=({e0:.2}, {e1:.2}, {e2:.2}) fwd=({:.3}, {:.3}, {:.3})",
            self.order, self.forward[0], self.forward[1], self.forward[2],
        )
    }
}
