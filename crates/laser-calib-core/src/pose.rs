//! Pose types in the sensor and base frames.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Candidate target pose in the sensor's 2D frame.
///
/// Produced by a pattern detector from one averaged scan; `None` on the
/// detector side means the target was not found in that scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetPose2D {
    /// Position along the sensor x axis, meters.
    pub x: f64,
    /// Position along the sensor y axis, meters.
    pub y: f64,
    /// Orientation about the sensor z axis, radians.
    pub yaw: f64,
}

impl TargetPose2D {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }
}

/// Target pose in the vehicle base frame.
///
/// The target mounting constrains it to a known height with no tilt, so
/// roll and pitch are always zero; only x, y and yaw carry information.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate3D {
    /// Position in meters.
    pub position: Vector3<f64>,
    /// Roll, pitch, yaw in radians.
    pub rotation: Vector3<f64>,
}

impl PoseEstimate3D {
    pub fn new(position: Vector3<f64>, rotation: Vector3<f64>) -> Self {
        Self { position, rotation }
    }

    /// All-zero pose, the accumulator's starting point.
    pub fn zero() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
        }
    }

    /// Flatten into `[x, y, z, roll, pitch, yaw]`.
    #[inline]
    pub fn components(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        ]
    }

    /// Rebuild from `[x, y, z, roll, pitch, yaw]`.
    #[inline]
    pub fn from_components(c: [f64; 6]) -> Self {
        Self {
            position: Vector3::new(c[0], c[1], c[2]),
            rotation: Vector3::new(c[3], c[4], c[5]),
        }
    }

    /// Yaw component, radians.
    #[inline]
    pub fn yaw(&self) -> f64 {
        self.rotation.z
    }
}

/// Static pose of the sensor frame within the base frame.
///
/// Acquired once per run from the transform-lookup collaborator. Only the
/// planar translation enters the pose composition; the full rotation is kept
/// for completeness of the lookup contract.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountTransform {
    /// Sensor origin in the base frame, meters.
    pub translation: Vector3<f64>,
    /// Sensor orientation in the base frame.
    pub rotation: UnitQuaternion<f64>,
}

impl MountTransform {
    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Pure-translation mount with identity rotation.
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            rotation: UnitQuaternion::identity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_round_trip() {
        let pose = PoseEstimate3D::new(
            Vector3::new(1.0, -2.0, 0.3),
            Vector3::new(0.0, 0.0, 0.75),
        );
        let rebuilt = PoseEstimate3D::from_components(pose.components());
        assert_eq!(pose, rebuilt);
        assert_eq!(rebuilt.yaw(), 0.75);
    }

    #[test]
    fn zero_pose_has_all_zero_components() {
        assert_eq!(PoseEstimate3D::zero().components(), [0.0; 6]);
    }
}
