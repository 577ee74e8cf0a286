//! Sensor-frame to base-frame pose composition.

use nalgebra::Vector3;

use laser_calib_core::{MountSide, MountTransform, PoseEstimate3D, TargetPose2D};

/// Map a sensor-frame candidate pose into the vehicle base frame.
///
/// For a front-mounted scanner the candidate's (x, y) add directly to the
/// mount translation. A rear-mounted scanner has its local axes mirrored
/// relative to the vehicle's forward axis, so (x, y) are negated first. The
/// target mounting pins z to `target_height` and admits no tilt: roll and
/// pitch are identically zero and the yaw passes through unchanged.
///
/// Pure and total: every well-formed candidate maps to a pose.
pub fn to_base_frame(
    candidate: &TargetPose2D,
    mount: &MountTransform,
    side: MountSide,
    target_height: f64,
) -> PoseEstimate3D {
    let (x, y) = match side {
        MountSide::Front => (candidate.x, candidate.y),
        MountSide::Rear => (-candidate.x, -candidate.y),
    };

    PoseEstimate3D::new(
        Vector3::new(
            x + mount.translation.x,
            y + mount.translation.y,
            target_height,
        ),
        Vector3::new(0.0, 0.0, candidate.yaw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mount() -> MountTransform {
        MountTransform::from_translation(1.0, 0.5, 0.3)
    }

    #[test]
    fn front_mount_adds_candidate_offsets() {
        let candidate = TargetPose2D::new(0.2, -0.1, 0.3);
        let pose = to_base_frame(&candidate, &mount(), MountSide::Front, 0.2);

        assert_relative_eq!(pose.position.x, 1.2);
        assert_relative_eq!(pose.position.y, 0.4);
        assert_relative_eq!(pose.position.z, 0.2);
        assert_relative_eq!(pose.yaw(), 0.3);
    }

    #[test]
    fn rear_mount_negates_candidate_offsets() {
        let candidate = TargetPose2D::new(0.2, -0.1, 0.3);
        let pose = to_base_frame(&candidate, &mount(), MountSide::Rear, 0.2);

        assert_relative_eq!(pose.position.x, 0.8);
        assert_relative_eq!(pose.position.y, 0.6);
        assert_relative_eq!(pose.position.z, 0.2);
        assert_relative_eq!(pose.yaw(), 0.3);
    }

    #[test]
    fn roll_and_pitch_are_always_zero() {
        let candidate = TargetPose2D::new(-0.7, 1.3, -2.1);
        for side in [MountSide::Front, MountSide::Rear] {
            let pose = to_base_frame(&candidate, &mount(), side, 0.2);
            assert_eq!(pose.rotation.x, 0.0);
            assert_eq!(pose.rotation.y, 0.0);
        }
    }

    #[test]
    fn mount_z_does_not_leak_into_the_pose() {
        // z comes from the target height, never from the sensor's height.
        let candidate = TargetPose2D::new(0.0, 0.0, 0.0);
        let pose = to_base_frame(&candidate, &mount(), MountSide::Front, 0.2);
        assert_relative_eq!(pose.position.z, 0.2);
    }
}
