//! Collaborator contracts.
//!
//! The estimation loop reaches its surroundings only through these traits:
//! the sensor stream, the static transform lookup, the pattern matcher and
//! the checkerboard projection are all injected, so tests (and the simulated
//! rig in the CLI) substitute deterministic implementations.

use std::time::Duration;

use nalgebra::Point3;

use laser_calib_core::{
    AveragedScan, CalibrationError, CylinderPattern, LaserScan, MountSide, MountTransform,
    PoseEstimate3D, TargetPose2D,
};

/// Streaming sensor subscription, reduced to a single-slot "latest value".
///
/// Implementations retain only the most recent scan (last-write-wins, no
/// queueing, no backpressure); the aggregator polls it.
pub trait ScanSource {
    /// Most recent scan, if any has arrived yet.
    fn latest_scan(&self) -> Option<LaserScan>;
}

/// One-shot lookup of the static scanner mounting transform.
///
/// Which named frames correspond to a [`MountSide`] is the implementation's
/// concern; the loop only passes the side.
pub trait MountTransformLookup {
    /// Resolve the sensor-in-base transform, waiting at most `timeout`.
    fn lookup(
        &self,
        side: MountSide,
        timeout: Duration,
    ) -> Result<MountTransform, CalibrationError>;
}

/// Opaque geometric matcher locating the cylinder target in an averaged scan.
///
/// Called once per loop iteration and expected to be side-effect free.
/// `None` means the target was not found in this scan, which is ordinary and
/// feeds the fail counter; a degenerate scan with no valid bins must also
/// yield `None` rather than an error.
pub trait PatternDetector {
    fn detect(&self, scan: &AveragedScan, pattern: &CylinderPattern) -> Option<TargetPose2D>;
}

/// Projection of a final target pose to expected target-surface points.
pub trait CheckerboardProjector {
    /// Pure geometric function, applied once to the final averaged pose.
    fn project(&self, pose: &PoseEstimate3D) -> Vec<Point3<f64>>;
}
