//! Pose estimation of a three-cylinder calibration target from 2D laser
//! scans.
//!
//! One calibration session drives a single loop: pull a batch of raw scans
//! and reduce them to an averaged scan, hand that scan to a
//! [`PatternDetector`], map successful candidates into the vehicle base
//! frame, fold them into running statistics, and stop when either the
//! success or the fail counter reaches its threshold. Sensor streaming,
//! transform lookup, pattern matching and the checkerboard projection are
//! all collaborator traits, so the loop runs unchanged against real drivers,
//! the simulated rig in `laser-calib-cli`, or test fakes.
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use laser_calib::core::{
//!     AveragedScan, CalibrationConfig, CalibrationError, CylinderPattern, LaserScan, MountSide,
//!     MountTransform, TargetPose2D,
//! };
//! use laser_calib::{
//!     run_calibration, LatestScanSlot, MountTransformLookup, PatternDetector, PlanarCheckerboard,
//! };
//!
//! struct FixedMount;
//!
//! impl MountTransformLookup for FixedMount {
//!     fn lookup(
//!         &self,
//!         _side: MountSide,
//!         _timeout: Duration,
//!     ) -> Result<MountTransform, CalibrationError> {
//!         Ok(MountTransform::from_translation(0.4, 0.0, 0.25))
//!     }
//! }
//!
//! struct AlwaysThere;
//!
//! impl PatternDetector for AlwaysThere {
//!     fn detect(&self, scan: &AveragedScan, _pattern: &CylinderPattern) -> Option<TargetPose2D> {
//!         (!scan.is_degenerate()).then(|| TargetPose2D::new(1.0, 0.2, 0.1))
//!     }
//! }
//!
//! fn main() -> Result<(), CalibrationError> {
//!     let config = CalibrationConfig::new(MountSide::Front);
//!     let slot = LatestScanSlot::new();
//!     slot.publish(LaserScan::new(0.0, 0.01, vec![1.0; 628]));
//!
//!     let report = run_calibration(
//!         &config,
//!         &slot,
//!         &FixedMount,
//!         &AlwaysThere,
//!         &PlanarCheckerboard::default(),
//!     )?;
//!     println!("outcome: {:?}", report.outcome);
//!     Ok(())
//! }
//! ```

mod aggregate;
mod checkerboard;
mod estimator;
mod runner;
mod slot;
mod traits;
mod transform;

pub use aggregate::ScanAggregator;
pub use checkerboard::PlanarCheckerboard;
pub use estimator::{EstimatorState, RunOutcome, RunningAccumulator, RunningEstimator};
pub use runner::{run_calibration, CalibrationReport};
pub use slot::LatestScanSlot;
pub use traits::{CheckerboardProjector, MountTransformLookup, PatternDetector, ScanSource};
pub use transform::to_base_frame;

pub use laser_calib_core as core;
