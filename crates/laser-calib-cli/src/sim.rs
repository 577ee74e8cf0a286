//! Deterministic simulated rig.
//!
//! Stands in for the sensor driver, the transform lookup and the pattern
//! matcher so the estimation loop can run end-to-end on a desk. Everything
//! is seeded, so a given seed replays the same session.

use std::f64::consts::TAU;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use laser_calib::core::{
    AveragedScan, CalibrationError, CylinderPattern, LaserScan, MountSide, MountTransform,
    TargetPose2D,
};
use laser_calib::{MountTransformLookup, PatternDetector, ScanSource};

/// Scanner producing a noisy ring of returns with occasional dropouts.
pub struct SimulatedScanner {
    rng: Mutex<StdRng>,
    bins: usize,
    base_range: f64,
    noise: f64,
}

impl SimulatedScanner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            bins: 360,
            base_range: 1.8,
            noise: 0.02,
        }
    }
}

impl ScanSource for SimulatedScanner {
    fn latest_scan(&self) -> Option<LaserScan> {
        let mut rng = self.rng.lock();
        let ranges = (0..self.bins)
            .map(|_| {
                if rng.gen_bool(0.05) {
                    // Dropped return.
                    0.0
                } else {
                    self.base_range + rng.gen_range(-self.noise..self.noise)
                }
            })
            .collect();
        Some(LaserScan::new(0.0, TAU / self.bins as f64, ranges))
    }
}

/// Matcher reporting a configured true pose with noise and misses.
pub struct SimulatedDetector {
    rng: Mutex<StdRng>,
    true_pose: TargetPose2D,
    position_noise: f64,
    yaw_noise: f64,
    miss_rate: f64,
}

impl SimulatedDetector {
    pub fn new(seed: u64, true_pose: TargetPose2D, miss_rate: f64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            true_pose,
            position_noise: 0.005,
            yaw_noise: 0.01,
            miss_rate: miss_rate.clamp(0.0, 1.0),
        }
    }
}

impl PatternDetector for SimulatedDetector {
    fn detect(&self, scan: &AveragedScan, _pattern: &CylinderPattern) -> Option<TargetPose2D> {
        if scan.is_degenerate() {
            return None;
        }
        let mut rng = self.rng.lock();
        if self.miss_rate > 0.0 && rng.gen_bool(self.miss_rate) {
            return None;
        }
        Some(TargetPose2D::new(
            self.true_pose.x + rng.gen_range(-self.position_noise..self.position_noise),
            self.true_pose.y + rng.gen_range(-self.position_noise..self.position_noise),
            self.true_pose.yaw + rng.gen_range(-self.yaw_noise..self.yaw_noise),
        ))
    }
}

/// Resolves the scanner mounting the way a TF tree would.
pub struct FixedMountLookup;

impl MountTransformLookup for FixedMountLookup {
    fn lookup(
        &self,
        side: MountSide,
        _timeout: Duration,
    ) -> Result<MountTransform, CalibrationError> {
        Ok(match side {
            MountSide::Front => MountTransform::from_translation(0.4, 0.0, 0.25),
            MountSide::Rear => MountTransform::from_translation(-0.4, 0.0, 0.25),
        })
    }
}
