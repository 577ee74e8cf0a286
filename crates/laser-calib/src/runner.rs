//! Run driver: startup checks, the detection loop, and the final report.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use nalgebra::Point3;
use serde::Serialize;

use laser_calib_core::{CalibrationConfig, CalibrationError, PoseEstimate3D};

use crate::aggregate::ScanAggregator;
use crate::estimator::{RunOutcome, RunningEstimator};
use crate::traits::{CheckerboardProjector, MountTransformLookup, PatternDetector, ScanSource};
use crate::transform::to_base_frame;

const FIRST_SCAN_POLL: Duration = Duration::from_millis(10);

/// Everything a presentation layer needs to report one run.
#[derive(Clone, Debug, Serialize)]
pub struct CalibrationReport {
    pub outcome: RunOutcome,
    pub success_count: u32,
    pub fail_count: u32,
    pub iterations: u32,
    /// Accepted base-frame poses in arrival order.
    pub accepted: Vec<PoseEstimate3D>,
    /// Final running mean over the accepted poses.
    pub mean: PoseEstimate3D,
    /// Final running signed-deviation average (not a standard deviation).
    pub deviation: PoseEstimate3D,
    /// Expected target-surface reference points projected from the mean.
    pub checkerboard_points: Vec<Point3<f64>>,
}

/// Drive one full calibration run.
///
/// Startup resolves the mount transform and waits (bounded) for the first
/// scan; either failing aborts the run with an error and no partial result.
/// The loop then alternates scan aggregation, pattern detection and pose
/// accumulation until a counter threshold terminates it. The checkerboard
/// projection runs exactly once on the final mean, for either outcome.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip_all, fields(mount_side = %config.mount_side))
)]
pub fn run_calibration<S, L, D, P>(
    config: &CalibrationConfig,
    source: &S,
    lookup: &L,
    detector: &D,
    projector: &P,
) -> Result<CalibrationReport, CalibrationError>
where
    S: ScanSource,
    L: MountTransformLookup,
    D: PatternDetector,
    P: CheckerboardProjector,
{
    config.validate()?;

    let mount = lookup.lookup(config.mount_side, config.transform_timeout())?;
    debug!(
        "mount transform resolved: sensor at ({:.3}, {:.3}, {:.3})",
        mount.translation.x, mount.translation.y, mount.translation.z
    );

    wait_for_first_scan(source, config.first_scan_timeout())?;

    let aggregator = ScanAggregator::from_config(config);
    let mut estimator = RunningEstimator::from_config(config);

    while !estimator.is_terminal() {
        let scan = aggregator.aggregate(source);
        debug!(
            "averaged scan ready ({} of {} bins valid)",
            scan.valid_bins(),
            scan.len()
        );

        match detector.detect(&scan, &config.pattern) {
            Some(candidate) => {
                let pose = to_base_frame(&candidate, &mount, config.mount_side, config.pattern.height);
                estimator.record_success(pose);
                info!(
                    "target pose accepted ({}/{})",
                    estimator.success_count(),
                    config.success_threshold
                );
            }
            None => {
                estimator.record_miss();
                info!(
                    "target not found ({}/{})",
                    estimator.fail_count(),
                    config.fail_threshold()
                );
            }
        }
    }

    let outcome = match estimator.outcome() {
        Some(outcome) => outcome,
        // The loop guard guarantees a terminal state.
        None => RunOutcome::Failed,
    };

    let mean = estimator.accumulator().mean();
    let deviation = estimator.accumulator().deviation();
    let checkerboard_points = projector.project(&mean);

    match outcome {
        RunOutcome::Succeeded => info!(
            "calibration target located after {} iterations",
            estimator.iterations()
        ),
        RunOutcome::Failed => warn!(
            "giving up after {} missed detections",
            estimator.fail_count()
        ),
    }

    Ok(CalibrationReport {
        outcome,
        success_count: estimator.success_count(),
        fail_count: estimator.fail_count(),
        iterations: estimator.iterations(),
        accepted: estimator.accepted().to_vec(),
        mean,
        deviation,
        checkerboard_points,
    })
}

/// Block until the source has delivered its first scan, up to `timeout`.
fn wait_for_first_scan<S: ScanSource>(
    source: &S,
    timeout: Duration,
) -> Result<(), CalibrationError> {
    let started = Instant::now();
    loop {
        if source.latest_scan().is_some() {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(CalibrationError::FirstScanTimeout {
                waited_ms: timeout.as_millis() as u64,
            });
        }
        thread::sleep(FIRST_SCAN_POLL.min(timeout));
    }
}
