//! Running pose estimator: counters, incremental statistics and the
//! terminal decision of the detection loop.

use serde::{Deserialize, Serialize};

use laser_calib_core::{CalibrationConfig, PoseEstimate3D};

/// Incremental mean and deviation over accepted poses.
///
/// Both statistics update component-wise (x, y, z, roll, pitch, yaw) with n
/// the count *after* the new sample:
///
/// ```text
/// mean_n      = (mean_{n-1} * (n-1) + value_n) / n
/// deviation_n = (deviation_{n-1} * (n-1) + (value_n - mean_{n-1})) / n
/// ```
///
/// The deviation line is the running average of *signed* deviations from the
/// preceding mean. It is not a variance or standard deviation and tends
/// toward zero; downstream calibration consumers read this exact number, so
/// the recurrence must not be swapped for a dispersion estimator.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunningAccumulator {
    count: u32,
    mean: [f64; 6],
    deviation: [f64; 6],
}

impl RunningAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one accepted pose into the statistics.
    pub fn accumulate(&mut self, sample: &PoseEstimate3D) {
        let value = sample.components();
        let prev_mean = self.mean;
        let prev = self.count as f64;
        let n = (self.count + 1) as f64;

        for i in 0..6 {
            self.mean[i] = (prev_mean[i] * prev + value[i]) / n;
            self.deviation[i] = (self.deviation[i] * prev + (value[i] - prev_mean[i])) / n;
        }
        self.count += 1;
    }

    /// Number of accumulated samples.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Current running mean.
    pub fn mean(&self) -> PoseEstimate3D {
        PoseEstimate3D::from_components(self.mean)
    }

    /// Current running signed-deviation average.
    pub fn deviation(&self) -> PoseEstimate3D {
        PoseEstimate3D::from_components(self.deviation)
    }
}

/// Terminal verdict of one calibration run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Succeeded,
    Failed,
}

/// State of the detection loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EstimatorState {
    Iterating,
    Succeeded,
    Failed,
}

/// The loop's state machine.
///
/// Feeds on per-iteration detection results: an accepted base-frame pose
/// bumps the success counter and the statistics, a miss bumps the fail
/// counter. Reaching the success threshold wins, reaching the fail threshold
/// (11x the success threshold by convention) gives up; both are terminal, so
/// a run takes at most `success_threshold + fail_threshold - 1` iterations.
#[derive(Clone, Debug)]
pub struct RunningEstimator {
    success_threshold: u32,
    fail_threshold: u32,
    success_count: u32,
    fail_count: u32,
    accepted: Vec<PoseEstimate3D>,
    accumulator: RunningAccumulator,
    state: EstimatorState,
}

impl RunningEstimator {
    pub fn new(success_threshold: u32, fail_threshold: u32) -> Self {
        Self {
            success_threshold,
            fail_threshold,
            success_count: 0,
            fail_count: 0,
            accepted: Vec::new(),
            accumulator: RunningAccumulator::new(),
            state: EstimatorState::Iterating,
        }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.success_threshold, config.fail_threshold())
    }

    /// Record an accepted base-frame pose; returns the state after the
    /// transition. Must not be called once terminal.
    pub fn record_success(&mut self, pose: PoseEstimate3D) -> EstimatorState {
        debug_assert_eq!(self.state, EstimatorState::Iterating);
        self.accepted.push(pose);
        self.accumulator.accumulate(&pose);
        self.success_count += 1;
        if self.success_count == self.success_threshold {
            self.state = EstimatorState::Succeeded;
        }
        self.state
    }

    /// Record a missed detection; returns the state after the transition.
    /// Must not be called once terminal.
    pub fn record_miss(&mut self) -> EstimatorState {
        debug_assert_eq!(self.state, EstimatorState::Iterating);
        self.fail_count += 1;
        if self.fail_count == self.fail_threshold {
            self.state = EstimatorState::Failed;
        }
        self.state
    }

    pub fn state(&self) -> EstimatorState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state != EstimatorState::Iterating
    }

    /// Terminal verdict, once reached.
    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.state {
            EstimatorState::Iterating => None,
            EstimatorState::Succeeded => Some(RunOutcome::Succeeded),
            EstimatorState::Failed => Some(RunOutcome::Failed),
        }
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    /// Iterations consumed so far.
    pub fn iterations(&self) -> u32 {
        self.success_count + self.fail_count
    }

    /// Accepted poses in arrival order.
    pub fn accepted(&self) -> &[PoseEstimate3D] {
        &self.accepted
    }

    pub fn accumulator(&self) -> &RunningAccumulator {
        &self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn pose_x(x: f64) -> PoseEstimate3D {
        PoseEstimate3D::new(Vector3::new(x, 0.0, 0.0), Vector3::zeros())
    }

    #[test]
    fn mean_recurrence_matches_batch_mean() {
        let mut acc = RunningAccumulator::new();
        for v in [2.0, 4.0, 6.0] {
            acc.accumulate(&pose_x(v));
        }
        assert_eq!(acc.count(), 3);
        assert_relative_eq!(acc.mean().position.x, 4.0);
    }

    #[test]
    fn deviation_recurrence_matches_hand_computed_sequence() {
        let mut acc = RunningAccumulator::new();

        acc.accumulate(&pose_x(1.0));
        assert_relative_eq!(acc.deviation().position.x, 0.0);

        // (0*1 + (3 - 1)) / 2
        acc.accumulate(&pose_x(3.0));
        assert_relative_eq!(acc.deviation().position.x, 1.0);

        // (1.0*2 + (2 - 2.0)) / 3
        acc.accumulate(&pose_x(2.0));
        assert_relative_eq!(acc.deviation().position.x, 2.0 / 3.0);
    }

    #[test]
    fn statistics_apply_to_every_component() {
        let mut acc = RunningAccumulator::new();
        acc.accumulate(&PoseEstimate3D::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 0.0, 0.4),
        ));
        acc.accumulate(&PoseEstimate3D::new(
            Vector3::new(3.0, 4.0, 3.0),
            Vector3::new(0.0, 0.0, 0.8),
        ));

        let mean = acc.mean();
        assert_relative_eq!(mean.position.x, 2.0);
        assert_relative_eq!(mean.position.y, 3.0);
        assert_relative_eq!(mean.position.z, 3.0);
        assert_relative_eq!(mean.yaw(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn succeeds_when_success_threshold_is_reached() {
        let mut est = RunningEstimator::new(2, 22);
        assert_eq!(est.record_success(pose_x(1.0)), EstimatorState::Iterating);
        assert_eq!(est.record_success(pose_x(2.0)), EstimatorState::Succeeded);
        assert_eq!(est.outcome(), Some(RunOutcome::Succeeded));
        assert_eq!(est.accepted().len(), 2);
    }

    #[test]
    fn fails_when_fail_threshold_is_reached() {
        let mut est = RunningEstimator::new(3, 4);
        for _ in 0..3 {
            assert_eq!(est.record_miss(), EstimatorState::Iterating);
        }
        assert_eq!(est.record_miss(), EstimatorState::Failed);
        assert_eq!(est.outcome(), Some(RunOutcome::Failed));
        assert!(est.accepted().is_empty());
    }

    #[test]
    fn misses_alone_never_succeed_and_successes_alone_never_fail() {
        let mut est = RunningEstimator::new(2, 3);
        est.record_miss();
        est.record_miss();
        est.record_success(pose_x(0.0));
        assert!(!est.is_terminal());
        // One more success wins even with the fail counter at F - 1.
        assert_eq!(est.record_success(pose_x(0.0)), EstimatorState::Succeeded);
    }

    #[test]
    fn every_outcome_sequence_terminates_within_the_bound() {
        let (s, f) = (2u32, 3u32);
        let bound = s + f - 1;

        // Enumerate every success/miss sequence of maximal length.
        for mask in 0u32..(1 << bound) {
            let mut est = RunningEstimator::new(s, f);
            let mut iterations = 0;
            for step in 0..bound {
                if mask & (1 << step) != 0 {
                    est.record_success(pose_x(step as f64));
                } else {
                    est.record_miss();
                }
                iterations += 1;
                if est.is_terminal() {
                    break;
                }
            }
            assert!(est.is_terminal(), "mask {mask:b} did not terminate");
            assert!(iterations <= bound);
            // Exactly one terminal state.
            match est.state() {
                EstimatorState::Succeeded => assert_eq!(est.success_count(), s),
                EstimatorState::Failed => assert_eq!(est.fail_count(), f),
                EstimatorState::Iterating => unreachable!(),
            }
        }
    }

    #[test]
    fn iterations_counts_both_kinds() {
        let mut est = RunningEstimator::new(5, 5);
        est.record_success(pose_x(1.0));
        est.record_miss();
        est.record_miss();
        assert_eq!(est.iterations(), 3);
    }
}
