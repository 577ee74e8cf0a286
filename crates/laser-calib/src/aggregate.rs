//! Scan batch aggregation.

use std::thread;
use std::time::Duration;

use laser_calib_core::{AveragedScan, CalibrationConfig, LaserScan, NO_RETURN};

use crate::traits::ScanSource;

/// Merges a batch of raw scans into one averaged scan.
///
/// Pulls a configured number of samples from the source with a short pause
/// between pulls so consecutive readings decorrelate. Each angular bin
/// averages only the samples with a range inside `(0, max_range]`; bins with
/// no valid contribution at all carry the [`NO_RETURN`] sentinel. A partially
/// or even fully invalid batch is not an error.
#[derive(Clone, Debug)]
pub struct ScanAggregator {
    scan_count: usize,
    max_range: f64,
    sample_pause: Duration,
}

impl ScanAggregator {
    pub fn new(scan_count: usize, max_range: f64, sample_pause: Duration) -> Self {
        Self {
            scan_count,
            max_range,
            sample_pause,
        }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.scan_count, config.max_range, config.sample_pause())
    }

    /// Pull one batch from `source` and reduce it to an averaged scan.
    ///
    /// Pulls that find the slot still empty contribute nothing; after the
    /// run driver's first-scan wait the slot is always populated.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn aggregate<S: ScanSource>(&self, source: &S) -> AveragedScan {
        let mut samples = Vec::with_capacity(self.scan_count);
        for pull in 0..self.scan_count {
            if let Some(scan) = source.latest_scan() {
                samples.push(scan);
            }
            if pull + 1 < self.scan_count && !self.sample_pause.is_zero() {
                thread::sleep(self.sample_pause);
            }
        }
        self.average(&samples)
    }

    fn average(&self, samples: &[LaserScan]) -> AveragedScan {
        // Ragged batches can happen with misbehaving drivers; size the bins
        // to the longest sample so no reading is dropped.
        let bins = samples.iter().map(LaserScan::len).max().unwrap_or(0);
        let (angle_min, angle_increment) = samples
            .first()
            .map(|s| (s.angle_min, s.angle_increment))
            .unwrap_or((0.0, 0.0));

        let mut sums = vec![0.0f64; bins];
        let mut counts = vec![0usize; bins];
        for scan in samples {
            for (bin, &range) in scan.ranges.iter().enumerate() {
                if range > NO_RETURN && range <= self.max_range {
                    sums[bin] += range;
                    counts[bin] += 1;
                }
            }
        }

        let ranges = sums
            .iter()
            .zip(&counts)
            .map(|(&sum, &n)| if n > 0 { sum / n as f64 } else { NO_RETURN })
            .collect();

        AveragedScan {
            angle_min,
            angle_increment,
            ranges,
        }
    }
}
