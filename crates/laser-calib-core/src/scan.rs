//! Polar range-scan types.

use serde::{Deserialize, Serialize};

/// Sentinel range marking an angular bin with no usable return.
pub const NO_RETURN: f64 = 0.0;

/// One raw reading from a 2D range scanner, in polar coordinates.
///
/// Ranges are in meters, one per angular bin starting at `angle_min` and
/// advancing by `angle_increment`. A range equal to [`NO_RETURN`] means the
/// scanner saw nothing in that bin. A scan is immutable once received from
/// the driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Angle of the first bin, radians.
    pub angle_min: f64,
    /// Angular spacing between consecutive bins, radians.
    pub angle_increment: f64,
    /// Range measurements, meters.
    pub ranges: Vec<f64>,
}

impl LaserScan {
    pub fn new(angle_min: f64, angle_increment: f64, ranges: Vec<f64>) -> Self {
        Self {
            angle_min,
            angle_increment,
            ranges,
        }
    }

    /// Number of angular bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Angle of the bin at `index`, radians.
    #[inline]
    pub fn angle_of(&self, index: usize) -> f64 {
        self.angle_min + self.angle_increment * index as f64
    }
}

/// Mean of a batch of raw scans, one value per angular bin.
///
/// Bins that received no valid contribution carry the [`NO_RETURN`] sentinel
/// and must be skipped by consumers. A fully sentinel scan is representable;
/// pattern detectors are expected to report "not found" on it rather than
/// fail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AveragedScan {
    /// Angle of the first bin, radians.
    pub angle_min: f64,
    /// Angular spacing between consecutive bins, radians.
    pub angle_increment: f64,
    /// Per-bin mean range, meters; [`NO_RETURN`] marks excluded bins.
    pub ranges: Vec<f64>,
}

impl AveragedScan {
    /// Number of angular bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Angle of the bin at `index`, radians.
    #[inline]
    pub fn angle_of(&self, index: usize) -> f64 {
        self.angle_min + self.angle_increment * index as f64
    }

    /// Number of bins holding a usable mean.
    pub fn valid_bins(&self) -> usize {
        self.ranges.iter().filter(|&&r| r > NO_RETURN).count()
    }

    /// True when not a single bin received a valid contribution.
    pub fn is_degenerate(&self) -> bool {
        self.valid_bins() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn angle_of_advances_by_increment() {
        let scan = LaserScan::new(-0.5, TAU / 8.0, vec![1.0; 8]);
        assert_eq!(scan.angle_of(0), -0.5);
        assert!((scan.angle_of(4) - (-0.5 + TAU / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn valid_bins_skips_sentinel() {
        let avg = AveragedScan {
            angle_min: 0.0,
            angle_increment: 0.1,
            ranges: vec![1.2, NO_RETURN, 0.8, NO_RETURN],
        };
        assert_eq!(avg.valid_bins(), 2);
        assert!(!avg.is_degenerate());
    }

    #[test]
    fn all_sentinel_scan_is_degenerate() {
        let avg = AveragedScan {
            angle_min: 0.0,
            angle_increment: 0.1,
            ranges: vec![NO_RETURN; 5],
        };
        assert!(avg.is_degenerate());
    }
}
