//! Geometry of the three-cylinder calibration target.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Errors for an ill-formed cylinder target description.
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    #[error("cylinder radii must be positive (got {0:?})")]
    NonPositiveRadius([f64; 3]),
    #[error("cylinder radii must be strictly ascending (got {0:?})")]
    RadiiNotAscending([f64; 3]),
    #[error("cylinder height must be positive (got {0})")]
    NonPositiveHeight(f64),
    #[error("cylinder center distance must be positive (got {0})")]
    NonPositiveCenterDistance(f64),
}

/// Static description of the three-cylinder calibration target.
///
/// The shipped target happens to use radii in a 1:2:3 ratio; that is a
/// property of that particular target, not of this type. The three radii are
/// independent configured values and only their ordering is enforced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CylinderPattern {
    /// Cylinder radii in meters, smallest first.
    pub radii: [f64; 3],
    /// Angular offset of each cylinder from the target's own center, radians
    /// (same order as `radii`).
    pub angles: [f64; 3],
    /// Cylinder height above the ground plane, meters.
    pub height: f64,
    /// Distance between neighbouring cylinder centers, meters.
    pub center_distance: f64,
}

impl Default for CylinderPattern {
    fn default() -> Self {
        Self {
            radii: [0.03, 0.06, 0.09],
            angles: [7.0 * PI / 6.0, 11.0 * PI / 6.0, PI / 2.0],
            height: 0.2,
            center_distance: 0.4,
        }
    }
}

impl CylinderPattern {
    /// Check the target description for internal consistency.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.radii.iter().any(|&r| r <= 0.0) {
            return Err(PatternError::NonPositiveRadius(self.radii));
        }
        if !(self.radii[0] < self.radii[1] && self.radii[1] < self.radii[2]) {
            return Err(PatternError::RadiiNotAscending(self.radii));
        }
        if self.height <= 0.0 {
            return Err(PatternError::NonPositiveHeight(self.height));
        }
        if self.center_distance <= 0.0 {
            return Err(PatternError::NonPositiveCenterDistance(
                self.center_distance,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_is_valid() {
        assert!(CylinderPattern::default().validate().is_ok());
    }

    #[test]
    fn rejects_unordered_radii() {
        let pattern = CylinderPattern {
            radii: [0.06, 0.03, 0.09],
            ..CylinderPattern::default()
        };
        assert!(matches!(
            pattern.validate(),
            Err(PatternError::RadiiNotAscending(_))
        ));
    }

    #[test]
    fn rejects_equal_radii() {
        let pattern = CylinderPattern {
            radii: [0.03, 0.03, 0.09],
            ..CylinderPattern::default()
        };
        assert!(pattern.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_geometry() {
        let pattern = CylinderPattern {
            height: 0.0,
            ..CylinderPattern::default()
        };
        assert!(matches!(
            pattern.validate(),
            Err(PatternError::NonPositiveHeight(_))
        ));

        let pattern = CylinderPattern {
            center_distance: -0.4,
            ..CylinderPattern::default()
        };
        assert!(matches!(
            pattern.validate(),
            Err(PatternError::NonPositiveCenterDistance(_))
        ));
    }

    #[test]
    fn accepts_radii_outside_the_shipped_ratio() {
        // Nothing pins the 1:2:3 relationship of the shipped target.
        let pattern = CylinderPattern {
            radii: [0.02, 0.05, 0.11],
            ..CylinderPattern::default()
        };
        assert!(pattern.validate().is_ok());
    }
}
