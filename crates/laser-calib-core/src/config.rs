//! Run configuration.
//!
//! One immutable [`CalibrationConfig`] value is constructed at startup
//! (usually from JSON) and passed by reference into each component. There is
//! no dynamic reconfiguration during a run.

use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr, time::Duration};

use crate::pattern::{CylinderPattern, PatternError};

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors for a configuration that cannot drive a run.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("scanner mount side must be 'front' or 'rear' (got {0:?})")]
    InvalidMountSide(String),
    #[error("success threshold must be positive")]
    ZeroSuccessThreshold,
    #[error("fail threshold must be positive")]
    ZeroFailThreshold,
    #[error("scan batch size must be positive")]
    ZeroScanCount,
    #[error("max valid range must be positive (got {0})")]
    NonPositiveMaxRange(f64),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Which side of the vehicle the scanner is mounted on.
///
/// The rear scanner's local axes are mirrored relative to the vehicle's
/// forward axis, which flips the sign convention of the pose composition.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountSide {
    Front,
    Rear,
}

impl FromStr for MountSide {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(MountSide::Front),
            "rear" => Ok(MountSide::Rear),
            other => Err(ConfigError::InvalidMountSide(other.to_owned())),
        }
    }
}

impl fmt::Display for MountSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountSide::Front => f.write_str("front"),
            MountSide::Rear => f.write_str("rear"),
        }
    }
}

fn default_resolution() -> u32 {
    1000
}

fn default_scan_count() -> usize {
    20
}

fn default_success_threshold() -> u32 {
    6
}

fn default_border() -> u32 {
    100
}

fn default_max_range() -> f64 {
    3.2
}

fn default_sample_pause_ms() -> u64 {
    10
}

fn default_first_scan_timeout_ms() -> u64 {
    2000
}

fn default_transform_timeout_ms() -> u64 {
    1000
}

fn default_line_color() -> [u8; 3] {
    [0, 255, 255]
}

/// Full configuration of one calibration run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Scanner mount side; selects the sensor channel and the sign
    /// convention of the pose composition.
    pub mount_side: MountSide,
    /// Pixels per meter used by the rasterizing detector; opaque to the
    /// estimation loop.
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Raw scans merged into one averaged scan per iteration.
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,
    /// Accepted detections needed to finish with a success.
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,
    /// Missed detections needed to give up; defaults to 11x the success
    /// threshold when not set.
    #[serde(default)]
    pub fail_threshold: Option<u32>,
    /// Pixel border around the rasterized scan; opaque to the loop.
    #[serde(default = "default_border")]
    pub border: u32,
    /// Ranges beyond this are treated as invalid, meters.
    #[serde(default = "default_max_range")]
    pub max_range: f64,
    /// Pause between consecutive raw-scan pulls, decorrelating readings.
    #[serde(default = "default_sample_pause_ms")]
    pub sample_pause_ms: u64,
    /// Bounded wait for the first scan at startup; exceeding it aborts.
    #[serde(default = "default_first_scan_timeout_ms")]
    pub first_scan_timeout_ms: u64,
    /// Bounded wait for the mount transform; exceeding it aborts.
    #[serde(default = "default_transform_timeout_ms")]
    pub transform_timeout_ms: u64,
    /// Geometry of the cylinder target.
    #[serde(default)]
    pub pattern: CylinderPattern,
    /// Rendering color token handed through to the detector; opaque here.
    #[serde(default = "default_line_color")]
    pub line_color: [u8; 3],
}

impl CalibrationConfig {
    /// Configuration with all defaults for the given mount side.
    pub fn new(mount_side: MountSide) -> Self {
        Self {
            mount_side,
            resolution: default_resolution(),
            scan_count: default_scan_count(),
            success_threshold: default_success_threshold(),
            fail_threshold: None,
            border: default_border(),
            max_range: default_max_range(),
            sample_pause_ms: default_sample_pause_ms(),
            first_scan_timeout_ms: default_first_scan_timeout_ms(),
            transform_timeout_ms: default_transform_timeout_ms(),
            pattern: CylinderPattern::default(),
            line_color: default_line_color(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Effective fail threshold: the configured value, or 11x the success
    /// threshold.
    pub fn fail_threshold(&self) -> u32 {
        self.fail_threshold
            .unwrap_or(self.success_threshold.saturating_mul(11))
    }

    pub fn sample_pause(&self) -> Duration {
        Duration::from_millis(self.sample_pause_ms)
    }

    pub fn first_scan_timeout(&self) -> Duration {
        Duration::from_millis(self.first_scan_timeout_ms)
    }

    pub fn transform_timeout(&self) -> Duration {
        Duration::from_millis(self.transform_timeout_ms)
    }

    /// Check the configuration before starting a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.success_threshold == 0 {
            return Err(ConfigError::ZeroSuccessThreshold);
        }
        if self.fail_threshold() == 0 {
            return Err(ConfigError::ZeroFailThreshold);
        }
        if self.scan_count == 0 {
            return Err(ConfigError::ZeroScanCount);
        }
        if self.max_range <= 0.0 {
            return Err(ConfigError::NonPositiveMaxRange(self.max_range));
        }
        self.pattern.validate()?;
        Ok(())
    }
}
