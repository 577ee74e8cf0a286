//! Core types and configuration for laser calibration-target pose estimation.
//!
//! This crate is intentionally small and purely descriptive. It holds the
//! data model (scans, poses, the cylinder target geometry), the run
//! configuration, and the error types shared across the workspace. It does
//! *not* contain the estimation loop, any sensor IO, or any rasterization.

mod config;
mod error;
mod logger;
mod pattern;
mod pose;
mod scan;

pub use config::{CalibrationConfig, ConfigError, ConfigIoError, MountSide};
pub use error::CalibrationError;
pub use pattern::{CylinderPattern, PatternError};
pub use pose::{MountTransform, PoseEstimate3D, TargetPose2D};
pub use scan::{AveragedScan, LaserScan, NO_RETURN};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
