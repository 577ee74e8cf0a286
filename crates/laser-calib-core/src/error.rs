//! Run-aborting errors.
//!
//! Anything here terminates the whole run with no partial result. A pattern
//! detector returning "not found" is *not* an error; it feeds the fail
//! counter of the estimation loop instead.

use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    /// The static sensor-to-base transform could not be resolved within the
    /// bounded wait.
    #[error("scanner mount transform unavailable: {reason}")]
    TransformUnavailable { reason: String },

    /// No scan arrived from the sensor stream within the startup timeout.
    #[error("no laser scan received within {waited_ms} ms")]
    FirstScanTimeout { waited_ms: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
