//! Single-slot scan buffer.

use std::sync::Arc;

use parking_lot::Mutex;

use laser_calib_core::LaserScan;

use crate::traits::ScanSource;

/// Last-write-wins buffer between a sensor driver callback and the loop.
///
/// Clones share the slot, so a driver thread can `publish` into one handle
/// while the estimation loop polls another. If scans arrive faster than they
/// are consumed, older ones are silently replaced.
#[derive(Clone, Debug, Default)]
pub struct LatestScanSlot {
    inner: Arc<Mutex<Option<LaserScan>>>,
}

impl LatestScanSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a scan, replacing any unread one.
    pub fn publish(&self, scan: LaserScan) {
        *self.inner.lock() = Some(scan);
    }
}

impl ScanSource for LatestScanSlot {
    fn latest_scan(&self) -> Option<LaserScan> {
        self.inner.lock().clone()
    }
}
