//! Progress reporting for deployment attempts.
//!
//! Observers are invoked synchronously at defined points of the pipeline and
//! never after the call that produced them has settled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Callback surface for deployment progress.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: u8, message: &str);
}

/// Observer that discards everything.
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _percent: u8, _message: &str) {}
}

/// Wrapper that keeps reported percentages monotonically non-decreasing,
/// whatever the underlying stages report.
pub struct MonotonicProgress {
    inner: Arc<dyn ProgressObserver>,
    last: AtomicU8,
}

impl MonotonicProgress {
    pub fn new(inner: Arc<dyn ProgressObserver>) -> Self {
        Self {
            inner,
            last: AtomicU8::new(0),
        }
    }
}

impl ProgressObserver for MonotonicProgress {
    fn on_progress(&self, percent: u8, message: &str) {
        let previous = self.last.fetch_max(percent, Ordering::SeqCst);
        self.inner.on_progress(percent.max(previous), message);
    }
}

/// Maps a 0..=100 sub-task percentage into a band of the overall pipeline,
/// e.g. raw upload progress into 20..=60.
pub struct ScaledObserver {
    inner: Arc<dyn ProgressObserver>,
    lo: u8,
    hi: u8,
}

impl ScaledObserver {
    pub fn new(inner: Arc<dyn ProgressObserver>, lo: u8, hi: u8) -> Self {
        debug_assert!(lo <= hi && hi <= 100);
        Self { inner, lo, hi }
    }
}

impl ProgressObserver for ScaledObserver {
    fn on_progress(&self, percent: u8, message: &str) {
        let span = (self.hi - self.lo) as u32;
        let scaled = self.lo as u32 + span * percent.min(100) as u32 / 100;
        self.inner.on_progress(scaled as u8, message);
    }
}
