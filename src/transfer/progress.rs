//! Progress reporting and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::record::MediaFileRecord;

/// Longest uninterrupted sleep while waiting on a cancellable delay.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Observer for transfer progress.
///
/// All methods have empty default implementations,
/// so a sink only needs to implement the channels it cares about.
pub trait ProgressSink {
    /// Per-file copy progress as an integer percentage.
    fn file_progress(&self, _file_name: &str, _percent: u8) {}

    /// Batch progress: `current` is the 1-based index of the record being transferred.
    fn batch_progress(&self, _current: usize, _total: usize) {}

    /// Called before a record is transferred.
    fn record_started(&self, _record: &MediaFileRecord) {}

    /// Called with the updated record after each transfer.
    fn record_finished(&self, _record: &MediaFileRecord) {}

    /// Called when verification could not be completed because of an error.
    /// The record still fails with the plain verification message.
    fn verification_error(&self, _file_name: &str, _error: &anyhow::Error) {}
}

/// Sink that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Shared cancellation flag checked between copy chunks and batch items.
#[derive(Debug, Default, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `delay` in short slices, returning early once cancelled.
    ///
    /// Returns `false` if the wait was cut short by cancellation.
    pub fn sleep(&self, delay: Duration) -> bool {
        let deadline = Instant::now() + delay;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(CANCEL_POLL_INTERVAL));
        }
    }
}

/// Tracks copy progress and reports a percentage only when the rounded value changes.
#[derive(Debug)]
pub(crate) struct PercentTracker {
    total: u64,
    last: Option<u8>,
}

impl PercentTracker {
    pub(crate) const fn new(total: u64) -> Self {
        Self { total, last: None }
    }

    /// Returns the new percentage if it differs from the previously reported one.
    pub(crate) fn update(&mut self, done: u64) -> Option<u8> {
        let percent = if self.total == 0 {
            100
        } else {
            let ratio = done.min(self.total) as f64 / self.total as f64;
            (ratio * 100.0).round() as u8
        };
        if self.last == Some(percent) {
            None
        } else {
            self.last = Some(percent);
            Some(percent)
        }
    }
}
