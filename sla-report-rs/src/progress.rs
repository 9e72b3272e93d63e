//! Report progress tracking

use std::sync::Mutex;

/// Callback invoked as `(current, total)` after every produced row
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Mutex-guarded progress counter.
///
/// The driver is single-threaded, but the counter supports callers that
/// share it across threads.
pub struct Progress {
    current: Mutex<u64>,
    total: u64,
    callback: ProgressCallback,
}

impl Progress {
    /// Create a counter for `total` rows
    pub fn new(callback: ProgressCallback, total: u64) -> Self {
        Self {
            current: Mutex::new(0),
            total,
            callback,
        }
    }

    /// Advance the counter and report the new position
    pub fn increment(&self) {
        let mut current = self.current.lock().unwrap();
        *current += 1;
        (self.callback)(*current, self.total);
    }

    /// Current position
    pub fn current(&self) -> u64 {
        *self.current.lock().unwrap()
    }

    /// Total number of rows
    pub fn total(&self) -> u64 {
        self.total
    }
}
