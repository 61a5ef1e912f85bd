use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::time::{DEFAULT_EPOCH, TimeSource};

/// A wall-clock time source that reads `SystemTime::now()` on every call.
///
/// Unlike [`MonotonicClock`], this clock follows every adjustment the host
/// makes, including backward steps from NTP. That is exactly what lets a
/// generator notice a regression and refuse to mint IDs instead of silently
/// reusing timestamps.
///
/// Readings earlier than the epoch saturate to zero.
///
/// [`MonotonicClock`]: crate::time::MonotonicClock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch_millis: u64,
}

impl Default for SystemClock {
    /// Constructs a wall clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a wall clock whose zero point is `epoch`, given as a
    /// [`Duration`] since 1970-01-01 UTC.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: epoch.as_millis() as u64,
        }
    }

    /// The configured epoch in Unix milliseconds.
    pub fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        unix_millis.saturating_sub(self.epoch_millis)
    }
}
