use core::time::Duration;
use portable_atomic::{AtomicU64, Ordering};
use std::{
    sync::Arc,
    thread,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use crate::time::{DEFAULT_EPOCH, TimeSource};

/// Counter shared with the ticker thread.
#[derive(Debug)]
struct SharedTicker {
    elapsed_millis: AtomicU64,
}

/// A monotonic time source: elapsed time since construction, offset so that
/// zero lines up with a user-defined epoch.
///
/// The offset between the epoch and "now" is computed once from the wall
/// clock; after that a background thread advances a shared counter from
/// `Instant`, which never goes backward. A generator driven by this clock will
/// therefore never report a clock regression, at the cost of drifting from
/// the wall clock if the host clock is stepped while the process runs.
///
/// The ticker thread holds only a weak reference and exits once every clone
/// of the clock has been dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTicker>,
    epoch_offset: u64,
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using `epoch` (a [`Duration`] since
    /// 1970-01-01 UTC) as its origin.
    ///
    /// If the wall clock currently reads earlier than `epoch`, the clock
    /// starts at zero.
    ///
    /// ```
    /// use idalloter::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::default();
    /// let a = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(3));
    /// assert!(clock.current_millis() >= a);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Self {
        let start = Instant::now();
        let epoch_offset = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .saturating_sub(epoch)
            .as_millis() as u64;

        let inner = Arc::new(SharedTicker {
            elapsed_millis: AtomicU64::new(0),
        });

        let weak_inner = Arc::downgrade(&inner);
        thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.elapsed_millis.store(now_ms, Ordering::Release);

                tick = now_ms + 1;
            }
        });

        Self {
            inner,
            epoch_offset,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.inner.elapsed_millis.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::default();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_over_time() {
        let clock = MonotonicClock::with_epoch(crate::time::UNIX_EPOCH);
        let before = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() > before);
    }
}
