use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::time::TimeSource;

/// A time source that only moves when told to.
///
/// Clones share the same underlying counter, so a test can hand one clone to
/// a generator and keep another to step time forward or backward.
///
/// ```
/// use idalloter::{ManualClock, TimeSource};
///
/// let clock = ManualClock::new(10);
/// let handle = clock.clone();
/// handle.advance(5);
/// assert_eq!(clock.current_millis(), 15);
/// handle.set(3);
/// assert_eq!(clock.current_millis(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at `millis`.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Moves the clock to `millis`, which may be earlier than the current
    /// reading.
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::Release);
    }

    /// Moves the clock forward by `millis`.
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::AcqRel);
    }
}

impl TimeSource for ManualClock {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::Acquire)
    }
}
