use core::time::Duration;

/// How a generator passes time while the current millisecond's sequence
/// space is exhausted.
///
/// [`LockSnowflakeGenerator::generate_id`] calls [`WaitStrategy::wait`]
/// repeatedly, resampling its clock after each call, until the clock moves
/// past `last_timestamp`. The generator's lock is held throughout, so an
/// implementation must return promptly and must not call back into the same
/// generator.
///
/// [`LockSnowflakeGenerator::generate_id`]: crate::generator::LockSnowflakeGenerator::generate_id
pub trait WaitStrategy {
    /// Pauses briefly. `last_timestamp` is the millisecond that ran out.
    fn wait(&self, last_timestamp: u64);
}

/// Sleeps the calling thread for a short, fixed interval.
///
/// The default interval is 20µs, so a full rollover costs a few dozen
/// iterations at most.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepWait(pub Duration);

impl SleepWait {
    /// Interval used by [`SleepWait::default`].
    pub const DEFAULT_INTERVAL: Duration = Duration::from_micros(20);
}

impl Default for SleepWait {
    fn default() -> Self {
        Self(Self::DEFAULT_INTERVAL)
    }
}

impl WaitStrategy for SleepWait {
    fn wait(&self, _last_timestamp: u64) {
        std::thread::sleep(self.0);
    }
}

/// Busy-spins with a CPU hint. Lowest latency, burns a core while waiting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpinWait;

impl WaitStrategy for SpinWait {
    fn wait(&self, _last_timestamp: u64) {
        core::hint::spin_loop();
    }
}

/// Yields the rest of the thread's time slice to the scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YieldWait;

impl WaitStrategy for YieldWait {
    fn wait(&self, _last_timestamp: u64) {
        std::thread::yield_now();
    }
}

impl<W: WaitStrategy + ?Sized> WaitStrategy for &W {
    fn wait(&self, last_timestamp: u64) {
        (**self).wait(last_timestamp);
    }
}
