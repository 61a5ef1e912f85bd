use core::{cmp::Ordering, fmt};
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{
        Error, Mutex, MutexGuard, Poll, Result, SleepWait, SnowflakeGenerator, WaitStrategy,
    },
    id::{FleetId, SnowflakeId},
    time::TimeSource,
};

/// The canonical generator: [`FleetId`] layout with a sleep-based rollover
/// wait. Pair it with [`SystemClock`] in production.
///
/// [`SystemClock`]: crate::time::SystemClock
pub type FleetGenerator<T, W = SleepWait> = LockSnowflakeGenerator<FleetId, T, W>;

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last minted ID (which carries `last_timestamp`, the machine ID and the
/// current sequence) lives behind a mutex. Every call samples the clock,
/// decides, packs and commits inside that one critical section, so concurrent
/// callers can never observe or produce overlapping `(timestamp, sequence)`
/// pairs.
///
/// Cloning the generator yields another handle to the **same** instance; it
/// does not create a second machine.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Works with any [`SnowflakeId`] layout
/// - ✅ Detects (but never corrects) backward clock jumps
///
/// # Example
/// ```
/// use idalloter::{FleetGenerator, SnowflakeId, SystemClock};
///
/// let generator = FleetGenerator::new(7, SystemClock::default())?;
/// let a = generator.generate_id()?;
/// let b = generator.generate_id()?;
/// assert!(a < b);
/// assert_eq!(b.machine_id(), 7);
/// # Ok::<(), idalloter::Error>(())
/// ```
pub struct LockSnowflakeGenerator<ID, T, W = SleepWait>
where
    ID: SnowflakeId,
    T: TimeSource,
    W: WaitStrategy,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<ID>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<ID>>,
    machine_id: u64,
    time: T,
    wait: W,
}

impl<ID, T> LockSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a generator for `machine_id` with `last_timestamp = 0` and
    /// `sequence = 0`, using the default [`SleepWait`] strategy.
    ///
    /// `machine_id` accepts any integer convertible to `i64` so that negative
    /// inputs coming from configuration are rejected here rather than
    /// silently wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] unless
    /// `0 <= machine_id <= ID::max_machine_id()`.
    ///
    /// # Example
    /// ```
    /// use idalloter::{Error, FleetGenerator, ManualClock};
    ///
    /// assert!(FleetGenerator::new(1023, ManualClock::new(0)).is_ok());
    /// assert!(matches!(
    ///     FleetGenerator::new(1024, ManualClock::new(0)),
    ///     Err(Error::InvalidMachineId { machine_id: 1024, max: 1023 })
    /// ));
    /// ```
    pub fn new(machine_id: impl Into<i64>, time: T) -> Result<Self> {
        Self::with_wait(machine_id, time, SleepWait::default())
    }
}

impl<ID, T, W> LockSnowflakeGenerator<ID, T, W>
where
    ID: SnowflakeId,
    T: TimeSource,
    W: WaitStrategy,
{
    /// Like [`LockSnowflakeGenerator::new`], with an explicit strategy for
    /// waiting out sequence exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] unless
    /// `0 <= machine_id <= ID::max_machine_id()`.
    pub fn with_wait(machine_id: impl Into<i64>, time: T, wait: W) -> Result<Self> {
        let requested = machine_id.into();
        let max = ID::max_machine_id();
        let machine_id = match u64::try_from(requested) {
            Ok(machine_id) if machine_id <= max => machine_id,
            _ => {
                return Err(Error::InvalidMachineId {
                    machine_id: requested,
                    max,
                });
            }
        };

        let id = ID::from_components(0, machine_id, 0);
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(id))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(id)),
            machine_id,
            time,
            wait,
        })
    }

    /// The machine ID encoded into every ID this generator mints.
    pub fn machine_id(&self) -> u64 {
        self.machine_id
    }

    /// Generates the next ID.
    ///
    /// If all sequence numbers of the current millisecond are taken, this
    /// waits (still holding the lock) until the clock ticks over, so the call
    /// takes at most slightly over one millisecond. It never waits on another
    /// thread.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   minted timestamp. State is left unchanged.
    /// - `Error::LockPoisoned` if another caller panicked while holding the
    ///   lock (std mutex only).
    ///
    /// # Example
    /// ```
    /// use idalloter::{FleetGenerator, ManualClock, SnowflakeId};
    ///
    /// let clock = ManualClock::new(1);
    /// let generator = FleetGenerator::new(5, clock.clone())?;
    ///
    /// let first = generator.generate_id()?;
    /// assert_eq!(first.to_raw(), (1 << 22) | (5 << 12));
    /// assert_eq!(generator.generate_id()?.to_raw(), first.to_raw() + 1);
    /// # Ok::<(), idalloter::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_id(&self) -> Result<ID> {
        let mut id = self.lock()?;
        let now = self.time.current_millis();
        let last_timestamp = id.timestamp();

        let next = match now.cmp(&last_timestamp) {
            Ordering::Greater => id.rollover_to_timestamp(now),
            Ordering::Equal if id.has_sequence_room() => id.increment_sequence(),
            Ordering::Equal => {
                let now = self.wait_for_next_millis(last_timestamp);
                id.rollover_to_timestamp(now)
            }
            Ordering::Less => return Err(Self::cold_clock_behind(now, last_timestamp)),
        };

        *id = next;
        Ok(next)
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// On sequence exhaustion this returns [`Poll::Pending`] and leaves the
    /// state untouched, so the caller decides how to back off (an async
    /// runtime timer, a spin, ...).
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_id`].
    ///
    /// # Example
    /// ```
    /// use idalloter::{FleetGenerator, FleetId, ManualClock, Poll};
    ///
    /// let generator = FleetGenerator::new(0, ManualClock::new(42))?;
    ///
    /// let id: FleetId = loop {
    ///     match generator.try_poll_id()? {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// # Ok::<(), idalloter::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll<ID>> {
        let mut id = self.lock()?;
        let now = self.time.current_millis();
        let last_timestamp = id.timestamp();

        let next = match now.cmp(&last_timestamp) {
            Ordering::Greater => id.rollover_to_timestamp(now),
            Ordering::Equal if id.has_sequence_room() => id.increment_sequence(),
            Ordering::Equal => return Ok(Poll::Pending { yield_for: 1 }),
            Ordering::Less => return Err(Self::cold_clock_behind(now, last_timestamp)),
        };

        *id = next;
        Ok(Poll::Ready { id: next })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ID>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// Spins on the wait strategy until the clock passes `last_timestamp`.
    /// Called with the lock held.
    #[cold]
    fn wait_for_next_millis(&self, last_timestamp: u64) -> u64 {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            machine_id = self.machine_id,
            last_timestamp,
            "sequence exhausted, waiting for next millisecond"
        );

        loop {
            self.wait.wait(last_timestamp);
            let now = self.time.current_millis();
            if now > last_timestamp {
                return now;
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last_timestamp: u64) -> Error {
        debug_assert!(now < last_timestamp);
        #[cfg(feature = "tracing")]
        tracing::warn!(
            now,
            last_timestamp,
            behind_ms = last_timestamp - now,
            "clock moved backwards, refusing to generate id"
        );
        Error::ClockRegression {
            now,
            last_timestamp,
        }
    }
}

impl<ID, T, W> Clone for LockSnowflakeGenerator<ID, T, W>
where
    ID: SnowflakeId,
    T: TimeSource + Clone,
    W: WaitStrategy + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            machine_id: self.machine_id,
            time: self.time.clone(),
            wait: self.wait.clone(),
        }
    }
}

impl<ID, T, W> fmt::Debug for LockSnowflakeGenerator<ID, T, W>
where
    ID: SnowflakeId,
    T: TimeSource,
    W: WaitStrategy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockSnowflakeGenerator")
            .field("machine_id", &self.machine_id)
            .finish_non_exhaustive()
    }
}

impl<ID, T, W> SnowflakeGenerator<ID> for LockSnowflakeGenerator<ID, T, W>
where
    ID: SnowflakeId,
    T: TimeSource,
    W: WaitStrategy,
{
    fn machine_id(&self) -> u64 {
        self.machine_id()
    }

    fn generate_id(&self) -> Result<ID> {
        self.generate_id()
    }

    fn try_poll_id(&self) -> Result<Poll<ID>> {
        self.try_poll_id()
    }
}
