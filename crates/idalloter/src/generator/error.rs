/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `idalloter` can emit.
///
/// Running out of sequence numbers within a millisecond is deliberately not
/// an error: the generator absorbs it by waiting for the next millisecond.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The machine ID passed at construction does not fit the layout's
    /// machine ID field.
    ///
    /// Retrying with the same input will fail again.
    #[error("invalid machine id {machine_id}: must be within 0..={max}")]
    InvalidMachineId {
        /// The rejected value.
        machine_id: i64,
        /// The largest machine ID the layout can encode.
        max: u64,
    },

    /// The clock reported a time earlier than the last timestamp the
    /// generator handed out.
    ///
    /// The generator's state is left untouched; once the clock catches up,
    /// generation resumes. Whether to retry, fail the request or fail over is
    /// up to the caller.
    #[error("clock moved backwards: now {now}ms < last {last_timestamp}ms")]
    ClockRegression {
        /// The regressed clock reading.
        now: u64,
        /// The timestamp of the most recently minted ID.
        last_timestamp: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
