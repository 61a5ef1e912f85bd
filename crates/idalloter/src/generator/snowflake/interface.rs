use crate::{
    generator::{Poll, Result},
    id::SnowflakeId,
};

/// A minimal interface for generating Snowflake IDs.
///
/// Extension traits (such as the async helpers behind `async-tokio`) are
/// written against this trait rather than a concrete generator.
pub trait SnowflakeGenerator<ID>
where
    ID: SnowflakeId,
{
    /// The machine ID encoded into every ID this generator mints.
    fn machine_id(&self) -> u64;

    /// Generates the next ID, waiting out sequence exhaustion if needed.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   minted timestamp.
    /// - [`Error::LockPoisoned`] if a previous caller panicked inside the
    ///   critical section (std mutex only).
    ///
    /// [`Error::ClockRegression`]: crate::generator::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::generator::Error
    fn generate_id(&self) -> Result<ID>;

    /// Attempts to generate the next ID without waiting.
    ///
    /// Returns [`Poll::Pending`] instead of blocking when the current
    /// millisecond's sequence space is used up.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::generate_id`].
    fn try_poll_id(&self) -> Result<Poll<ID>>;
}
