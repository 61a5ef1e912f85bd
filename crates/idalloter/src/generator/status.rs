use crate::id::SnowflakeId;

/// Outcome of a single non-blocking generation attempt.
///
/// Returned by [`SnowflakeGenerator::try_poll_id`]. Blocking callers never see
/// this type: [`SnowflakeGenerator::generate_id`] waits out the `Pending` case
/// itself.
///
/// [`SnowflakeGenerator::try_poll_id`]: crate::generator::SnowflakeGenerator::try_poll_id
/// [`SnowflakeGenerator::generate_id`]: crate::generator::SnowflakeGenerator::generate_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<ID: SnowflakeId> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// Every sequence number of the current millisecond has been handed out.
    ///
    /// Nothing was consumed; try again after `yield_for` milliseconds.
    Pending {
        /// Milliseconds to back off before the next attempt.
        yield_for: u64,
    },
}
