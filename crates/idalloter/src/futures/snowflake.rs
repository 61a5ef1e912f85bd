use core::{future::Future, time::Duration};

use super::SleepProvider;
use crate::{
    generator::{Poll, Result, SnowflakeGenerator},
    id::SnowflakeId,
};

/// Extension trait for generating Snowflake IDs from async code.
///
/// Instead of blocking the executor thread during a rollover wait, the
/// returned future polls the generator with
/// [`SnowflakeGenerator::try_poll_id`] and sleeps through the provided
/// [`SleepProvider`] whenever the millisecond is exhausted. Each poll is a
/// complete transition under the generator's lock; the lock is never held
/// across an `.await`.
pub trait SnowflakeGeneratorAsyncExt<ID>
where
    ID: SnowflakeId,
{
    /// Returns a future that resolves to the next available ID.
    ///
    /// # Errors
    ///
    /// Resolves to an error under the same conditions as
    /// [`SnowflakeGenerator::generate_id`]. A clock regression is returned
    /// immediately, not retried.
    fn generate_id_async<S>(&self) -> impl Future<Output = Result<ID>> + Send
    where
        S: SleepProvider;
}

impl<G, ID> SnowflakeGeneratorAsyncExt<ID> for G
where
    G: SnowflakeGenerator<ID> + Sync,
    ID: SnowflakeId + Send,
{
    fn generate_id_async<S>(&self) -> impl Future<Output = Result<ID>> + Send
    where
        S: SleepProvider,
    {
        async move {
            loop {
                let dur = match self.try_poll_id()? {
                    Poll::Ready { id } => return Ok(id),
                    Poll::Pending { yield_for } => Duration::from_millis(yield_for),
                };
                #[cfg(feature = "tracing")]
                tracing::trace!(?dur, "sequence exhausted, deferring");
                S::sleep_for(dur).await;
            }
        }
    }
}
