use core::{future::Future, time::Duration};

use super::{SleepProvider, SnowflakeGeneratorAsyncExt};
use crate::{
    generator::{Result, SnowflakeGenerator},
    id::SnowflakeId,
};

/// A [`SleepProvider`] backed by Tokio's timer.
///
/// This is the default provider for async applications built on Tokio.
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// A [`SleepProvider`] that yields to the Tokio scheduler instead of arming a
/// timer.
///
/// More responsive at low concurrency, but under load the tighter polling
/// loop costs more CPU than [`TokioSleep`].
pub struct TokioYield;

impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

/// Convenience wrapper over [`SnowflakeGeneratorAsyncExt`] that fixes the
/// sleep provider to [`TokioSleep`].
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> idalloter::Result<()> {
/// use idalloter::{FleetGenerator, SnowflakeGeneratorAsyncTokioExt, SystemClock};
///
/// let generator = FleetGenerator::new(1, SystemClock::default())?;
/// let id = generator.generate_id_tokio().await?;
/// println!("{id}");
/// # Ok(())
/// # }
/// ```
pub trait SnowflakeGeneratorAsyncTokioExt<ID>
where
    ID: SnowflakeId,
{
    /// Returns a future that resolves to the next available ID, sleeping on
    /// Tokio's timer through rollover.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::generate_id`].
    fn generate_id_tokio(&self) -> impl Future<Output = Result<ID>> + Send;
}

impl<G, ID> SnowflakeGeneratorAsyncTokioExt<ID> for G
where
    G: SnowflakeGenerator<ID> + Sync,
    ID: SnowflakeId + Send,
{
    fn generate_id_tokio(&self) -> impl Future<Output = Result<ID>> + Send {
        <Self as SnowflakeGeneratorAsyncExt<ID>>::generate_id_async::<TokioSleep>(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use futures::future::try_join_all;

    use super::*;
    use crate::{
        define_snowflake_id,
        generator::{Error, FleetGenerator, LockSnowflakeGenerator},
        id::FleetId,
        time::{ManualClock, SystemClock},
    };

    define_snowflake_id!(TinyId, timestamp: 41, machine_id: 10, sequence: 4);

    const NUM_GENERATORS: u16 = 8;
    const IDS_PER_GENERATOR: usize = 4096 * 4;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn can_call_generate_id_tokio() {
        let generator = FleetGenerator::new(0, SystemClock::default()).unwrap();
        let a: FleetId = generator.generate_id_tokio().await.unwrap();
        let b: FleetId = generator.generate_id_tokio().await.unwrap();
        assert!(a < b);
    }

    #[tokio::test]
    async fn regression_is_not_retried() {
        let clock = ManualClock::new(50);
        let generator = FleetGenerator::new(0, clock.clone()).unwrap();
        generator.generate_id_tokio().await.unwrap();

        clock.set(10);
        let err = generator
            .generate_id_async::<TokioYield>()
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::ClockRegression {
                now: 10,
                last_timestamp: 50
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unique_ids_sleep() {
        assert_unique_across_generators::<TokioSleep>().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unique_ids_yield() {
        assert_unique_across_generators::<TokioYield>().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn shared_generator_with_frequent_rollover() {
        const TASKS: usize = 8;
        const IDS_PER_TASK: usize = 100;

        // 16 IDs per millisecond, so the tasks keep hitting Pending
        let generator: LockSnowflakeGenerator<TinyId, _> =
            LockSnowflakeGenerator::new(0, SystemClock::default()).unwrap();

        let tasks: Vec<_> = (0..TASKS)
            .map(|_| {
                let generator = generator.clone();
                tokio::spawn(async move {
                    let mut ids = Vec::with_capacity(IDS_PER_TASK);
                    for _ in 0..IDS_PER_TASK {
                        ids.push(generator.generate_id_tokio().await?);
                    }
                    Ok::<_, Error>(ids)
                })
            })
            .collect();

        let mut seen = HashSet::with_capacity(TASKS * IDS_PER_TASK);
        for ids in try_join_all(tasks).await.unwrap() {
            for id in ids.unwrap() {
                assert!(seen.insert(id), "duplicate id {id:?}");
            }
        }
        assert_eq!(seen.len(), TASKS * IDS_PER_TASK);
    }

    async fn assert_unique_across_generators<S: SleepProvider + 'static>() {
        let clock = SystemClock::default();

        let tasks: Vec<_> = (0..NUM_GENERATORS)
            .map(|machine_id| {
                let generator = FleetGenerator::new(machine_id, clock).unwrap();
                tokio::spawn(async move {
                    let mut ids = Vec::with_capacity(IDS_PER_GENERATOR);
                    for _ in 0..IDS_PER_GENERATOR {
                        ids.push(generator.generate_id_async::<S>().await?);
                    }
                    Ok::<_, Error>(ids)
                })
            })
            .collect();

        let all: Vec<FleetId> = try_join_all(tasks)
            .await
            .unwrap()
            .into_iter()
            .flat_map(Result::unwrap)
            .collect();
        assert_eq!(all.len(), NUM_GENERATORS as usize * IDS_PER_GENERATOR);

        let mut seen = HashSet::with_capacity(all.len());
        for id in &all {
            assert!(seen.insert(id), "duplicate id {id:?}");
        }
    }
}
