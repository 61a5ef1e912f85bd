use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idalloter::{
    FleetGenerator, FleetId, LockSnowflakeGenerator, ManualClock, MonotonicClock, SleepWait,
    SnowflakeGenerator, SnowflakeId, SpinWait, SystemClock, WaitStrategy, YieldWait,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

// One full millisecond's worth of sequence numbers for the canonical layout.
const TOTAL_IDS: usize = 4096;

/// Benchmarks the uncontended hot path: the clock is frozen and a fresh
/// generator is built per iteration, so every call is a sequence increment.
fn bench_generator<ID, G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    ID: SnowflakeId,
    G: SnowflakeGenerator<ID>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a generator on a real clock, including rollover waits.
fn bench_generator_wallclock<ID, G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    ID: SnowflakeId,
    G: SnowflakeGenerator<ID>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator = generator_factory();
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.generate_id().unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads with a frozen clock.
fn bench_generator_contended<ID, G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    ID: SnowflakeId,
    G: SnowflakeGenerator<ID> + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = generator_factory();
                    let barrier = Barrier::new(thread_count + 1);
                    scope(|s| {
                        for _ in 0..thread_count {
                            s.spawn(|| {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.generate_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

/// Benchmarks many generators on a shared real clock, each driven by its own
/// Tokio task.
#[cfg(feature = "async-tokio")]
fn bench_generator_async_tokio<T>(
    c: &mut Criterion,
    group_name: &str,
    clock_factory: impl Fn() -> T + Copy,
) where
    T: idalloter::TimeSource + Clone + Send + Sync + 'static,
{
    use futures::future::try_join_all;
    use idalloter::{Result, SnowflakeGeneratorAsyncExt, TokioSleep};
    use tokio::runtime::Builder;

    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);
    group.sampling_mode(criterion::SamplingMode::Flat);

    let total_ids = TOTAL_IDS * 256;

    for num_generators in [1_u16, 2, 4, 8, 16, 64, 256, 1024] {
        let ids_per_task = total_ids / num_generators as usize;

        group.throughput(Throughput::Elements(total_ids as u64));
        group.bench_function(format!("elems/{total_ids}/gens/{num_generators}"), |b| {
            let rt = Builder::new_multi_thread().enable_all().build().unwrap();

            b.to_async(&rt).iter_custom(move |iters| async move {
                let clock = clock_factory();
                let start = Instant::now();

                for _ in 0..iters {
                    let mut tasks: Vec<tokio::task::JoinHandle<Result<()>>> =
                        Vec::with_capacity(num_generators as usize);

                    for machine_id in 0..num_generators {
                        let generator = FleetGenerator::new(machine_id, clock.clone()).unwrap();
                        tasks.push(tokio::spawn(async move {
                            for _ in 0..ids_per_task {
                                let id: FleetId =
                                    generator.generate_id_async::<TokioSleep>().await?;
                                black_box(id);
                            }
                            Ok(())
                        }));
                    }

                    for result in try_join_all(tasks).await.unwrap() {
                        result.unwrap();
                    }
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn frozen<W: WaitStrategy + Default>() -> LockSnowflakeGenerator<FleetId, ManualClock, W> {
    LockSnowflakeGenerator::with_wait(0, ManualClock::new(1), W::default()).unwrap()
}

fn benchmarks(c: &mut Criterion) {
    bench_generator::<FleetId, _>(c, "fleet/lock/frozen", frozen::<SleepWait>);
    bench_generator_contended::<FleetId, _>(c, "fleet/lock/frozen/contended", frozen::<SleepWait>);

    let system = SystemClock::default();
    bench_generator_wallclock::<FleetId, _>(c, "fleet/lock/system/sleep", || {
        FleetGenerator::new(0, system).unwrap()
    });
    bench_generator_wallclock::<FleetId, _>(c, "fleet/lock/system/spin", || {
        LockSnowflakeGenerator::<FleetId, _, _>::with_wait(0, system, SpinWait).unwrap()
    });
    bench_generator_wallclock::<FleetId, _>(c, "fleet/lock/system/yield", || {
        LockSnowflakeGenerator::<FleetId, _, _>::with_wait(0, system, YieldWait).unwrap()
    });

    let mono = Arc::new(MonotonicClock::default());
    bench_generator_wallclock::<FleetId, _>(c, "fleet/lock/mono/sleep", || {
        FleetGenerator::new(0, Arc::clone(&mono)).unwrap()
    });

    #[cfg(feature = "async-tokio")]
    {
        bench_generator_async_tokio(c, "fleet/async/tokio/system", SystemClock::default);
        bench_generator_async_tokio(c, "fleet/async/tokio/mono", || {
            Arc::new(MonotonicClock::default())
        });
    }
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
