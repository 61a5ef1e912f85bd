use core::{future::Future, time::Duration};

/// Abstracts over how to sleep for a given [`Duration`] in async contexts.
///
/// This keeps the async generation helpers independent of a particular
/// runtime's timer.
pub trait SleepProvider {
    /// The returned future must be `Send` so generation futures can move
    /// across worker threads.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
