// Cancel-then-schedule timer for on-the-fly validation.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// One pending delayed action at a time.
///
/// Arming aborts whatever was pending and starts a new timer tagged with a
/// fresh generation. Work started by an older generation can check
/// [`Debouncer::is_current`] and drop its result.
pub struct Debouncer {
    delay: Duration,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            handle: None,
            generation: 0,
        }
    }

    /// Replace any pending timer. `fire` runs with the new generation once
    /// the delay passes without another `arm` or `cancel`.
    pub fn arm<F, Fut>(&mut self, fire: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.abort_pending();
        self.generation += 1;

        let generation = self.generation;
        let delay = self.delay;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(generation).await;
        }));

        generation
    }

    /// Drop the pending timer and invalidate any work it already started
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.generation += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
