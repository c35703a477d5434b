use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, ReentrantMutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct Pending {
    generation: u64,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct SchedulerState {
    generation: u64,
    pending: Option<Pending>,
    torn_down: bool,
}

/// Single-slot timer: at most one callback is pending at a time.
///
/// `arm` replaces any pending callback and restarts the delay from zero.
/// A replaced or cancelled callback never runs. After [`teardown`] the
/// scheduler ignores further `arm` calls. Dropping the scheduler cancels
/// the pending callback.
///
/// The timer task checks its generation and runs the callback while holding
/// a firing gate. `cancel` and `teardown` pass through the same gate before
/// returning, so once they return the dropped callback is neither running
/// nor able to start, even on a multi-thread runtime. The gate is
/// reentrant: a callback may tear down its own scheduler.
///
/// Timers run on the current tokio runtime; `arm` must be called from
/// within one.
///
/// [`teardown`]: DebounceScheduler::teardown
#[derive(Default)]
pub struct DebounceScheduler {
    state: Arc<Mutex<SchedulerState>>,
    firing: Arc<ReentrantMutex<()>>,
}

impl DebounceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` to run once `delay` elapses without another
    /// `arm` or `cancel`. Returns false if the scheduler was torn down.
    pub fn arm<F>(&self, delay: Duration, callback: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        // Held across the spawn so the timer task cannot check its
        // generation before it has been recorded.
        let mut state = self.state.lock();
        if state.torn_down {
            tracing::trace!("Debounce arm ignored after teardown");
            return false;
        }
        if let Some(previous) = state.pending.take() {
            previous.task.abort();
        }
        state.generation += 1;
        let generation = state.generation;

        let deadline = Instant::now() + delay;
        let shared = Arc::clone(&self.state);
        let firing = Arc::clone(&self.firing);
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _firing = firing.lock();
            let fire = {
                let mut state = shared.lock();
                let current = !state.torn_down
                    && state
                        .pending
                        .as_ref()
                        .is_some_and(|pending| pending.generation == generation);
                if current {
                    state.pending = None;
                }
                current
            };
            if fire {
                callback();
            }
        });
        state.pending = Some(Pending { generation, task });
        true
    }

    /// Drops the pending callback, if any. Waits for a callback that has
    /// already started.
    pub fn cancel(&self) {
        if let Some(pending) = self.state.lock().pending.take() {
            pending.task.abort();
            tracing::trace!(generation = pending.generation, "Debounce cancelled");
        }
        self.wait_for_firing();
    }

    /// Cancels the pending callback and refuses all later ones. Waits for a
    /// callback that has already started.
    pub fn teardown(&self) {
        {
            let mut state = self.state.lock();
            state.torn_down = true;
            if let Some(pending) = state.pending.take() {
                pending.task.abort();
            }
        }
        self.wait_for_firing();
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.lock().torn_down
    }

    // Must be called without the state lock: the timer task takes the gate first.
    fn wait_for_firing(&self) {
        drop(self.firing.lock());
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.teardown();
    }
}
