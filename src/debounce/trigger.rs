use std::sync::Arc;
use std::time::Duration;

use super::change::ChangeDetector;
use super::scheduler::DebounceScheduler;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A callback that runs once per quiet window.
///
/// Every [`call`] restarts the window. The callback takes no arguments: it
/// reads whatever state it needs when it fires, so a burst of edits is saved
/// with the values current at the end of the burst.
///
/// [`call`]: DebouncedCallback::call
pub struct DebouncedCallback {
    scheduler: DebounceScheduler,
    window: Duration,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl DebouncedCallback {
    pub fn new<F>(window: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            scheduler: DebounceScheduler::new(),
            window,
            callback: Arc::new(callback),
        }
    }

    pub fn call(&self) {
        let callback = Arc::clone(&self.callback);
        self.scheduler.arm(self.window, move || callback());
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn teardown(&self) {
        self.scheduler.teardown();
    }
}

/// Watches a set of values and fires a debounced callback when they change.
///
/// The first [`observe`] is the mount and never fires.
///
/// [`observe`]: DebouncedChangeTrigger::observe
pub struct DebouncedChangeTrigger<T> {
    detector: ChangeDetector<T>,
    debounced: DebouncedCallback,
}

impl<T: PartialEq + Clone> DebouncedChangeTrigger<T> {
    pub fn new<F>(window: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            detector: ChangeDetector::new(),
            debounced: DebouncedCallback::new(window, callback),
        }
    }

    /// Feeds the current values. Returns true when a save was (re)scheduled.
    pub fn observe(&mut self, deps: &T) -> bool {
        if self.detector.observe(deps) {
            self.debounced.call();
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debounced.is_pending()
    }

    /// Cancels a scheduled save and ignores all later changes.
    pub fn teardown(&self) {
        self.debounced.teardown();
    }
}
