//! Debounced change detection for editable settings.
//!
//! ```text
//! edit ──→ ChangeDetector ──changed──→ DebounceScheduler::arm ──quiet──→ save()
//!                                            ↑      │
//!                               edit restarts┘      └── teardown cancels
//! ```

mod change;
mod scheduler;
mod trigger;

pub use change::ChangeDetector;
pub use scheduler::DebounceScheduler;
pub use trigger::{DebouncedCallback, DebouncedChangeTrigger, DEFAULT_DEBOUNCE};
