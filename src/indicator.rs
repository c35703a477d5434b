//! Save-lifecycle indicator shared between a settings panel and its renderer.

use std::fmt;

use tokio::sync::watch;

/// Lifecycle of the most recent settings write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveState::Idle => "idle",
            SaveState::Saving => "saving",
            SaveState::Saved => "saved",
            SaveState::Error => "error",
        }
    }
}

impl fmt::Display for SaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the current [`SaveState`] of one panel.
///
/// Transitions are not validated: the coordinator drives them and any
/// sequence is accepted. Renderers observe changes through [`subscribe`].
///
/// [`subscribe`]: SavingIndicator::subscribe
#[derive(Clone)]
pub struct SavingIndicator {
    tx: watch::Sender<SaveState>,
}

impl SavingIndicator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SaveState::Idle);
        Self { tx }
    }

    pub fn state(&self) -> SaveState {
        *self.tx.borrow()
    }

    pub fn set_state(&self, next: SaveState) {
        let previous = self.tx.send_replace(next);
        tracing::trace!(from = %previous, to = %next, "Save state changed");
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.tx.subscribe()
    }
}

impl Default for SavingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SavingIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavingIndicator")
            .field("state", &self.state())
            .finish()
    }
}
