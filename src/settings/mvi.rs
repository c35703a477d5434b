//! Intent/reducer primitives for panel-local state.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ change trigger ──→ save
//! ```
//!
//! Panels never mutate their editable state directly: every edit is an
//! intent, and the reducer is the only place a new state is produced.

/// Editable state of one panel. Compared by value to detect changes.
pub trait PanelState: Clone + PartialEq + Send + 'static {}

/// A user edit.
pub trait PanelIntent: Send + 'static {}

/// Pure `(State, Intent) -> State` transition.
pub trait Reducer {
    type State: PanelState;
    type Intent: PanelIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
