use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::context::SettingsContext;
use super::mvi::{PanelIntent, PanelState, Reducer};
use crate::debounce::DebouncedChangeTrigger;
use crate::indicator::{SaveState, SavingIndicator};
use crate::mailbox::{AutoCloseRequest, Mailbox, MailboxUpdate, RunAutoClose, UpdateMailbox};
use crate::mutation::{MutationWithToast, MutationWithToastOptions, SettingsMutation};

pub const AUTO_CLOSE_ERROR_TITLE: &str = "Error updating auto-close settings";
pub const AUTO_CLOSE_TRIGGERED: &str = "The auto-close job has been triggered successfully.";
pub const AUTO_CLOSE_FALLBACK: &str = "running auto-close";
const DEFAULT_DAYS: &str = "30";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCloseState {
    pub enabled: bool,
    /// Raw text of the days input.
    pub days_of_inactivity: String,
}

impl PanelState for AutoCloseState {}

impl AutoCloseState {
    pub fn from_mailbox(mailbox: &Mailbox) -> Self {
        Self {
            enabled: mailbox.auto_close_enabled,
            days_of_inactivity: mailbox
                .auto_close_days_of_inactivity
                .map(|days| days.to_string())
                .unwrap_or_else(|| DEFAULT_DAYS.to_string()),
        }
    }

    /// The days input as a number. Text that is not a non-negative integer
    /// becomes 0, which the server rejects.
    pub fn days_value(&self) -> u32 {
        self.days_of_inactivity.trim().parse().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub enum AutoCloseIntent {
    SetEnabled(bool),
    SetDaysOfInactivity(String),
}

impl PanelIntent for AutoCloseIntent {}

pub struct AutoCloseReducer;

impl Reducer for AutoCloseReducer {
    type State = AutoCloseState;
    type Intent = AutoCloseIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AutoCloseIntent::SetEnabled(enabled) => AutoCloseState { enabled, ..state },
            AutoCloseIntent::SetDaysOfInactivity(days_of_inactivity) => AutoCloseState {
                days_of_inactivity,
                ..state
            },
        }
    }
}

/// Auto-close toggle and inactivity threshold, saved after edits settle,
/// plus a button that runs the auto-close job immediately.
pub struct AutoCloseSetting {
    slug: String,
    state: Arc<Mutex<AutoCloseState>>,
    settings: SettingsMutation<UpdateMailbox>,
    trigger: DebouncedChangeTrigger<AutoCloseState>,
    run_now: MutationWithToast<RunAutoClose>,
}

impl AutoCloseSetting {
    pub fn mount(mailbox: &Mailbox, ctx: &SettingsContext) -> Self {
        let slug = mailbox.slug.clone();
        let initial = AutoCloseState::from_mailbox(mailbox);
        let state = Arc::new(Mutex::new(initial.clone()));
        let settings = ctx.update_mailbox(&slug, AUTO_CLOSE_ERROR_TITLE);

        let mut trigger = {
            let slug = slug.clone();
            let state = Arc::clone(&state);
            let settings = settings.clone();
            DebouncedChangeTrigger::new(ctx.debounce, move || {
                let current = state.lock().clone();
                settings.save(MailboxUpdate {
                    auto_close_enabled: Some(current.enabled),
                    auto_close_days_of_inactivity: Some(current.days_value()),
                    ..MailboxUpdate::for_mailbox(slug.as_str())
                });
            })
        };
        trigger.observe(&initial);

        let run_now = MutationWithToast::new(
            Arc::new(RunAutoClose::new(Arc::clone(&ctx.api))),
            MutationWithToastOptions::default()
                .success_message(AUTO_CLOSE_TRIGGERED)
                .fallback_message(AUTO_CLOSE_FALLBACK),
            Arc::clone(&ctx.toasts),
        );

        Self {
            slug,
            state,
            settings,
            trigger,
            run_now,
        }
    }

    pub fn dispatch(&mut self, intent: AutoCloseIntent) {
        let next = {
            let mut state = self.state.lock();
            let next = AutoCloseReducer::reduce(state.clone(), intent);
            *state = next.clone();
            next
        };
        self.trigger.observe(&next);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.dispatch(AutoCloseIntent::SetEnabled(enabled));
    }

    pub fn set_days_of_inactivity(&mut self, days: impl Into<String>) {
        self.dispatch(AutoCloseIntent::SetDaysOfInactivity(days.into()));
    }

    pub fn state(&self) -> AutoCloseState {
        self.state.lock().clone()
    }

    /// Unit shown next to the days input.
    pub fn days_label(&self) -> &'static str {
        if self.state.lock().days_of_inactivity == "1" {
            "day"
        } else {
            "days"
        }
    }

    pub fn save_state(&self) -> SaveState {
        self.settings.state()
    }

    pub fn indicator(&self) -> &SavingIndicator {
        self.settings.indicator()
    }

    /// True while an edit is waiting for the debounce window to close.
    pub fn is_save_scheduled(&self) -> bool {
        self.trigger.is_pending()
    }

    /// The run button is disabled while auto-close is off or a run is in flight.
    pub fn can_run_auto_close(&self) -> bool {
        self.state.lock().enabled && !self.run_now.is_pending()
    }

    /// Starts the auto-close job. Returns `None` when the button is disabled.
    pub fn run_auto_close(&self) -> Option<JoinHandle<()>> {
        if !self.can_run_auto_close() {
            return None;
        }
        Some(self.run_now.mutate(AutoCloseRequest {
            mailbox_slug: self.slug.clone(),
        }))
    }

    /// Cancels a scheduled save. Saves already in flight still complete.
    pub fn teardown(&self) {
        self.trigger.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(enabled: bool, days: &str) -> AutoCloseState {
        AutoCloseState {
            enabled,
            days_of_inactivity: days.to_string(),
        }
    }

    #[test]
    fn initial_days_default_to_thirty() {
        let mailbox = Mailbox::new("gumroad", "Gumroad");
        assert_eq!(AutoCloseState::from_mailbox(&mailbox), state(false, "30"));
    }

    #[test]
    fn initial_days_come_from_mailbox() {
        let mut mailbox = Mailbox::new("gumroad", "Gumroad");
        mailbox.auto_close_enabled = true;
        mailbox.auto_close_days_of_inactivity = Some(7);
        assert_eq!(AutoCloseState::from_mailbox(&mailbox), state(true, "7"));
    }

    #[test]
    fn reducer_updates_one_field() {
        let next = AutoCloseReducer::reduce(state(false, "30"), AutoCloseIntent::SetEnabled(true));
        assert_eq!(next, state(true, "30"));

        let next =
            AutoCloseReducer::reduce(next, AutoCloseIntent::SetDaysOfInactivity("15".to_string()));
        assert_eq!(next, state(true, "15"));
    }

    #[test]
    fn days_value_coerces_bad_input_to_zero() {
        assert_eq!(state(true, " 15 ").days_value(), 15);
        assert_eq!(state(true, "").days_value(), 0);
        assert_eq!(state(true, "abc").days_value(), 0);
        assert_eq!(state(true, "-3").days_value(), 0);
    }
}
