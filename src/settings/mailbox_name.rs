use std::sync::Arc;

use parking_lot::Mutex;

use super::context::SettingsContext;
use super::mvi::{PanelIntent, PanelState, Reducer};
use crate::debounce::DebouncedChangeTrigger;
use crate::indicator::{SaveState, SavingIndicator};
use crate::mailbox::{Mailbox, MailboxUpdate, UpdateMailbox};
use crate::mutation::SettingsMutation;

pub const PREFERENCES_ERROR_TITLE: &str = "Error updating preferences";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxNameState {
    pub name: String,
}

impl PanelState for MailboxNameState {}

#[derive(Debug, Clone)]
pub enum MailboxNameIntent {
    SetName(String),
}

impl PanelIntent for MailboxNameIntent {}

pub struct MailboxNameReducer;

impl Reducer for MailboxNameReducer {
    type State = MailboxNameState;
    type Intent = MailboxNameIntent;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            MailboxNameIntent::SetName(name) => MailboxNameState { name },
        }
    }
}

/// Mailbox display name, saved once typing pauses.
pub struct MailboxNameSetting {
    state: Arc<Mutex<MailboxNameState>>,
    settings: SettingsMutation<UpdateMailbox>,
    trigger: DebouncedChangeTrigger<MailboxNameState>,
}

impl MailboxNameSetting {
    pub fn mount(mailbox: &Mailbox, ctx: &SettingsContext) -> Self {
        let initial = MailboxNameState {
            name: mailbox.name.clone(),
        };
        let state = Arc::new(Mutex::new(initial.clone()));
        let settings = ctx.update_mailbox(&mailbox.slug, PREFERENCES_ERROR_TITLE);

        let mut trigger = {
            let slug = mailbox.slug.clone();
            let state = Arc::clone(&state);
            let settings = settings.clone();
            DebouncedChangeTrigger::new(ctx.debounce, move || {
                let name = state.lock().name.clone();
                settings.save(MailboxUpdate {
                    name: Some(name),
                    ..MailboxUpdate::for_mailbox(slug.as_str())
                });
            })
        };
        trigger.observe(&initial);

        Self {
            state,
            settings,
            trigger,
        }
    }

    pub fn dispatch(&mut self, intent: MailboxNameIntent) {
        let next = {
            let mut state = self.state.lock();
            let next = MailboxNameReducer::reduce(state.clone(), intent);
            *state = next.clone();
            next
        };
        self.trigger.observe(&next);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.dispatch(MailboxNameIntent::SetName(name.into()));
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    pub fn save_state(&self) -> SaveState {
        self.settings.state()
    }

    pub fn indicator(&self) -> &SavingIndicator {
        self.settings.indicator()
    }

    pub fn is_save_scheduled(&self) -> bool {
        self.trigger.is_pending()
    }

    pub fn teardown(&self) {
        self.trigger.teardown();
    }
}
