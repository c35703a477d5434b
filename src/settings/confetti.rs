use tokio::task::JoinHandle;

use super::context::SettingsContext;
use super::mailbox_name::PREFERENCES_ERROR_TITLE;
use super::mvi::{PanelIntent, PanelState, Reducer};
use crate::indicator::{SaveState, SavingIndicator};
use crate::mailbox::{Mailbox, MailboxPreferences, MailboxUpdate, UpdateMailbox};
use crate::mutation::SettingsMutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfettiState {
    pub enabled: bool,
}

impl PanelState for ConfettiState {}

#[derive(Debug, Clone, Copy)]
pub enum ConfettiIntent {
    Toggle(bool),
}

impl PanelIntent for ConfettiIntent {}

pub struct ConfettiReducer;

impl Reducer for ConfettiReducer {
    type State = ConfettiState;
    type Intent = ConfettiIntent;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ConfettiIntent::Toggle(enabled) => ConfettiState { enabled },
        }
    }
}

/// Confetti-on-close preference. A switch, so every toggle saves right away.
pub struct ConfettiSetting {
    slug: String,
    state: ConfettiState,
    settings: SettingsMutation<UpdateMailbox>,
}

impl ConfettiSetting {
    pub fn mount(mailbox: &Mailbox, ctx: &SettingsContext) -> Self {
        Self {
            slug: mailbox.slug.clone(),
            state: ConfettiState {
                enabled: mailbox.preferences.confetti.unwrap_or(false),
            },
            settings: ctx.update_mailbox(&mailbox.slug, PREFERENCES_ERROR_TITLE),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) -> JoinHandle<()> {
        self.state = ConfettiReducer::reduce(self.state, ConfettiIntent::Toggle(enabled));
        self.settings.save(MailboxUpdate {
            preferences: Some(MailboxPreferences {
                confetti: Some(self.state.enabled),
            }),
            ..MailboxUpdate::for_mailbox(self.slug.as_str())
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn save_state(&self) -> SaveState {
        self.settings.state()
    }

    pub fn indicator(&self) -> &SavingIndicator {
        self.settings.indicator()
    }
}
