//! Mailbox settings panels.
//!
//! Each panel owns its editable state, one [`SettingsMutation`] with its
//! save indicator and, for text-like inputs, a debounced change trigger.
//!
//! [`SettingsMutation`]: crate::mutation::SettingsMutation

mod auto_close;
mod confetti;
mod context;
mod mailbox_name;
pub mod mvi;

pub use auto_close::{
    AutoCloseIntent, AutoCloseReducer, AutoCloseSetting, AutoCloseState, AUTO_CLOSE_ERROR_TITLE,
    AUTO_CLOSE_FALLBACK, AUTO_CLOSE_TRIGGERED,
};
pub use confetti::{ConfettiIntent, ConfettiReducer, ConfettiSetting, ConfettiState};
pub use context::SettingsContext;
pub use mailbox_name::{
    MailboxNameIntent, MailboxNameReducer, MailboxNameSetting, MailboxNameState,
    PREFERENCES_ERROR_TITLE,
};
