use std::sync::Arc;
use std::time::Duration;

use crate::cache::{InvalidationTarget, QueryCache};
use crate::config::Config;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::mailbox::{mailbox_params, MailboxApi, UpdateMailbox, MAILBOX_QUERY};
use crate::mutation::{SettingsMutation, SettingsMutationOptions, DEFAULT_FALLBACK_ERROR};
use crate::notify::NotificationSink;

/// Shared infrastructure handed to every panel. Panels reference these,
/// they never own them.
#[derive(Clone)]
pub struct SettingsContext {
    pub api: Arc<dyn MailboxApi>,
    pub cache: QueryCache,
    pub toasts: Arc<dyn NotificationSink>,
    pub debounce: Duration,
    pub fallback_error: String,
}

impl SettingsContext {
    pub fn new(
        api: Arc<dyn MailboxApi>,
        cache: QueryCache,
        toasts: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            api,
            cache,
            toasts,
            debounce: DEFAULT_DEBOUNCE,
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
        }
    }

    pub fn from_config(
        api: Arc<dyn MailboxApi>,
        cache: QueryCache,
        toasts: Arc<dyn NotificationSink>,
        config: &Config,
    ) -> Self {
        Self {
            debounce: config.settings.debounce(),
            fallback_error: config.toasts.fallback_error.clone(),
            ..Self::new(api, cache, toasts)
        }
    }

    /// Overrides the quiet period panels wait before saving an edit.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Invalidation of the cached `mailbox.get` for `slug`.
    pub fn mailbox_target(&self, slug: &str) -> InvalidationTarget {
        InvalidationTarget::new(
            Arc::new(self.cache.query(MAILBOX_QUERY)),
            mailbox_params(slug),
        )
    }

    /// A `mailbox.update` coordinator that refreshes the mailbox on success.
    pub(crate) fn update_mailbox(
        &self,
        slug: &str,
        error_title: &str,
    ) -> SettingsMutation<UpdateMailbox> {
        let options = SettingsMutationOptions::new(error_title)
            .invalidate(self.mailbox_target(slug))
            .fallback_error(self.fallback_error.clone());
        SettingsMutation::new(
            Arc::new(UpdateMailbox::new(Arc::clone(&self.api))),
            options,
            Arc::clone(&self.toasts),
        )
    }
}
