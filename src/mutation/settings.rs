//! Settings mutation coordinator: one remote write plus its save indicator,
//! cache invalidations and toasts.

use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::error::MutationError;
use super::handle::{ErrorCallback, Mutation, MutationCallbacks, MutationHandle, SuccessCallback};
use crate::cache::InvalidationTarget;
use crate::indicator::{SaveState, SavingIndicator};
use crate::notify::{NotificationSink, Toast};

/// Description used when a failed mutation carries no message.
pub const DEFAULT_FALLBACK_ERROR: &str = "An error occurred";

/// Construction options for [`SettingsMutation`].
pub struct SettingsMutationOptions<M: Mutation> {
    /// Title of the destructive toast shown on failure.
    pub error_title: String,
    pub invalidate: Vec<InvalidationTarget>,
    pub success_toast: Option<Toast>,
    pub fallback_error: String,
    pub on_success: Option<SuccessCallback<M::Output, M::Variables>>,
    pub on_error: Option<ErrorCallback<M::Variables>>,
}

impl<M: Mutation> SettingsMutationOptions<M> {
    pub fn new(error_title: impl Into<String>) -> Self {
        Self {
            error_title: error_title.into(),
            invalidate: Vec::new(),
            success_toast: None,
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
            on_success: None,
            on_error: None,
        }
    }

    pub fn invalidate(mut self, target: InvalidationTarget) -> Self {
        self.invalidate.push(target);
        self
    }

    pub fn success_toast(mut self, toast: Toast) -> Self {
        self.success_toast = Some(toast);
        self
    }

    pub fn fallback_error(mut self, description: impl Into<String>) -> Self {
        self.fallback_error = description.into();
        self
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&M::Output, &M::Variables) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&MutationError, &M::Variables) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }
}

/// Wraps a [`Mutation`] with a [`SavingIndicator`].
///
/// Overlapping `save` calls are not deduplicated: each call resets the
/// indicator to `Saving` and the terminal state is set by whichever call
/// resolves last. Callers that need one save at a time debounce upstream.
pub struct SettingsMutation<M: Mutation> {
    mutation: MutationHandle<M>,
    indicator: SavingIndicator,
}

impl<M: Mutation> Clone for SettingsMutation<M> {
    fn clone(&self) -> Self {
        Self {
            mutation: self.mutation.clone(),
            indicator: self.indicator.clone(),
        }
    }
}

impl<M: Mutation> SettingsMutation<M> {
    pub fn new(
        mutation: Arc<M>,
        options: SettingsMutationOptions<M>,
        toasts: Arc<dyn NotificationSink>,
    ) -> Self {
        let indicator = SavingIndicator::new();
        let SettingsMutationOptions {
            error_title,
            invalidate,
            success_toast,
            fallback_error,
            on_success,
            on_error,
        } = options;

        let success_indicator = indicator.clone();
        let success_toasts = Arc::clone(&toasts);
        let handle_success: SuccessCallback<M::Output, M::Variables> =
            Arc::new(move |data: &M::Output, variables: &M::Variables| {
                for target in &invalidate {
                    target.run();
                }
                success_indicator.set_state(SaveState::Saved);
                tracing::info!(invalidated = invalidate.len(), "Settings saved");

                if let Some(toast) = &success_toast {
                    success_toasts.notify(toast.clone());
                }
                if let Some(on_success) = &on_success {
                    on_success(data, variables);
                }
            });

        let error_indicator = indicator.clone();
        let handle_error: ErrorCallback<M::Variables> =
            Arc::new(move |error: &MutationError, variables: &M::Variables| {
                error_indicator.set_state(SaveState::Error);
                tracing::warn!(error = %error, "Settings save failed");

                let toast = Toast::new(error_title.as_str())
                    .with_description(error.describe(&fallback_error))
                    .destructive();
                toasts.notify(toast);
                if let Some(on_error) = &on_error {
                    on_error(error, variables);
                }
            });

        let callbacks = MutationCallbacks {
            on_success: Some(handle_success),
            on_error: Some(handle_error),
        };

        Self {
            mutation: MutationHandle::new(mutation, callbacks),
            indicator,
        }
    }

    /// Marks the indicator `Saving` and starts the mutation.
    ///
    /// The returned task resolves after the success or error path has run.
    /// Dropping it does not cancel the save.
    pub fn save(&self, variables: M::Variables) -> JoinHandle<()> {
        let span = tracing::info_span!("settings_save", save_id = %Uuid::new_v4());
        let _enter = span.enter();
        self.indicator.set_state(SaveState::Saving);
        tracing::debug!("Settings save started");
        self.mutation.mutate(variables)
    }

    pub fn state(&self) -> SaveState {
        self.indicator.state()
    }

    pub fn indicator(&self) -> &SavingIndicator {
        &self.indicator
    }

    /// The underlying mutation handle, for callers that need `is_pending`
    /// or want to mutate without touching the indicator.
    pub fn mutation(&self) -> &MutationHandle<M> {
        &self.mutation
    }

    pub fn is_pending(&self) -> bool {
        self.mutation.is_pending()
    }
}
