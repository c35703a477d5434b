//! One-shot mutations (actions, not settings) that report through toasts only.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::error::MutationError;
use super::handle::{ErrorCallback, Mutation, MutationCallbacks, MutationHandle, SuccessCallback};
use super::settings::DEFAULT_FALLBACK_ERROR;
use crate::cache::InvalidationTarget;
use crate::notify::{NotificationSink, Toast};

pub const SUCCESS_TITLE: &str = "Success";
pub const ERROR_TITLE: &str = "Error";

pub struct OnSuccess<M: Mutation> {
    pub message: Option<String>,
    pub action: Option<SuccessCallback<M::Output, M::Variables>>,
    pub invalidate: Vec<InvalidationTarget>,
}

impl<M: Mutation> Default for OnSuccess<M> {
    fn default() -> Self {
        Self {
            message: None,
            action: None,
            invalidate: Vec::new(),
        }
    }
}

pub struct OnError<M: Mutation> {
    pub fallback_message: Option<String>,
    pub action: Option<ErrorCallback<M::Variables>>,
}

impl<M: Mutation> Default for OnError<M> {
    fn default() -> Self {
        Self {
            fallback_message: None,
            action: None,
        }
    }
}

pub struct MutationWithToastOptions<M: Mutation> {
    pub on_success: OnSuccess<M>,
    pub on_error: OnError<M>,
}

impl<M: Mutation> Default for MutationWithToastOptions<M> {
    fn default() -> Self {
        Self {
            on_success: OnSuccess::default(),
            on_error: OnError::default(),
        }
    }
}

impl<M: Mutation> MutationWithToastOptions<M> {
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.on_success.message = Some(message.into());
        self
    }

    pub fn invalidate(mut self, target: InvalidationTarget) -> Self {
        self.on_success.invalidate.push(target);
        self
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&M::Output, &M::Variables) + Send + Sync + 'static,
    {
        self.on_success.action = Some(Arc::new(f));
        self
    }

    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.on_error.fallback_message = Some(message.into());
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&MutationError, &M::Variables) + Send + Sync + 'static,
    {
        self.on_error.action = Some(Arc::new(f));
        self
    }
}

/// A mutation that shows a "Success" or "Error" toast when it resolves.
pub struct MutationWithToast<M: Mutation> {
    mutation: MutationHandle<M>,
}

impl<M: Mutation> Clone for MutationWithToast<M> {
    fn clone(&self) -> Self {
        Self {
            mutation: self.mutation.clone(),
        }
    }
}

impl<M: Mutation> MutationWithToast<M> {
    pub fn new(
        mutation: Arc<M>,
        options: MutationWithToastOptions<M>,
        toasts: Arc<dyn NotificationSink>,
    ) -> Self {
        let MutationWithToastOptions {
            on_success,
            on_error,
        } = options;

        let success_toasts = Arc::clone(&toasts);
        let handle_success: SuccessCallback<M::Output, M::Variables> =
            Arc::new(move |data: &M::Output, variables: &M::Variables| {
                for target in &on_success.invalidate {
                    target.run();
                }
                if let Some(message) = &on_success.message {
                    success_toasts.notify(Toast::new(SUCCESS_TITLE).with_description(message));
                }
                if let Some(action) = &on_success.action {
                    action(data, variables);
                }
            });

        let fallback = on_error
            .fallback_message
            .unwrap_or_else(|| DEFAULT_FALLBACK_ERROR.to_string());
        let error_action = on_error.action;
        let handle_error: ErrorCallback<M::Variables> =
            Arc::new(move |error: &MutationError, variables: &M::Variables| {
                tracing::warn!(error = %error, "Mutation failed");
                let toast = Toast::new(ERROR_TITLE)
                    .with_description(error.describe(&fallback))
                    .destructive();
                toasts.notify(toast);
                if let Some(action) = &error_action {
                    action(error, variables);
                }
            });

        let callbacks = MutationCallbacks {
            on_success: Some(handle_success),
            on_error: Some(handle_error),
        };

        Self {
            mutation: MutationHandle::new(mutation, callbacks),
        }
    }

    pub fn mutate(&self, variables: M::Variables) -> JoinHandle<()> {
        self.mutation.mutate(variables)
    }

    pub fn is_pending(&self) -> bool {
        self.mutation.is_pending()
    }
}
