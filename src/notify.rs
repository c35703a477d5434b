//! Toast notifications emitted by mutation coordinators.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::Default,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn destructive(mut self) -> Self {
        self.variant = ToastVariant::Destructive;
        self
    }
}

/// Receives toasts. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Sink that writes every toast to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingToasts;

impl NotificationSink for TracingToasts {
    fn notify(&self, toast: Toast) {
        let description = toast.description.as_deref().unwrap_or("");
        match toast.variant {
            ToastVariant::Default => {
                tracing::info!(title = %toast.title, description, "Toast");
            }
            ToastVariant::Destructive => {
                tracing::warn!(title = %toast.title, description, "Toast");
            }
        }
    }
}

/// Sink that keeps toasts in memory until drained.
///
/// Optionally forwards each toast to another sink as well.
#[derive(Clone, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
    forward: Option<Arc<dyn NotificationSink>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forwarding_to(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            toasts: Arc::default(),
            forward: Some(sink),
        }
    }

    /// Snapshot of the queued toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock())
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.lock().is_empty()
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, toast: Toast) {
        if let Some(forward) = &self.forward {
            forward.notify(toast.clone());
        }
        self.toasts.lock().push(toast);
    }
}
