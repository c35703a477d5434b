//! Remote mutations and the coordinators that report on them.
//!
//! - [`MutationHandle`] binds a [`Mutation`] to success/error callbacks.
//! - [`SettingsMutation`] drives a save indicator, invalidates cached
//!   queries and toasts on failure.
//! - [`MutationWithToast`] toasts on both outcomes and has no indicator.

mod error;
mod handle;
mod settings;
mod with_toast;

pub use error::MutationError;
pub use handle::{ErrorCallback, Mutation, MutationCallbacks, MutationHandle, SuccessCallback};
pub use settings::{SettingsMutation, SettingsMutationOptions, DEFAULT_FALLBACK_ERROR};
pub use with_toast::{
    MutationWithToast, MutationWithToastOptions, OnError, OnSuccess, ERROR_TITLE, SUCCESS_TITLE,
};
