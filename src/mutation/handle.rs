use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::error::MutationError;

/// A remote write operation.
#[async_trait]
pub trait Mutation: Send + Sync + 'static {
    type Variables: Clone + Send + Sync + 'static;
    type Output: Send + Sync + 'static;

    async fn execute(&self, variables: Self::Variables) -> Result<Self::Output, MutationError>;
}

pub type SuccessCallback<O, V> = Arc<dyn Fn(&O, &V) + Send + Sync>;
pub type ErrorCallback<V> = Arc<dyn Fn(&MutationError, &V) + Send + Sync>;

/// Callbacks invoked when a mutation resolves.
pub struct MutationCallbacks<M: Mutation> {
    pub on_success: Option<SuccessCallback<M::Output, M::Variables>>,
    pub on_error: Option<ErrorCallback<M::Variables>>,
}

impl<M: Mutation> Default for MutationCallbacks<M> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }
}

impl<M: Mutation> Clone for MutationCallbacks<M> {
    fn clone(&self) -> Self {
        Self {
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

/// A mutation bound to its callbacks.
///
/// `mutate` spawns the call on the current tokio runtime and returns
/// immediately. Exactly one callback runs per call. Calls are never
/// cancelled once started.
pub struct MutationHandle<M: Mutation> {
    mutation: Arc<M>,
    callbacks: MutationCallbacks<M>,
    in_flight: Arc<AtomicUsize>,
}

impl<M: Mutation> Clone for MutationHandle<M> {
    fn clone(&self) -> Self {
        Self {
            mutation: Arc::clone(&self.mutation),
            callbacks: self.callbacks.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<M: Mutation> MutationHandle<M> {
    pub fn new(mutation: Arc<M>, callbacks: MutationCallbacks<M>) -> Self {
        Self {
            mutation,
            callbacks,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Starts the mutation. The returned handle may be awaited or dropped.
    ///
    /// Must be called from within a tokio runtime. The spawned task stays in
    /// the caller's current span.
    pub fn mutate(&self, variables: M::Variables) -> JoinHandle<()> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let mutation = Arc::clone(&self.mutation);
        let callbacks = self.callbacks.clone();

        let task = async move {
            let result = mutation.execute(variables.clone()).await;
            // Pending ends before callbacks run so they observe the settled handle.
            drop(guard);
            match result {
                Ok(output) => {
                    if let Some(on_success) = &callbacks.on_success {
                        on_success(&output, &variables);
                    }
                }
                Err(err) => {
                    if let Some(on_error) = &callbacks.on_error {
                        on_error(&err, &variables);
                    }
                }
            }
        };
        tokio::spawn(task.in_current_span())
    }

    /// True while at least one call has not resolved.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
