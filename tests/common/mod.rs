//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mailbox_settings::cache::{Invalidate, QueryCache};
use mailbox_settings::mailbox::{InMemoryMailboxApi, Mailbox};
use mailbox_settings::mutation::{Mutation, MutationError};
use mailbox_settings::notify::ToastQueue;
use mailbox_settings::settings::SettingsContext;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub const SLUG: &str = "gumroad";

/// Scripted outcome of one mutation call.
pub struct Outcome {
    pub delay: Duration,
    pub result: Result<String, MutationError>,
}

impl Outcome {
    pub fn ok_after(delay: Duration, output: &str) -> Self {
        Self {
            delay,
            result: Ok(output.to_string()),
        }
    }

    pub fn err_after(delay: Duration, error: MutationError) -> Self {
        Self {
            delay,
            result: Err(error),
        }
    }
}

/// Mutation that records its variables and replays queued outcomes.
///
/// With nothing queued it succeeds immediately, echoing the variables.
#[derive(Default)]
pub struct ScriptedMutation {
    calls: Mutex<Vec<String>>,
    outcomes: Mutex<VecDeque<Outcome>>,
}

impl ScriptedMutation {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, outcome: Outcome) {
        self.outcomes.lock().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Mutation for ScriptedMutation {
    type Variables = String;
    type Output = String;

    async fn execute(&self, variables: String) -> Result<String, MutationError> {
        self.calls.lock().push(variables.clone());
        let outcome = self.outcomes.lock().pop_front();
        match outcome {
            Some(outcome) => {
                tokio::time::sleep(outcome.delay).await;
                outcome.result
            }
            None => Ok(format!("saved {}", variables)),
        }
    }
}

/// Invalidation target that counts calls.
#[derive(Default)]
pub struct CountingQuery {
    calls: Mutex<Vec<Value>>,
}

impl CountingQuery {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn params(&self) -> Vec<Value> {
        self.calls.lock().clone()
    }
}

impl Invalidate for CountingQuery {
    fn invalidate(&self, params: &Value) {
        self.calls.lock().push(params.clone());
    }
}

/// Every save-state transition logged by an indicator, in order.
#[derive(Clone, Default)]
pub struct StateLog(Arc<Mutex<Vec<String>>>);

impl StateLog {
    /// Records on the current thread until the guard drops.
    pub fn install() -> (Self, DefaultGuard) {
        let log = Self::default();
        let subscriber = tracing_subscriber::registry().with(log.clone());
        (log, tracing::subscriber::set_default(subscriber))
    }

    pub fn states(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

struct NextState(Option<String>);

impl Visit for NextState {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "to" {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

impl<S: Subscriber> Layer<S> for StateLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "mailbox_settings::indicator" {
            return;
        }
        let mut next = NextState(None);
        event.record(&mut next);
        if let Some(state) = next.0 {
            self.0.lock().push(state);
        }
    }
}

/// Mailbox API, cache, toast queue and panel context wired together.
pub struct Harness {
    pub api: Arc<InMemoryMailboxApi>,
    pub cache: QueryCache,
    pub toasts: ToastQueue,
    pub ctx: SettingsContext,
}

impl Harness {
    pub fn new(mailbox: Mailbox) -> Self {
        Self::with_api(InMemoryMailboxApi::new().with_mailbox(mailbox))
    }

    pub fn with_api(api: InMemoryMailboxApi) -> Self {
        let api = Arc::new(api);
        let cache = QueryCache::new();
        let toasts = ToastQueue::new();
        let ctx = SettingsContext::new(api.clone(), cache.clone(), Arc::new(toasts.clone()));
        Self {
            api,
            cache,
            toasts,
            ctx,
        }
    }
}

pub fn mailbox() -> Mailbox {
    Mailbox::new(SLUG, "Gumroad")
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
