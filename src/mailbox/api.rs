use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::types::{AutoCloseReport, AutoCloseRequest, Mailbox, MailboxUpdate};
use crate::mutation::{Mutation, MutationError};

const AUTO_CLOSE_DISABLED: &str = "Auto-close is not enabled for this mailbox";

/// Remote mailbox procedures used by the settings panels.
#[async_trait]
pub trait MailboxApi: Send + Sync {
    async fn get(&self, slug: &str) -> Result<Mailbox, MutationError>;
    async fn update(&self, update: MailboxUpdate) -> Result<Mailbox, MutationError>;
    async fn auto_close(&self, req: AutoCloseRequest) -> Result<AutoCloseReport, MutationError>;
}

#[derive(Default)]
struct Store {
    mailboxes: HashMap<String, Mailbox>,
    /// Idle days of each open conversation, per mailbox.
    open_conversations: HashMap<String, Vec<u32>>,
    updates: Vec<MailboxUpdate>,
    failures: VecDeque<MutationError>,
}

/// Mailbox API backed by process memory.
///
/// Every call waits `latency` first. Errors queued with [`fail_next`] are
/// returned, one per call, before any validation runs.
///
/// [`fail_next`]: InMemoryMailboxApi::fail_next
#[derive(Default)]
pub struct InMemoryMailboxApi {
    store: Mutex<Store>,
    latency: Duration,
}

impl InMemoryMailboxApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_mailbox(self, mailbox: Mailbox) -> Self {
        self.store
            .lock()
            .mailboxes
            .insert(mailbox.slug.clone(), mailbox);
        self
    }

    pub fn with_open_conversations(self, slug: &str, idle_days: Vec<u32>) -> Self {
        self.store
            .lock()
            .open_conversations
            .insert(slug.to_string(), idle_days);
        self
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: MutationError) {
        self.store.lock().failures.push_back(error);
    }

    /// Every update accepted so far, oldest first.
    pub fn updates(&self) -> Vec<MailboxUpdate> {
        self.store.lock().updates.clone()
    }

    pub fn mailbox(&self, slug: &str) -> Option<Mailbox> {
        self.store.lock().mailboxes.get(slug).cloned()
    }

    pub fn open_conversations(&self, slug: &str) -> usize {
        self.store
            .lock()
            .open_conversations
            .get(slug)
            .map_or(0, Vec::len)
    }

    async fn wait(&self) -> Result<(), MutationError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.store.lock().failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn validate(update: &MailboxUpdate) -> Result<(), MutationError> {
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(MutationError::new("Mailbox name cannot be empty"));
        }
    }
    if let Some(days) = update.auto_close_days_of_inactivity {
        if days < 1 {
            return Err(MutationError::new("Days of inactivity must be at least 1"));
        }
    }
    Ok(())
}

fn not_found(slug: &str) -> MutationError {
    MutationError::new(format!("Mailbox '{}' not found", slug))
}

#[async_trait]
impl MailboxApi for InMemoryMailboxApi {
    async fn get(&self, slug: &str) -> Result<Mailbox, MutationError> {
        self.wait().await?;
        self.mailbox(slug).ok_or_else(|| not_found(slug))
    }

    async fn update(&self, update: MailboxUpdate) -> Result<Mailbox, MutationError> {
        self.wait().await?;
        validate(&update)?;

        let mut store = self.store.lock();
        let mailbox = store
            .mailboxes
            .get_mut(&update.mailbox_slug)
            .ok_or_else(|| not_found(&update.mailbox_slug))?;
        mailbox.apply(&update);
        let updated = mailbox.clone();
        store.updates.push(update);

        tracing::debug!(mailbox = %updated.slug, "Mailbox updated");
        Ok(updated)
    }

    async fn auto_close(&self, req: AutoCloseRequest) -> Result<AutoCloseReport, MutationError> {
        self.wait().await?;

        let mut store = self.store.lock();
        let mailbox = store
            .mailboxes
            .get(&req.mailbox_slug)
            .ok_or_else(|| not_found(&req.mailbox_slug))?;
        if !mailbox.auto_close_enabled {
            return Err(MutationError::new(AUTO_CLOSE_DISABLED));
        }
        let threshold = mailbox.auto_close_days_of_inactivity.unwrap_or(30);

        let open = store
            .open_conversations
            .entry(req.mailbox_slug.clone())
            .or_default();
        let before = open.len();
        open.retain(|&idle| idle < threshold);
        let closed = before - open.len();

        tracing::info!(mailbox = %req.mailbox_slug, closed, "Auto-close ran");
        Ok(AutoCloseReport {
            mailbox_slug: req.mailbox_slug,
            closed,
        })
    }
}

/// `mailbox.update` as a [`Mutation`].
pub struct UpdateMailbox {
    api: Arc<dyn MailboxApi>,
}

impl UpdateMailbox {
    pub fn new(api: Arc<dyn MailboxApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Mutation for UpdateMailbox {
    type Variables = MailboxUpdate;
    type Output = Mailbox;

    async fn execute(&self, variables: MailboxUpdate) -> Result<Mailbox, MutationError> {
        self.api.update(variables).await
    }
}

/// `mailbox.autoClose` as a [`Mutation`].
pub struct RunAutoClose {
    api: Arc<dyn MailboxApi>,
}

impl RunAutoClose {
    pub fn new(api: Arc<dyn MailboxApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Mutation for RunAutoClose {
    type Variables = AutoCloseRequest;
    type Output = AutoCloseReport;

    async fn execute(&self, request: AutoCloseRequest) -> Result<AutoCloseReport, MutationError> {
        self.api.auto_close(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> InMemoryMailboxApi {
        InMemoryMailboxApi::new().with_mailbox(Mailbox::new("gumroad", "Gumroad"))
    }

    #[tokio::test]
    async fn update_applies_and_records() {
        let api = api();
        let updated = api
            .update(MailboxUpdate {
                name: Some("Support".to_string()),
                ..MailboxUpdate::for_mailbox("gumroad")
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Support");
        assert_eq!(api.updates().len(), 1);
    }

    #[tokio::test]
    async fn update_unknown_mailbox_fails() {
        let err = api()
            .update(MailboxUpdate::for_mailbox("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), Some("Mailbox 'missing' not found"));
    }

    #[tokio::test]
    async fn update_rejects_zero_days() {
        let api = api();
        let err = api
            .update(MailboxUpdate {
                auto_close_days_of_inactivity: Some(0),
                ..MailboxUpdate::for_mailbox("gumroad")
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), Some("Days of inactivity must be at least 1"));
        assert!(api.updates().is_empty());
    }

    #[tokio::test]
    async fn queued_failure_is_returned_once() {
        let api = api();
        api.fail_next(MutationError::opaque());
        assert!(api.get("gumroad").await.is_err());
        assert!(api.get("gumroad").await.is_ok());
    }

    #[tokio::test]
    async fn auto_close_requires_enabled() {
        let err = api()
            .auto_close(AutoCloseRequest {
                mailbox_slug: "gumroad".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), Some(AUTO_CLOSE_DISABLED));
    }

    #[tokio::test]
    async fn auto_close_closes_idle_conversations() {
        let mut mailbox = Mailbox::new("gumroad", "Gumroad");
        mailbox.auto_close_enabled = true;
        mailbox.auto_close_days_of_inactivity = Some(15);
        let api = InMemoryMailboxApi::new()
            .with_mailbox(mailbox)
            .with_open_conversations("gumroad", vec![3, 15, 40]);

        let report = api
            .auto_close(AutoCloseRequest {
                mailbox_slug: "gumroad".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(report.closed, 2);
        assert_eq!(api.open_conversations("gumroad"), 1);
    }
}
