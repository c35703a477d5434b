//! Mailbox records, partial updates and the remote procedures that change them.

mod api;
mod types;

pub use api::{InMemoryMailboxApi, MailboxApi, RunAutoClose, UpdateMailbox};
pub use types::{AutoCloseReport, AutoCloseRequest, Mailbox, MailboxPreferences, MailboxUpdate};

/// Name of the cached `mailbox.get` query.
pub const MAILBOX_QUERY: &str = "mailbox.get";

/// Cache parameters identifying one mailbox.
pub fn mailbox_params(slug: &str) -> serde_json::Value {
    serde_json::json!({ "mailboxSlug": slug })
}
