use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MailboxPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confetti: Option<bool>,
}

/// A support mailbox as returned by `mailbox.get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub auto_close_enabled: bool,
    #[serde(default)]
    pub auto_close_days_of_inactivity: Option<u32>,
    #[serde(default)]
    pub preferences: MailboxPreferences,
}

impl Mailbox {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            auto_close_enabled: false,
            auto_close_days_of_inactivity: None,
            preferences: MailboxPreferences::default(),
        }
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: &MailboxUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(enabled) = update.auto_close_enabled {
            self.auto_close_enabled = enabled;
        }
        if let Some(days) = update.auto_close_days_of_inactivity {
            self.auto_close_days_of_inactivity = Some(days);
        }
        if let Some(preferences) = &update.preferences {
            if preferences.confetti.is_some() {
                self.preferences.confetti = preferences.confetti;
            }
        }
    }
}

/// Partial update for `mailbox.update`. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxUpdate {
    pub mailbox_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close_days_of_inactivity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<MailboxPreferences>,
}

impl MailboxUpdate {
    pub fn for_mailbox(slug: impl Into<String>) -> Self {
        Self {
            mailbox_slug: slug.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCloseRequest {
    pub mailbox_slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCloseReport {
    pub mailbox_slug: String,
    pub closed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_serializes_only_present_fields() {
        let update = MailboxUpdate {
            auto_close_enabled: Some(true),
            auto_close_days_of_inactivity: Some(15),
            ..MailboxUpdate::for_mailbox("gumroad")
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "mailboxSlug": "gumroad",
                "autoCloseEnabled": true,
                "autoCloseDaysOfInactivity": 15
            })
        );
    }

    #[test]
    fn apply_leaves_absent_fields() {
        let mut mailbox = Mailbox::new("gumroad", "Gumroad");
        mailbox.auto_close_days_of_inactivity = Some(30);

        mailbox.apply(&MailboxUpdate {
            name: Some("Support".to_string()),
            ..MailboxUpdate::for_mailbox("gumroad")
        });

        assert_eq!(mailbox.name, "Support");
        assert_eq!(mailbox.auto_close_days_of_inactivity, Some(30));
        assert!(!mailbox.auto_close_enabled);
    }

    #[test]
    fn apply_sets_confetti_preference() {
        let mut mailbox = Mailbox::new("gumroad", "Gumroad");
        mailbox.apply(&MailboxUpdate {
            preferences: Some(MailboxPreferences {
                confetti: Some(true),
            }),
            ..MailboxUpdate::for_mailbox("gumroad")
        });
        assert_eq!(mailbox.preferences.confetti, Some(true));
    }

    #[test]
    fn mailbox_deserializes_with_defaults() {
        let mailbox: Mailbox =
            serde_json::from_value(json!({"slug": "gumroad", "name": "Gumroad"})).unwrap();
        assert!(!mailbox.auto_close_enabled);
        assert_eq!(mailbox.auto_close_days_of_inactivity, None);
        assert_eq!(mailbox.preferences.confetti, None);
    }
}
