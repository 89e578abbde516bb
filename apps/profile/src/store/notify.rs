use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// Non-blocking user-facing report of a background sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

/// What an edit did, for notification wording ("Education" + "added").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditLabel {
    pub subject: &'static str,
    pub verb: &'static str,
}

impl EditLabel {
    pub const fn new(subject: &'static str, verb: &'static str) -> Self {
        Self { subject, verb }
    }

    pub fn synced(&self) -> Notification {
        Notification {
            level: NotificationLevel::Success,
            title: format!("{} {}", self.subject, self.verb),
            message: format!("{} {} and synced with server", self.subject, self.verb),
        }
    }

    pub fn local_only(&self) -> Notification {
        Notification {
            level: NotificationLevel::Warning,
            title: "Warning".to_string(),
            message: format!(
                "{} {} locally, but failed to sync with server",
                self.subject, self.verb
            ),
        }
    }

    pub fn failed(&self, reason: &str) -> Notification {
        Notification {
            level: NotificationLevel::Error,
            title: format!("{} sync failed", self.subject),
            message: format!(
                "{} {} locally, but every server update attempt failed: {reason}",
                self.subject, self.verb
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wording() {
        let label = EditLabel::new("Education", "added");
        assert_eq!(label.synced().title, "Education added");
        assert_eq!(
            label.local_only().message,
            "Education added locally, but failed to sync with server"
        );
        assert_eq!(label.failed("down").level, NotificationLevel::Error);
    }
}
