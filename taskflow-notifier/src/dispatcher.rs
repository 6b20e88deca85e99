/// Due-date reminder dispatcher
///
/// This module implements the notification batch: select tasks due within
/// the next 24 hours that are open and un-notified, and send at most one
/// reminder email per task.
///
/// # Per-task flow
///
/// ```text
/// candidate
///   ├─> owner disabled notifications  → skip (logged)
///   ├─> owner has no email address    → skip (logged)
///   ├─> delivery succeeds             → notification_sent = true
///   └─> delivery fails                → logged; flag stays false,
///                                       task retried on the next run
/// ```
///
/// The `notification_sent` flag is only flipped after the mail transport
/// accepts the message, so running the dispatcher twice in a row sends
/// nothing the second time. Overlapping concurrent runs are not guarded
/// against; invocations are expected to be serialized by the external
/// scheduler.
///
/// # Example
///
/// ```no_run
/// use taskflow_notifier::dispatcher::Dispatcher;
/// use taskflow_notifier::mailer::MockMailer;
/// use chrono::Utc;
/// use std::sync::Arc;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = Arc::new(MockMailer::new());
/// let dispatcher = Dispatcher::new(pool, mailer, "TaskFlow <noreply@example.com>");
///
/// let report = dispatcher.run(Utc::now()).await?;
/// println!("Notified {} tasks", report.notified.len());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::mailer::{MailMessage, Mailer};
use taskflow_shared::models::task::{NotificationCandidate, Task};

/// Dispatcher error type
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Why a candidate was skipped without a delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The owner's profile disables email notifications
    NotificationsDisabled,

    /// The owner has no email address on file
    NoEmailAddress,
}

/// Outcome of one dispatcher run
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Number of candidate tasks examined
    pub examined: usize,

    /// Tasks whose reminder was delivered and flagged
    pub notified: Vec<Uuid>,

    /// Tasks skipped without a delivery attempt
    pub skipped: Vec<(Uuid, SkipReason)>,

    /// Tasks whose delivery failed (retried on the next run)
    pub failed: Vec<(Uuid, String)>,
}

/// Reminder batch dispatcher
pub struct Dispatcher {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    from_address: String,
}

impl Dispatcher {
    /// Creates a dispatcher sending from the given address
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>, from_address: impl Into<String>) -> Self {
        Dispatcher {
            pool,
            mailer,
            from_address: from_address.into(),
        }
    }

    /// Runs one reminder batch
    ///
    /// Selects tasks due in `(now, now + 24h]` that are open and
    /// un-notified, and processes each as described in the module docs.
    /// Delivery failures never abort the batch; database failures do.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Database`] if the candidate query or a
    /// flag update fails
    pub async fn run(&self, now: DateTime<Utc>) -> Result<DispatchReport, DispatchError> {
        let until = now + Duration::hours(24);
        let candidates = Task::due_for_notification(&self.pool, now, until).await?;

        info!(count = candidates.len(), "Found tasks to notify");

        let mut report = DispatchReport {
            examined: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            match skip_reason(&candidate) {
                Some(reason @ SkipReason::NotificationsDisabled) => {
                    info!(
                        task = %candidate.title,
                        user = %candidate.username,
                        "User has disabled notifications. Skipping."
                    );
                    report.skipped.push((candidate.task_id, reason));
                }
                Some(reason @ SkipReason::NoEmailAddress) => {
                    warn!(
                        task = %candidate.title,
                        user = %candidate.username,
                        "User has no email. Skipping."
                    );
                    report.skipped.push((candidate.task_id, reason));
                }
                None => {
                    let message = render_reminder(&candidate, &self.from_address);

                    match self.mailer.send(&message).await {
                        Ok(()) => {
                            Task::mark_notification_sent(&self.pool, candidate.task_id).await?;
                            info!(
                                task = %candidate.title,
                                recipient = %candidate.email,
                                "Sent notification"
                            );
                            report.notified.push(candidate.task_id);
                        }
                        Err(e) => {
                            error!(
                                task = %candidate.title,
                                error = %e,
                                "Failed to send email"
                            );
                            report.failed.push((candidate.task_id, e.to_string()));
                        }
                    }
                }
            }
        }

        Ok(report)
    }
}

/// Decides whether a candidate should be skipped without a delivery attempt
///
/// A missing profile row (`notifications_enabled = None`) counts as
/// notifications enabled.
pub fn skip_reason(candidate: &NotificationCandidate) -> Option<SkipReason> {
    if candidate.notifications_enabled == Some(false) {
        return Some(SkipReason::NotificationsDisabled);
    }

    if candidate.email.trim().is_empty() {
        return Some(SkipReason::NoEmailAddress);
    }

    None
}

/// Renders the reminder email for a candidate
pub fn render_reminder(candidate: &NotificationCandidate, from_address: &str) -> MailMessage {
    let subject = format!("Reminder: Task '{}' is due soon!", candidate.title);

    let body = format!(
        "Hello {username},\n\n\
         This is a reminder that your task \"{title}\" in project \"{project}\" \
         is due on {due} UTC.\n\n\
         Please make sure to complete it on time.\n\n\
         Best regards,\n\
         TaskFlow Team\n",
        username = candidate.username,
        title = candidate.title,
        project = candidate.project_name,
        due = candidate.due_date.format("%Y-%m-%d %H:%M"),
    );

    MailMessage {
        from: from_address.to_string(),
        to: vec![candidate.email.clone()],
        subject,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candidate() -> NotificationCandidate {
        NotificationCandidate {
            task_id: Uuid::new_v4(),
            title: "Write chapter 3".to_string(),
            due_date: Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap(),
            project_name: "Thesis".to_string(),
            owner_id: Uuid::new_v4(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            notifications_enabled: Some(true),
        }
    }

    #[test]
    fn test_skip_reason_deliverable() {
        assert_eq!(skip_reason(&candidate()), None);
    }

    #[test]
    fn test_skip_reason_disabled_notifications() {
        let mut c = candidate();
        c.notifications_enabled = Some(false);

        assert_eq!(skip_reason(&c), Some(SkipReason::NotificationsDisabled));
    }

    #[test]
    fn test_skip_reason_missing_profile_counts_as_enabled() {
        let mut c = candidate();
        c.notifications_enabled = None;

        assert_eq!(skip_reason(&c), None);
    }

    #[test]
    fn test_skip_reason_no_email() {
        let mut c = candidate();
        c.email = String::new();
        assert_eq!(skip_reason(&c), Some(SkipReason::NoEmailAddress));

        c.email = "   ".to_string();
        assert_eq!(skip_reason(&c), Some(SkipReason::NoEmailAddress));
    }

    #[test]
    fn test_skip_reason_disabled_wins_over_missing_email() {
        let mut c = candidate();
        c.notifications_enabled = Some(false);
        c.email = String::new();

        // Disabled notifications are checked first
        assert_eq!(skip_reason(&c), Some(SkipReason::NotificationsDisabled));
    }

    #[test]
    fn test_render_reminder_subject_and_recipient() {
        let message = render_reminder(&candidate(), "TaskFlow <noreply@example.com>");

        assert_eq!(message.subject, "Reminder: Task 'Write chapter 3' is due soon!");
        assert_eq!(message.from, "TaskFlow <noreply@example.com>");
        assert_eq!(message.to, vec!["ada@example.com"]);
    }

    #[test]
    fn test_render_reminder_body() {
        let message = render_reminder(&candidate(), "noreply@example.com");

        assert!(message.body.starts_with("Hello ada,"));
        assert!(message.body.contains("your task \"Write chapter 3\""));
        assert!(message.body.contains("in project \"Thesis\""));
        assert!(message.body.contains("is due on 2025-06-02 09:30 UTC"));
        assert!(message.body.ends_with("TaskFlow Team\n"));
    }

    // Full dispatcher runs against a database are in tests/dispatcher_tests.rs
}
