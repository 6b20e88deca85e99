/// Mock mailer for testing and demos
///
/// Records every message it accepts and can be switched into a failing
/// mode to simulate relay outages. Useful for:
/// - Testing the dispatcher without a mail relay
/// - Verifying retry behavior (fail first, then succeed)
///
/// # Example
///
/// ```
/// use taskflow_notifier::mailer::{MailMessage, Mailer, MockMailer};
///
/// # async fn example() {
/// let mailer = MockMailer::new();
///
/// let message = MailMessage {
///     from: "taskflow@example.com".to_string(),
///     to: vec!["ada@example.com".to_string()],
///     subject: "Reminder".to_string(),
///     body: "Hello".to_string(),
/// };
///
/// mailer.send(&message).await.unwrap();
/// assert_eq!(mailer.sent_count(), 1);
///
/// mailer.set_should_fail(true);
/// assert!(mailer.send(&message).await.is_err());
/// assert_eq!(mailer.sent_count(), 1);
/// # }
/// ```

use crate::mailer::{MailError, MailMessage, Mailer};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Recording mailer with failure injection
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<MailMessage>>,
    should_fail: AtomicBool,
}

impl MockMailer {
    /// Creates a mock mailer that accepts every message
    pub fn new() -> Self {
        MockMailer::default()
    }

    /// Creates a mock mailer that fails every send
    pub fn failing() -> Self {
        let mailer = MockMailer::default();
        mailer.should_fail.store(true, Ordering::SeqCst);
        mailer
    }

    /// Switches failure injection on or off
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of messages accepted so far
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mock mailer lock poisoned").len()
    }

    /// Copies of all accepted messages, in send order
    pub fn sent_messages(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .expect("mock mailer lock poisoned")
            .clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::NoRecipients);
        }

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("simulated delivery failure".to_string()));
        }

        self.sent
            .lock()
            .expect("mock mailer lock poisoned")
            .push(message.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_to(recipient: &str) -> MailMessage {
        MailMessage {
            from: "taskflow@example.com".to_string(),
            to: vec![recipient.to_string()],
            subject: "Reminder".to_string(),
            body: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_sent_messages() {
        let mailer = MockMailer::new();

        mailer.send(&message_to("a@example.com")).await.unwrap();
        mailer.send(&message_to("b@example.com")).await.unwrap();

        let sent = mailer.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["a@example.com"]);
        assert_eq!(sent[1].to, vec!["b@example.com"]);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mailer = MockMailer::failing();

        let result = mailer.send(&message_to("a@example.com")).await;
        assert!(matches!(result, Err(MailError::Transport(_))));
        assert_eq!(mailer.sent_count(), 0);

        // Recovered relay accepts again
        mailer.set_should_fail(false);
        mailer.send(&message_to("a@example.com")).await.unwrap();
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_empty_recipients() {
        let mailer = MockMailer::new();

        let message = MailMessage {
            from: "taskflow@example.com".to_string(),
            to: vec![],
            subject: "Reminder".to_string(),
            body: "Hello".to_string(),
        };

        let result = mailer.send(&message).await;
        assert!(matches!(result, Err(MailError::NoRecipients)));
    }
}
