/// Core Mailer trait and types
///
/// This module defines the contract the notification dispatcher sends mail
/// through. Implementations deliver a rendered [`MailMessage`] to its
/// recipients and raise [`MailError`] on failure; the dispatcher treats any
/// error as "not delivered" and leaves the task eligible for a retry on the
/// next run.
///
/// # Example
///
/// ```
/// use taskflow_notifier::mailer::{MailError, MailMessage, Mailer};
/// use async_trait::async_trait;
///
/// struct NullMailer;
///
/// #[async_trait]
/// impl Mailer for NullMailer {
///     fn name(&self) -> &str {
///         "null"
///     }
///
///     async fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
///         Ok(())
///     }
/// }
/// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Mail transport error types
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Message has no recipients
    #[error("Message has no recipients")]
    NoRecipients,

    /// Transport-level failure (connection, timeout, serialization)
    #[error("Mail transport error: {0}")]
    Transport(String),

    /// The relay answered but refused the message
    #[error("Mail relay rejected the message: HTTP {status}")]
    Rejected {
        /// HTTP status returned by the relay
        status: u16,
    },
}

/// A rendered email message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Sender address
    pub from: String,

    /// Recipient addresses
    pub to: Vec<String>,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

/// Mail transport contract
///
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns the transport name
    ///
    /// Used for logging.
    fn name(&self) -> &str;

    /// Delivers a message to all its recipients
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] when delivery fails; the caller decides
    /// whether to retry
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_error_display() {
        let err = MailError::NoRecipients;
        assert_eq!(err.to_string(), "Message has no recipients");

        let err = MailError::Rejected { status: 502 };
        assert_eq!(err.to_string(), "Mail relay rejected the message: HTTP 502");

        let err = MailError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Mail transport error: connection refused");
    }

    #[test]
    fn test_mail_message_serialization() {
        let message = MailMessage {
            from: "taskflow@example.com".to_string(),
            to: vec!["ada@example.com".to_string()],
            subject: "Reminder".to_string(),
            body: "Hello".to_string(),
        };

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"from\":\"taskflow@example.com\""));

        let deserialized: MailMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, message);
    }
}
