/// HTTP mail relay transport
///
/// Delivers messages by POSTing JSON to a mail relay endpoint (e.g. an
/// internal SMTP bridge or a hosted transactional-mail API):
///
/// ```json
/// {
///   "from": "TaskFlow <noreply@example.com>",
///   "to": ["ada@example.com"],
///   "subject": "Reminder: Task 'Write chapter 3' is due soon!",
///   "text": "..."
/// }
/// ```
///
/// A 2xx response counts as delivered; anything else raises
/// [`MailError::Rejected`] so the dispatcher retries the task on its next
/// run.

use crate::mailer::{MailError, MailMessage, Mailer};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default request timeout for relay calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Mailer that posts messages to an HTTP relay
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpMailer {
    /// Creates a mailer for the given relay endpoint
    ///
    /// `token`, when present, is sent as a bearer token.
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        HttpMailer {
            client,
            endpoint: endpoint.into(),
            token,
        }
    }

    /// Relay endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::NoRecipients);
        }

        let payload = json!({
            "from": message.from,
            "to": message.to,
            "subject": message.subject,
            "text": message.body,
        });

        let mut request = self.client.post(&self.endpoint).json(&payload);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(
            endpoint = %self.endpoint,
            recipients = message.to.len(),
            "Mail relay accepted message"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailer_name() {
        let mailer = HttpMailer::new("http://localhost:8025/send", None);
        assert_eq!(mailer.name(), "http");
        assert_eq!(mailer.endpoint(), "http://localhost:8025/send");
    }

    #[tokio::test]
    async fn test_send_rejects_empty_recipients() {
        let mailer = HttpMailer::new("http://localhost:8025/send", None);

        let message = MailMessage {
            from: "taskflow@example.com".to_string(),
            to: vec![],
            subject: "Reminder".to_string(),
            body: "Hello".to_string(),
        };

        let result = mailer.send(&message).await;
        assert!(matches!(result, Err(MailError::NoRecipients)));
    }

    #[tokio::test]
    async fn test_send_unreachable_relay_is_transport_error() {
        // Nothing listens on this port; the request must fail as a
        // transport error rather than panic
        let mailer = HttpMailer::new("http://127.0.0.1:1/send", None);

        let message = MailMessage {
            from: "taskflow@example.com".to_string(),
            to: vec!["ada@example.com".to_string()],
            subject: "Reminder".to_string(),
            body: "Hello".to_string(),
        };

        let result = mailer.send(&message).await;
        assert!(matches!(result, Err(MailError::Transport(_))));
    }
}
