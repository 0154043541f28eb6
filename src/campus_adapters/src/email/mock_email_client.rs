use std::sync::Arc;

use campus_core::{Email, EmailClient, EmailDeliveryError};
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// Email client that keeps every message in memory instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }

    /// Most recent message addressed to `recipient`.
    pub async fn last_sent_to(&self, recipient: &str) -> Option<SentEmail> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|mail| mail.recipient == recipient)
            .cloned()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailDeliveryError> {
        tracing::debug!(subject, "Recording email instead of sending it");
        self.sent.lock().await.push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_owned(),
            content: content.to_owned(),
        });
        Ok(())
    }
}
