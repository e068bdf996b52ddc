use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use taskforge_core::{Email, EmailClient, EmailTemplate, OneTimeCode};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEmail {
    pub recipient: String,
    pub recipient_name: String,
    pub template: EmailTemplate,
    pub code: OneTimeCode,
}

/// Email client double: records every delivery instead of sending, and can
/// be switched into a failing state to exercise delivery-failure paths.
/// Used by the integration tests and handy for local runs without an
/// email provider.
#[derive(Clone, Default)]
pub struct RecordingEmailClient {
    sent: Arc<RwLock<Vec<RecordedEmail>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<RecordedEmail> {
        self.sent.read().await.clone()
    }

    /// The code carried by the most recent delivery.
    pub async fn last_code(&self) -> OneTimeCode {
        self.sent
            .read()
            .await
            .last()
            .expect("no email was sent")
            .code
            .clone()
    }
}

#[async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_code(
        &self,
        recipient: &Email,
        recipient_name: &str,
        template: EmailTemplate,
        code: &OneTimeCode,
    ) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("email delivery failed".to_owned());
        }
        self.sent.write().await.push(RecordedEmail {
            recipient: recipient.expose().to_owned(),
            recipient_name: recipient_name.to_owned(),
            template,
            code: code.clone(),
        });
        tracing::debug!(recipient = recipient.expose(), "recorded outgoing email");
        Ok(())
    }
}
