//! Outbound mail. Delivery is out of scope, so the only implementation
//! writes the message to the log.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError>;
}

/// Logs every message at `info` instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "mock email");
        Ok(())
    }
}
