//! # Outgoing Email
//!
//! Email transport is not part of this service. Handlers hand a fully
//! rendered [`EmailMessage`] to a [`Mailer`] held in application state:
//!
//! - [`LogMailer`] writes each message to the log (the default)
//! - [`MemoryMailer`] keeps messages in memory so tests can inspect them

pub mod templates;

pub use templates::Templates;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// Logs messages instead of delivering them
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            "outgoing email"
        );
        // The body carries reset links
        tracing::debug!(to = %message.to, "email body:\n{}", message.body);
        Ok(())
    }
}

/// Collects sent messages in memory
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            from: "webmaster@localhost".into(),
            to: to.into(),
            subject: "hello".into(),
            body: "body".into(),
        }
    }

    #[tokio::test]
    async fn memory_mailer_records_in_order() {
        let mailer = MemoryMailer::new();
        mailer.send(message("a@b.com")).await.unwrap();
        mailer.send(message("c@d.com")).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[1].to, "c@d.com");
    }

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        assert!(LogMailer.send(message("a@b.com")).await.is_ok());
    }
}
