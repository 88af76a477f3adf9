//! Outgoing email
//!
//! Services depend on the [`Mailer`] trait only. The binary picks
//! [`SmtpMailer`] when `SEND_EMAIL=true` and [`LogMailer`] otherwise; tests
//! use [`MemoryMailer`] to inspect what would have been sent.

pub mod memory;
pub mod smtp;
pub mod templates;

pub use memory::MemoryMailer;
pub use smtp::SmtpMailer;

use async_trait::async_trait;

/// A single HTML message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Failed to send email: {0}")]
    Transport(String),
}

/// Trait for email delivery backends
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailerError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Logs messages instead of sending them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailerError> {
        tracing::info!(to = %email.to, subject = %email.subject, "Email delivery disabled, message not sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
