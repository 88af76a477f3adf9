//! SMTP delivery through lettre

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{Email, Mailer, MailerError};
use crate::config::MailerConfig;

/// Sends mail through an authenticated TLS relay (Gmail, Outlook, ...)
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        let credentials = Credentials::new(config.email.clone(), config.secret_key.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailerError::Transport(format!("Failed to create SMTP relay: {}", e)))?
            .credentials(credentials)
            .build();

        let from = format!("Kanban <{}>", config.email)
            .parse()
            .map_err(|e| MailerError::Address(format!("{}: {}", config.email, e)))?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &Email) -> Result<Message, MailerError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| MailerError::Address(format!("{}: {}", email.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| MailerError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailerError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
