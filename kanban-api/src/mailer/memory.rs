//! In-memory mailer that captures sent emails

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Email, Mailer, MailerError};

#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<Email>>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<Email> {
        self.sent.lock().await.clone()
    }

    pub async fn last_to(&self, address: &str) -> Option<Email> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|e| e.to == address)
            .cloned()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &Email) -> Result<(), MailerError> {
        if self.fail {
            return Err(MailerError::Transport("Mock failure".to_string()));
        }

        self.sent.lock().await.push(email.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_captures_messages() {
        let mailer = MemoryMailer::new();
        mailer.send(&email("a@test.com")).await.unwrap();
        mailer.send(&email("b@test.com")).await.unwrap();

        assert_eq!(mailer.sent().await.len(), 2);
        assert!(mailer.last_to("b@test.com").await.is_some());
        assert!(mailer.last_to("c@test.com").await.is_none());
    }

    #[tokio::test]
    async fn test_failing_mailer() {
        let mailer = MemoryMailer::failing();
        assert!(mailer.send(&email("a@test.com")).await.is_err());
        assert!(mailer.sent().await.is_empty());
    }
}
