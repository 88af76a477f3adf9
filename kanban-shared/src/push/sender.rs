/// Web push delivery (RFC 8030)
///
/// Messages carry no payload: the push service wakes the browser's service
/// worker, which fetches whatever it needs to show. This avoids the aes128gcm
/// content encoding while still authenticating with VAPID.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use super::vapid::VapidKeys;
use super::PushError;

/// Default time-to-live the push service keeps an undelivered message
pub const DEFAULT_TTL_SECONDS: u32 = 60 * 60;

/// Sends payload-less push messages signed with the server's VAPID keys
#[derive(Debug, Clone)]
pub struct WebPushSender {
    client: reqwest::Client,
    keys: VapidKeys,
    ttl: u32,
}

impl WebPushSender {
    pub fn new(keys: VapidKeys) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            keys,
            ttl: DEFAULT_TTL_SECONDS,
        })
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn public_key(&self) -> &str {
        self.keys.public_key()
    }

    /// Delivers one message to `endpoint`
    ///
    /// # Errors
    ///
    /// - [`PushError::Gone`] when the subscription no longer exists (404/410);
    ///   callers should forget it
    /// - [`PushError::Rejected`] for any other non-success status
    pub async fn send(&self, endpoint: &str) -> Result<(), PushError> {
        let authorization = self.keys.authorization(endpoint)?;

        let response = self
            .client
            .post(endpoint)
            .header("TTL", self.ttl.to_string())
            .header("Urgency", "normal")
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await?;

        classify(response.status())?;
        debug!(endpoint = %endpoint, "Push message accepted");
        Ok(())
    }
}

fn classify(status: StatusCode) -> Result<(), PushError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(PushError::Gone),
        s => {
            warn!(status = s.as_u16(), "Push service rejected message");
            Err(PushError::Rejected(s.as_u16()))
        }
    }
}
