/// Web push
///
/// - [`vapid`]: VAPID key handling and authorization headers
/// - [`sender`]: HTTP delivery to browser push services

pub mod sender;
pub mod vapid;

pub use sender::WebPushSender;
pub use vapid::VapidKeys;

/// Error type for push delivery
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// VAPID key material is malformed
    #[error("Invalid VAPID key: {0}")]
    InvalidKey(String),

    /// Subscription endpoint is not an absolute URL
    #[error("Invalid push endpoint: {0}")]
    InvalidEndpoint(String),

    /// Failed to sign the VAPID token
    #[error("Failed to sign VAPID token: {0}")]
    Signing(String),

    /// Subscription expired or was revoked by the browser
    #[error("Push subscription is gone")]
    Gone,

    /// Push service answered with a non-success status
    #[error("Push service rejected message with status {0}")]
    Rejected(u16),

    /// Transport failure
    #[error("Push request failed: {0}")]
    Request(#[from] reqwest::Error),
}
