//! Push subscription DTOs
//!
//! Accepts the browser's `PushSubscription.toJSON()` shape:
//! `{ endpoint, keys: { p256dh, auth } }`.

use serde_json::Value;
use uuid::Uuid;

use super::fields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSubscriptionDto {
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscriptionDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let endpoint = fields::text(object, "endpoint").ok_or("Missing endpoint")?;

        let keys = object.get("keys").cloned().unwrap_or(Value::Null);
        let p256dh = fields::text(&keys, "p256dh").ok_or("Missing p256dh key")?;
        let auth = fields::text(&keys, "auth").ok_or("Missing auth key")?;

        Ok(Self {
            user_id,
            endpoint,
            p256dh,
            auth,
        })
    }
}

/// Unsubscribe request: only the endpoint is needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovePushSubscriptionDto {
    pub user_id: Uuid,
    pub endpoint: String,
}

impl RemovePushSubscriptionDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let endpoint = fields::text(object, "endpoint").ok_or("Missing endpoint")?;

        Ok(Self { user_id, endpoint })
    }
}
