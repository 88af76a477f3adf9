//! Entities returned by the API
//!
//! Each entity is built from a persisted-row shape (`serde_json::Value`) by a
//! `from_object` factory that enforces the fields the entity cannot exist
//! without. Missing required fields produce [`DomainError::Validation`];
//! optional fields pass through unchanged. The id is accepted as either
//! `id` or `_id`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

pub mod board;
pub mod label;
pub mod task;
pub mod user;

pub use board::BoardEntity;
pub use label::LabelEntity;
pub use task::TaskEntity;
pub use user::UserEntity;

pub(crate) fn id(object: &Value) -> DomainResult<Uuid> {
    let raw = object
        .get("id")
        .filter(|v| !v.is_null())
        .or_else(|| object.get("_id"))
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::bad_request("Missing id"))?;

    Uuid::parse_str(raw).map_err(|_| DomainError::bad_request("Invalid id"))
}

pub(crate) fn required_text(object: &Value, key: &str) -> DomainResult<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DomainError::bad_request(format!("Missing {}", key)))
}

pub(crate) fn optional_text(object: &Value, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn boolean(object: &Value, key: &str, default: bool) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub(crate) fn timestamp(object: &Value, key: &str) -> Option<DateTime<Utc>> {
    object
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
