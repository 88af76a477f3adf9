use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::DomainResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelEntity {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LabelEntity {
    pub fn from_object(object: &Value) -> DomainResult<Self> {
        let id = super::id(object)?;
        let name = super::required_text(object, "name")?;

        Ok(Self {
            id,
            name,
            color: super::optional_text(object, "color").unwrap_or_default(),
            is_active: super::boolean(object, "isActive", true),
            created_at: super::timestamp(object, "createdAt"),
            updated_at: super::timestamp(object, "updatedAt"),
        })
    }
}
