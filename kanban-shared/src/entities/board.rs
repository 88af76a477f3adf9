use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::DomainResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntity {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BoardEntity {
    pub fn from_object(object: &Value) -> DomainResult<Self> {
        let id = super::id(object)?;
        let name = super::required_text(object, "name")?;

        Ok(Self {
            id,
            name,
            is_active: super::boolean(object, "isActive", true),
            created_at: super::timestamp(object, "createdAt"),
            updated_at: super::timestamp(object, "updatedAt"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_board_shape() {
        let board = BoardEntity::from_object(&json!({
            "id": Uuid::new_v4().to_string(),
            "name": "Board",
            "userId": Uuid::new_v4().to_string(),
            "isActive": true,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        let value = serde_json::to_value(&board).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["createdAt", "id", "isActive", "name", "updatedAt"]);
    }

    #[test]
    fn test_board_requires_name() {
        assert!(BoardEntity::from_object(&json!({ "id": Uuid::new_v4().to_string() })).is_err());
    }
}
