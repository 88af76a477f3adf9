use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::LabelEntity;
use crate::error::{DomainError, DomainResult};
use crate::models::task::{ReminderTime, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder_time: ReminderTime,
    pub labels: Vec<LabelEntity>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskEntity {
    /// Requires `id`/`_id` and `title`; `labels` may be absent
    ///
    /// An unknown `status` or `reminderTime` is rejected rather than
    /// silently defaulted.
    pub fn from_object(object: &Value) -> DomainResult<Self> {
        let id = super::id(object)?;
        let title = super::required_text(object, "title")?;

        let status = match super::optional_text(object, "status") {
            Some(s) => s.parse().map_err(DomainError::Validation)?,
            None => TaskStatus::default(),
        };
        let reminder_time = match super::optional_text(object, "reminderTime") {
            Some(s) => s.parse().map_err(DomainError::Validation)?,
            None => ReminderTime::default(),
        };

        let labels = match object.get("labels").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .map(LabelEntity::from_object)
                .collect::<DomainResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            id,
            title,
            description: super::optional_text(object, "description").unwrap_or_default(),
            status,
            start_date: super::timestamp(object, "startDate"),
            end_date: super::timestamp(object, "endDate"),
            reminder_time,
            labels,
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
    fn test_defaults_for_minimal_row() {
        let task = TaskEntity::from_object(&json!({
            "id": Uuid::new_v4().to_string(),
            "title": "Task"
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.description, "");
        assert!(task.labels.is_empty());
        assert!(task.is_active);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["status"], "TODO");
        assert_eq!(value["labels"], json!([]));
    }

    #[test]
    fn test_nested_labels() {
        let label_id = Uuid::new_v4();
        let task = TaskEntity::from_object(&json!({
            "_id": Uuid::new_v4().to_string(),
            "title": "Task",
            "labels": [{ "id": label_id.to_string(), "name": "Bug", "color": "#f00" }]
        }))
        .unwrap();

        assert_eq!(task.labels.len(), 1);
        assert_eq!(task.labels[0].id, label_id);
    }

    #[test]
    fn test_missing_title_is_bad_request() {
        let err = TaskEntity::from_object(&json!({ "id": Uuid::new_v4().to_string() })).unwrap_err();
        assert!(matches!(err, DomainError::Validation(m) if m == "Missing title"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = TaskEntity::from_object(&json!({
            "id": Uuid::new_v4().to_string(),
            "title": "Task",
            "status": "BLOCKED"
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
