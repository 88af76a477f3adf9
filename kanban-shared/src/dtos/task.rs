//! Task request DTOs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::fields;
use super::pagination::PaginationDto;
use crate::models::task::{ReminderTime, TaskStatus};

/// Enum field given by its wire name; anything unknown is `Invalid <key>`
fn enumerated<T>(object: &Value, key: &str) -> Result<Option<T>, String>
where
    T: FromStr<Err = String>,
{
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s.parse().map(Some),
        Some(_) => Err(format!("Invalid {}", key)),
    }
}

/// Free text that may legitimately be empty
fn description(object: &Value) -> Option<String> {
    match object.get("description") {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn check_dates(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), String> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err("End date must be after start date".to_string())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTasksDto {
    pub user_id: Uuid,
    pub board_id: Uuid,
    pub status: Option<TaskStatus>,
    pub is_active: bool,
    pub pagination: PaginationDto,
}

impl GetTasksDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let board_id = fields::required_uuid(object, "boardId", "board")?;
        let status = enumerated(object, "status")?;
        let is_active = fields::flag(object, "isActive", true);
        let pagination = PaginationDto::create(object)?;

        Ok(Self {
            user_id,
            board_id,
            status,
            is_active,
            pagination,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskDto {
    pub user_id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder_time: ReminderTime,
    pub labels: Vec<Uuid>,
}

impl CreateTaskDto {
    /// Validates a new task; omitted fields take their defaults
    ///
    /// ```
    /// use kanban_shared::dtos::task::CreateTaskDto;
    /// use kanban_shared::models::task::TaskStatus;
    /// use serde_json::json;
    /// use uuid::Uuid;
    ///
    /// let dto = CreateTaskDto::create(&json!({
    ///     "userId": Uuid::new_v4().to_string(),
    ///     "boardId": Uuid::new_v4().to_string(),
    ///     "title": "Task"
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(dto.status, TaskStatus::Todo);
    /// assert_eq!(dto.description, "");
    /// assert!(dto.labels.is_empty());
    /// ```
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let board_id = fields::required_uuid(object, "boardId", "board")?;
        let title = fields::text(object, "title").ok_or("Missing title")?;
        let status = enumerated(object, "status")?.unwrap_or_default();

        let start_date = fields::date(object, "startDate")?.flatten();
        let end_date = fields::date(object, "endDate")?.flatten();
        check_dates(start_date, end_date)?;

        let reminder_time = enumerated(object, "reminderTime")?.unwrap_or_default();
        let labels = fields::uuid_list(object, "labels", "labels")?.unwrap_or_default();

        Ok(Self {
            user_id,
            board_id,
            title,
            description: description(object).unwrap_or_default(),
            status,
            start_date,
            end_date,
            reminder_time,
            labels,
        })
    }
}

/// Partial task update
///
/// Dates are tri-state: `None` untouched, `Some(None)` cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub reminder_time: Option<ReminderTime>,
    pub labels: Option<Vec<Uuid>>,
    pub is_active: Option<bool>,
}

impl UpdateTaskDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let id = fields::required_uuid(object, "id", "id")?;
        let user_id = fields::required_uuid(object, "userId", "user")?;

        let title = if fields::is_present(object, "title") {
            Some(fields::text(object, "title").ok_or("Title cannot be empty")?)
        } else {
            None
        };

        let status = enumerated(object, "status")?;

        let start_date = fields::date(object, "startDate")?;
        let end_date = fields::date(object, "endDate")?;
        check_dates(start_date.flatten(), end_date.flatten())?;

        let reminder_time = enumerated(object, "reminderTime")?;
        let labels = fields::uuid_list(object, "labels", "labels")?;

        Ok(Self {
            id,
            user_id,
            title,
            description: description(object),
            status,
            start_date,
            end_date,
            reminder_time,
            labels,
            is_active: fields::optional_flag(object, "isActive"),
        })
    }
}
