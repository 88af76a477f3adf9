/// Task model and database operations
///
/// This module provides the Task model, its status and reminder enums, and
/// CRUD operations including the task/label association.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'DONE');
/// CREATE TYPE reminder_time AS ENUM ('NONE', 'AT_START', 'FIVE_MINUTES_BEFORE', ...);
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'TODO',
///     start_date TIMESTAMPTZ,
///     end_date TIMESTAMPTZ,
///     reminder_time reminder_time NOT NULL DEFAULT 'NONE',
///     remind_at TIMESTAMPTZ,
///     reminded_at TIMESTAMPTZ,
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE task_labels (
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     label_id UUID NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
///     PRIMARY KEY (task_id, label_id)
/// );
/// ```
///
/// # Reminders
///
/// `remind_at` is derived from `start_date` and `reminder_time` (see
/// [`ReminderTime::remind_at`]) and stored so the reminder dispatcher can scan
/// an index instead of evaluating offsets. `reminded_at` is set when the
/// dispatcher claims the task and cleared whenever `remind_at` changes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::label::Label;

const COLUMNS: &str = "id, title, description, status, start_date, end_date, reminder_time, \
                       remind_at, reminded_at, board_id, user_id, is_active, created_at, updated_at";

/// Workflow column a task sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err("Invalid status".to_string()),
        }
    }
}

/// How long before `start_date` the owner wants to be reminded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reminder_time", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderTime {
    #[default]
    None,
    AtStart,
    FiveMinutesBefore,
    FifteenMinutesBefore,
    ThirtyMinutesBefore,
    OneHourBefore,
    OneDayBefore,
}

impl ReminderTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderTime::None => "NONE",
            ReminderTime::AtStart => "AT_START",
            ReminderTime::FiveMinutesBefore => "FIVE_MINUTES_BEFORE",
            ReminderTime::FifteenMinutesBefore => "FIFTEEN_MINUTES_BEFORE",
            ReminderTime::ThirtyMinutesBefore => "THIRTY_MINUTES_BEFORE",
            ReminderTime::OneHourBefore => "ONE_HOUR_BEFORE",
            ReminderTime::OneDayBefore => "ONE_DAY_BEFORE",
        }
    }

    /// Offset before the start date, `None` when reminders are off
    pub fn offset(&self) -> Option<Duration> {
        match self {
            ReminderTime::None => None,
            ReminderTime::AtStart => Some(Duration::zero()),
            ReminderTime::FiveMinutesBefore => Some(Duration::minutes(5)),
            ReminderTime::FifteenMinutesBefore => Some(Duration::minutes(15)),
            ReminderTime::ThirtyMinutesBefore => Some(Duration::minutes(30)),
            ReminderTime::OneHourBefore => Some(Duration::hours(1)),
            ReminderTime::OneDayBefore => Some(Duration::days(1)),
        }
    }

    /// Instant the reminder is due for a task starting at `start_date`
    ///
    /// ```
    /// use kanban_shared::models::task::ReminderTime;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// assert_eq!(ReminderTime::OneHourBefore.remind_at(Some(start)), Some(start - Duration::hours(1)));
    /// assert_eq!(ReminderTime::None.remind_at(Some(start)), None);
    /// assert_eq!(ReminderTime::AtStart.remind_at(None), None);
    /// ```
    pub fn remind_at(&self, start_date: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        Some(start_date? - self.offset()?)
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(ReminderTime::None),
            "AT_START" => Ok(ReminderTime::AtStart),
            "FIVE_MINUTES_BEFORE" => Ok(ReminderTime::FiveMinutesBefore),
            "FIFTEEN_MINUTES_BEFORE" => Ok(ReminderTime::FifteenMinutesBefore),
            "THIRTY_MINUTES_BEFORE" => Ok(ReminderTime::ThirtyMinutesBefore),
            "ONE_HOUR_BEFORE" => Ok(ReminderTime::OneHourBefore),
            "ONE_DAY_BEFORE" => Ok(ReminderTime::OneDayBefore),
            _ => Err("Invalid reminderTime".to_string()),
        }
    }
}

/// Task row
///
/// Labels live in `task_labels`; load them with [`Task::labels_for`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder_time: ReminderTime,

    /// Due instant of the reminder (internal)
    #[serde(skip_serializing, default)]
    pub remind_at: Option<DateTime<Utc>>,

    /// Set once the reminder has been dispatched (internal)
    #[serde(skip_serializing, default)]
    pub reminded_at: Option<DateTime<Utc>>,

    pub board_id: Uuid,

    /// Owner of the board at creation time; reminder recipient
    pub user_id: Uuid,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder_time: ReminderTime,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub label_ids: Vec<Uuid>,
}

/// Partial task update
///
/// Nullable columns use `Option<Option<T>>`: `Some(None)` clears the value.
/// `remind_at` is not part of the input; it is recomputed by
/// [`Task::update`] whenever the start date or reminder changes.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub reminder_time: Option<ReminderTime>,
    pub is_active: Option<bool>,
    pub label_ids: Option<Vec<Uuid>>,
}

#[derive(sqlx::FromRow)]
struct TaskLabelRow {
    task_id: Uuid,
    #[sqlx(flatten)]
    label: Label,
}

impl Task {
    /// Inserts a task and its label links in one transaction
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let remind_at = data.reminder_time.remind_at(data.start_date);

        let mut tx = pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO tasks (title, description, status, start_date, end_date,
                               reminder_time, remind_at, board_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.start_date)
            .bind(data.end_date)
            .bind(data.reminder_time)
            .bind(remind_at)
            .bind(data.board_id)
            .bind(data.user_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::link_labels(&mut tx, task.id, &data.label_ids).await?;

        tx.commit().await?;

        Ok(task)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM tasks WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a board's tasks, newest first, optionally filtered by status
    pub async fn list_by_board(
        pool: &PgPool,
        board_id: Uuid,
        status: Option<TaskStatus>,
        is_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {}
            FROM tasks
            WHERE board_id = $1
              AND is_active = $2
              AND ($3::task_status IS NULL OR status = $3)
            ORDER BY created_at DESC, id
            LIMIT $4 OFFSET $5
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(board_id)
            .bind(is_active)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_board(
        pool: &PgPool,
        board_id: Uuid,
        status: Option<TaskStatus>,
        is_active: bool,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE board_id = $1
              AND is_active = $2
              AND ($3::task_status IS NULL OR status = $3)
            "#,
        )
        .bind(board_id)
        .bind(is_active)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }

    /// Loads the labels of every task in `task_ids`, keyed by task
    ///
    /// Tasks without labels are absent from the map.
    pub async fn labels_for(
        pool: &PgPool,
        task_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Label>>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TaskLabelRow>(
            r#"
            SELECT tl.task_id, l.id, l.name, l.color, l.user_id, l.board_id,
                   l.is_active, l.created_at, l.updated_at
            FROM task_labels tl
            JOIN labels l ON l.id = tl.label_id
            WHERE tl.task_id = ANY($1)
            ORDER BY l.created_at, l.id
            "#,
        )
        .bind(task_ids)
        .fetch_all(pool)
        .await?;

        let mut by_task: HashMap<Uuid, Vec<Label>> = HashMap::new();
        for row in rows {
            by_task.entry(row.task_id).or_default().push(row.label);
        }

        Ok(by_task)
    }

    /// Updates an existing task
    ///
    /// Only non-None fields are written. When `start_date` or `reminder_time`
    /// changes, `remind_at` is recomputed from the merged values and
    /// `reminded_at` is cleared so the new reminder fires. Label links are
    /// replaced when `label_ids` is present.
    ///
    /// # Returns
    ///
    /// The updated task, or None if it doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 FOR UPDATE",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let remind_at = if data.start_date.is_some() || data.reminder_time.is_some() {
            let start = data.start_date.unwrap_or(current.start_date);
            let reminder = data.reminder_time.unwrap_or(current.reminder_time);
            Some(reminder.remind_at(start))
        } else {
            None
        };

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_date = ${}", bind_count));
        }
        if data.end_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", end_date = ${}", bind_count));
        }
        if data.reminder_time.is_some() {
            bind_count += 1;
            query.push_str(&format!(", reminder_time = ${}", bind_count));
        }
        if remind_at.is_some() {
            bind_count += 1;
            query.push_str(&format!(", remind_at = ${}, reminded_at = NULL", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", COLUMNS));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = data.end_date {
            q = q.bind(end_date);
        }
        if let Some(reminder_time) = data.reminder_time {
            q = q.bind(reminder_time);
        }
        if let Some(remind_at) = remind_at {
            q = q.bind(remind_at);
        }
        if let Some(active) = data.is_active {
            q = q.bind(active);
        }

        let task = q.fetch_one(&mut *tx).await?;

        if let Some(label_ids) = data.label_ids {
            sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::link_labels(&mut tx, id, &label_ids).await?;
        }

        tx.commit().await?;

        Ok(Some(task))
    }

    /// Deletes a task and returns its last state
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("DELETE FROM tasks WHERE id = $1 RETURNING {}", COLUMNS);

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn link_labels(
        tx: &mut Transaction<'_, Postgres>,
        task_id: Uuid,
        label_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        if label_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO task_labels (task_id, label_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(task_id)
        .bind(label_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert_eq!("todo".parse::<TaskStatus>(), Err("Invalid status".to_string()));
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), "IN_PROGRESS");
    }

    #[test]
    fn test_reminder_parse() {
        assert_eq!("ONE_DAY_BEFORE".parse::<ReminderTime>(), Ok(ReminderTime::OneDayBefore));
        assert_eq!(
            "TWO_DAYS_BEFORE".parse::<ReminderTime>(),
            Err("Invalid reminderTime".to_string())
        );
        assert_eq!(ReminderTime::default(), ReminderTime::None);
    }

    #[test]
    fn test_remind_at_offsets() {
        let start = Utc::now();

        assert_eq!(ReminderTime::AtStart.remind_at(Some(start)), Some(start));
        assert_eq!(
            ReminderTime::FifteenMinutesBefore.remind_at(Some(start)),
            Some(start - Duration::minutes(15))
        );
        assert_eq!(
            ReminderTime::OneDayBefore.remind_at(Some(start)),
            Some(start - Duration::days(1))
        );
        assert_eq!(ReminderTime::None.remind_at(Some(start)), None);
        assert_eq!(ReminderTime::OneHourBefore.remind_at(None), None);
    }

    #[test]
    fn test_internal_reminder_columns_are_not_serialized() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Task".to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            start_date: None,
            end_date: None,
            reminder_time: ReminderTime::None,
            remind_at: Some(Utc::now()),
            reminded_at: None,
            board_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("remindAt").is_none());
        assert!(value.get("remindedAt").is_none());
        assert_eq!(value["status"], "TODO");
        assert_eq!(value["reminderTime"], "NONE");
    }
}
