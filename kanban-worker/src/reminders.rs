/// Due reminder queue
///
/// Claims tasks whose reminder is due and marks them reminded in the same
/// statement, so several workers can poll one database without delivering a
/// reminder twice.
///
/// # Claim
///
/// ```text
/// remind_at <= now AND reminded_at IS NULL AND is_active
///   └─> FOR UPDATE SKIP LOCKED
///   └─> reminded_at = now
/// ```
///
/// A reminder is marked before delivery is attempted. A crash between the
/// claim and the push drops that reminder rather than repeating it.
///
/// # Example
///
/// ```no_run
/// use kanban_worker::reminders::ReminderQueue;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let queue = ReminderQueue::new(pool, 50);
///
/// for task in queue.claim_due(chrono::Utc::now()).await? {
///     println!("Reminder due for task {}", task.id);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use kanban_shared::models::task::Task;
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct ReminderQueue {
    db: PgPool,

    /// Maximum tasks claimed per call
    batch_size: i64,
}

impl ReminderQueue {
    pub fn new(db: PgPool, batch_size: i64) -> Self {
        ReminderQueue { db, batch_size }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    /// Claims up to `batch_size` due reminders, oldest first
    pub async fn claim_due(&self, now: DateTime<Utc>) -> Result<Vec<Task>, ReminderError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            WITH due_tasks AS (
                SELECT id
                FROM tasks
                WHERE remind_at <= $1
                  AND reminded_at IS NULL
                  AND is_active
                ORDER BY remind_at ASC
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            UPDATE tasks
            SET reminded_at = $1
            FROM due_tasks
            WHERE tasks.id = due_tasks.id
            RETURNING
                tasks.id,
                tasks.title,
                tasks.description,
                tasks.status,
                tasks.start_date,
                tasks.end_date,
                tasks.reminder_time,
                tasks.remind_at,
                tasks.reminded_at,
                tasks.board_id,
                tasks.user_id,
                tasks.is_active,
                tasks.created_at,
                tasks.updated_at
            "#,
        )
        .bind(now)
        .bind(self.batch_size)
        .fetch_all(&self.db)
        .await?;

        if !tasks.is_empty() {
            tracing::debug!(count = tasks.len(), "Claimed due reminders");
        }

        Ok(tasks)
    }
}
