/// Label model and database operations
///
/// Labels are scoped to a board and attached to that board's tasks through
/// the `task_labels` join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE labels (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     color VARCHAR(7) NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const COLUMNS: &str =
    "id, name, color, user_id, board_id, is_active, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: Uuid,
    pub name: String,

    /// `#RGB` or `#RRGGBB`
    pub color: String,

    pub user_id: Uuid,
    pub board_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateLabel {
    pub name: String,
    pub color: String,
    pub user_id: Uuid,
    pub board_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLabel {
    pub name: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

impl Label {
    pub async fn create(pool: &PgPool, data: CreateLabel) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO labels (name, color, user_id, board_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, Label>(&query)
            .bind(data.name)
            .bind(data.color)
            .bind(data.user_id)
            .bind(data.board_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM labels WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Label>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a board's labels, newest first
    pub async fn list_by_board(
        pool: &PgPool,
        board_id: Uuid,
        is_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {}
            FROM labels
            WHERE board_id = $1 AND is_active = $2
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Label>(&query)
            .bind(board_id)
            .bind(is_active)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_board(
        pool: &PgPool,
        board_id: Uuid,
        is_active: bool,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM labels WHERE board_id = $1 AND is_active = $2")
                .bind(board_id)
                .bind(is_active)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }

    /// Counts how many of `ids` belong to `board_id`
    ///
    /// Used to reject task payloads that reference another board's labels:
    /// the ids are valid only when the count equals the number of distinct ids.
    pub async fn count_in_board(
        pool: &PgPool,
        board_id: Uuid,
        ids: &[Uuid],
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM labels WHERE board_id = $1 AND id = ANY($2)")
                .bind(board_id)
                .bind(ids)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateLabel,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE labels SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", COLUMNS));

        let mut q = sqlx::query_as::<_, Label>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(color) = data.color {
            q = q.bind(color);
        }
        if let Some(active) = data.is_active {
            q = q.bind(active);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a label and returns its last state; task links are dropped
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("DELETE FROM labels WHERE id = $1 RETURNING {}", COLUMNS);

        sqlx::query_as::<_, Label>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
