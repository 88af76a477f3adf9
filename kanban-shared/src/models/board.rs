/// Board model and database operations
///
/// A board belongs to exactly one user. Tasks and labels hang off a board and
/// are removed with it (`ON DELETE CASCADE`).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, name, user_id, is_active, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub name: String,

    /// Owner; the only user allowed to read or mutate the board
    pub user_id: Uuid,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateBoard {
    pub name: String,
    pub user_id: Uuid,
}

/// Only non-None fields will be updated
#[derive(Debug, Clone, Default)]
pub struct UpdateBoard {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl Board {
    pub async fn create(pool: &PgPool, data: CreateBoard) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO boards (name, user_id) VALUES ($1, $2) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, Board>(&query)
            .bind(data.name)
            .bind(data.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM boards WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a user's boards, newest first
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use kanban_shared::models::board::Board;
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// // Second page of 10 active boards
    /// let boards = Board::list_by_user(&pool, user_id, true, 10, 10).await?;
    /// let total = Board::count_by_user(&pool, user_id, true).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        is_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {}
            FROM boards
            WHERE user_id = $1 AND is_active = $2
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Board>(&query)
            .bind(user_id)
            .bind(is_active)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_user(
        pool: &PgPool,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM boards WHERE user_id = $1 AND is_active = $2")
                .bind(user_id)
                .bind(is_active)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }

    /// Updates an existing board
    ///
    /// The `updated_at` timestamp is always bumped. Returns None if the board
    /// doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE boards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", COLUMNS));

        let mut q = sqlx::query_as::<_, Board>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(active) = data.is_active {
            q = q.bind(active);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a board and returns its last state
    ///
    /// Tasks, labels and task/label links go with it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("DELETE FROM boards WHERE id = $1 RETURNING {}", COLUMNS);

        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_serializes_owner_as_camel_case() {
        let board = Board {
            id: Uuid::new_v4(),
            name: "Board".to_string(),
            user_id: Uuid::new_v4(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["userId"], board.user_id.to_string());
        assert_eq!(value["isActive"], true);
    }
}
