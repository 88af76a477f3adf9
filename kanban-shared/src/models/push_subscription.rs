/// Web push subscription model
///
/// One row per browser endpoint. The endpoint URL is unique: a browser that
/// re-subscribes under another account moves the row to that account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, endpoint, p256dh, auth, created_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub id: Uuid,
    pub user_id: Uuid,

    /// Push service URL issued by the browser
    pub endpoint: String,

    /// Client public key (base64url)
    pub p256dh: String,

    /// Client auth secret (base64url)
    pub auth: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePushSubscription {
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscription {
    /// Inserts or refreshes the subscription for `endpoint`
    pub async fn upsert(pool: &PgPool, data: CreatePushSubscription) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (endpoint)
            DO UPDATE SET user_id = EXCLUDED.user_id,
                          p256dh = EXCLUDED.p256dh,
                          auth = EXCLUDED.auth
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, PushSubscription>(&query)
            .bind(data.user_id)
            .bind(data.endpoint)
            .bind(data.p256dh)
            .bind(data.auth)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM push_subscriptions WHERE user_id = $1 ORDER BY created_at",
            COLUMNS
        );

        sqlx::query_as::<_, PushSubscription>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Removes the user's subscription for `endpoint`; false if none matched
    pub async fn delete_by_endpoint(
        pool: &PgPool,
        user_id: Uuid,
        endpoint: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2")
                .bind(user_id)
                .bind(endpoint)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a subscription the push service reported as gone
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
