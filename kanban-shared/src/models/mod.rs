/// Database models
///
/// Row types with their CRUD operations. Every function takes a `&PgPool`
/// and returns `sqlx::Error`; services translate those into domain errors.
///
/// # Models
///
/// - `user`: accounts, credentials and the email-validated flag
/// - `board`: boards owned by a user
/// - `task`: tasks, their status/reminder enums and label links
/// - `label`: board-scoped labels
/// - `push_subscription`: browser endpoints for reminder delivery
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::board::{Board, CreateBoard};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let board = Board::create(&pool, CreateBoard { name: "Board".to_string(), user_id }).await?;
/// assert!(board.is_active);
/// # Ok(())
/// # }
/// ```

pub mod board;
pub mod label;
pub mod push_subscription;
pub mod task;
pub mod user;
