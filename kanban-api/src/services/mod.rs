//! Business operations
//!
//! Each service takes a validated DTO, talks to the models, enforces
//! ownership and triggers side effects (emails, gateway broadcasts). Services
//! return [`DomainResult`] and never see HTTP.

pub mod auth;
pub mod board;
pub mod file_upload;
pub mod label;
pub mod push_subscription;
pub mod task;

pub use auth::AuthService;
pub use board::BoardService;
pub use file_upload::FileUploadService;
pub use label::LabelService;
pub use push_subscription::PushSubscriptionService;
pub use task::TaskService;

use kanban_shared::{
    entities::{BoardEntity, LabelEntity, TaskEntity},
    models::{board::Board, label::Label, task::Task},
    DomainError, DomainResult,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const BOARD_ACCESS_DENIED: &str = "You do not have access to this board";

/// Loads a board and checks `user_id` owns it
pub(crate) async fn owned_board(db: &PgPool, board_id: Uuid, user_id: Uuid) -> DomainResult<Board> {
    let board = Board::find_by_id(db, board_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Board not found"))?;

    if board.user_id != user_id {
        return Err(DomainError::forbidden(BOARD_ACCESS_DENIED));
    }

    Ok(board)
}

fn to_object<T: Serialize>(row: &T) -> DomainResult<Value> {
    Ok(serde_json::to_value(row)?)
}

pub(crate) fn board_entity(board: &Board) -> DomainResult<BoardEntity> {
    BoardEntity::from_object(&to_object(board)?)
}

pub(crate) fn label_entity(label: &Label) -> DomainResult<LabelEntity> {
    LabelEntity::from_object(&to_object(label)?)
}

pub(crate) fn task_entity(task: &Task, labels: &[Label]) -> DomainResult<TaskEntity> {
    let mut object = to_object(task)?;
    if let Some(map) = object.as_object_mut() {
        map.insert("labels".to_string(), to_object(&labels)?);
    }
    TaskEntity::from_object(&object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kanban_shared::models::task::{ReminderTime, TaskStatus};

    fn label(board_id: Uuid, user_id: Uuid) -> Label {
        Label {
            id: Uuid::new_v4(),
            name: "Bug".to_string(),
            color: "#ff0000".to_string(),
            user_id,
            board_id,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_entity_carries_labels() {
        let (board_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());
        let task = Task {
            id: Uuid::new_v4(),
            title: "Task".to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            start_date: None,
            end_date: None,
            reminder_time: ReminderTime::None,
            remind_at: None,
            reminded_at: None,
            board_id,
            user_id,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let labels = vec![label(board_id, user_id)];

        let entity = task_entity(&task, &labels).unwrap();
        assert_eq!(entity.id, task.id);
        assert_eq!(entity.status, TaskStatus::Todo);
        assert_eq!(entity.labels.len(), 1);
        assert_eq!(entity.labels[0].color, "#ff0000");

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["description"], "");
        assert!(json.get("remindAt").is_none());
    }

    #[test]
    fn test_board_entity_hides_owner() {
        let board = Board {
            id: Uuid::new_v4(),
            name: "Board".to_string(),
            user_id: Uuid::new_v4(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(board_entity(&board).unwrap()).unwrap();
        assert_eq!(json["name"], "Board");
        assert_eq!(json["isActive"], true);
        assert!(json.get("userId").is_none());
    }
}
