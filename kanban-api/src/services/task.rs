//! Task operations
//!
//! Tasks live on a board owned by the caller. Label ids supplied on create or
//! update must all belong to that same board.

use std::collections::HashMap;
use std::sync::Arc;

use kanban_shared::{
    dtos::{
        pagination::PageMeta,
        task::{CreateTaskDto, GetTasksDto, UpdateTaskDto},
    },
    entities::TaskEntity,
    models::{
        label::Label,
        task::{CreateTask, Task, UpdateTask},
    },
    DomainError, DomainResult,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{owned_board, task_entity};
use crate::notifications::{NotificationEvent, NotificationGateway};

#[derive(Debug, Serialize)]
pub struct TaskPage {
    pub tasks: Vec<TaskEntity>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Drops repeated ids, keeping first occurrence order
fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

pub struct TaskService {
    db: PgPool,
    gateway: Arc<NotificationGateway>,
}

impl TaskService {
    pub fn new(db: PgPool, gateway: Arc<NotificationGateway>) -> Self {
        Self { db, gateway }
    }

    async fn check_labels(&self, board_id: Uuid, label_ids: &[Uuid]) -> DomainResult<()> {
        if label_ids.is_empty() {
            return Ok(());
        }

        let found = Label::count_in_board(&self.db, board_id, label_ids).await?;
        if found != label_ids.len() as i64 {
            return Err(DomainError::bad_request("Label does not belong to board"));
        }

        Ok(())
    }

    async fn with_labels(&self, task: &Task) -> DomainResult<TaskEntity> {
        let mut labels = Task::labels_for(&self.db, &[task.id]).await?;
        task_entity(task, &labels.remove(&task.id).unwrap_or_default())
    }

    async fn owned_task(&self, id: Uuid, user_id: Uuid) -> DomainResult<Task> {
        let task = Task::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Task not found"))?;

        owned_board(&self.db, task.board_id, user_id).await?;
        Ok(task)
    }

    pub async fn get_tasks(&self, dto: GetTasksDto) -> DomainResult<TaskPage> {
        let GetTasksDto {
            user_id,
            board_id,
            status,
            is_active,
            pagination,
        } = dto;

        owned_board(&self.db, board_id, user_id).await?;

        let (tasks, total) = tokio::try_join!(
            Task::list_by_board(
                &self.db,
                board_id,
                status,
                is_active,
                pagination.limit,
                pagination.offset()
            ),
            Task::count_by_board(&self.db, board_id, status, is_active),
        )?;

        let ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
        let mut labels: HashMap<Uuid, Vec<Label>> = Task::labels_for(&self.db, &ids).await?;

        let tasks = tasks
            .iter()
            .map(|task| task_entity(task, &labels.remove(&task.id).unwrap_or_default()))
            .collect::<DomainResult<Vec<_>>>()?;

        let mut base_path = format!("/api/tasks?boardId={}", board_id);
        if let Some(status) = status {
            base_path.push_str(&format!("&status={}", status));
        }

        Ok(TaskPage {
            tasks,
            meta: PageMeta::new(pagination, total, &base_path),
        })
    }

    pub async fn get_task(&self, id: Uuid, user_id: Uuid) -> DomainResult<TaskEntity> {
        let task = self.owned_task(id, user_id).await?;
        self.with_labels(&task).await
    }

    #[tracing::instrument(skip(self, dto), fields(board_id = %dto.board_id))]
    pub async fn create_task(&self, dto: CreateTaskDto) -> DomainResult<TaskEntity> {
        let board = owned_board(&self.db, dto.board_id, dto.user_id).await?;

        let label_ids = dedup(dto.labels);
        self.check_labels(board.id, &label_ids).await?;

        let task = Task::create(
            &self.db,
            CreateTask {
                title: dto.title,
                description: dto.description,
                status: dto.status,
                start_date: dto.start_date,
                end_date: dto.end_date,
                reminder_time: dto.reminder_time,
                board_id: board.id,
                user_id: board.user_id,
                label_ids,
            },
        )
        .await?;

        let entity = self.with_labels(&task).await?;
        tracing::info!(task_id = %task.id, "Task created");

        self.gateway
            .broadcast(&[board.user_id], NotificationEvent::TaskCreated, &entity)
            .await;

        Ok(entity)
    }

    /// Partial update; fields absent from the DTO keep their value
    #[tracing::instrument(skip(self, dto), fields(task_id = %dto.id))]
    pub async fn update_task(&self, dto: UpdateTaskDto) -> DomainResult<TaskEntity> {
        let current = self.owned_task(dto.id, dto.user_id).await?;

        // Dates must stay ordered against the stored values too
        let start = dto.start_date.unwrap_or(current.start_date);
        let end = dto.end_date.unwrap_or(current.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(DomainError::bad_request("End date must be after start date"));
            }
        }

        let label_ids = dto.labels.map(dedup);
        if let Some(ids) = &label_ids {
            self.check_labels(current.board_id, ids).await?;
        }

        let task = Task::update(
            &self.db,
            dto.id,
            UpdateTask {
                title: dto.title,
                description: dto.description,
                status: dto.status,
                start_date: dto.start_date,
                end_date: dto.end_date,
                reminder_time: dto.reminder_time,
                is_active: dto.is_active,
                label_ids,
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("Task not found"))?;

        let entity = self.with_labels(&task).await?;

        self.gateway
            .broadcast(&[task.user_id], NotificationEvent::TaskUpdated, &entity)
            .await;

        Ok(entity)
    }

    /// Hard delete; returns the task as it was, labels included
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: Uuid, user_id: Uuid) -> DomainResult<TaskEntity> {
        let current = self.owned_task(id, user_id).await?;
        let last_known = self.with_labels(&current).await?;

        Task::delete(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Task not found"))?;

        tracing::info!(task_id = %id, "Task deleted");

        self.gateway
            .broadcast(&[current.user_id], NotificationEvent::TaskDeleted, &last_known)
            .await;

        Ok(last_known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(dedup(vec![a, b, a, b]), vec![a, b]);
        assert!(dedup(Vec::new()).is_empty());
    }
}
