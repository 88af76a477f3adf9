//! Label operations
//!
//! Labels belong to a board; only the board owner may see or change them.

use std::sync::Arc;

use kanban_shared::{
    dtos::{
        label::{CreateLabelDto, GetLabelsDto, UpdateLabelDto},
        pagination::PageMeta,
    },
    entities::LabelEntity,
    models::label::{CreateLabel, Label, UpdateLabel},
    DomainError, DomainResult,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{label_entity, owned_board};
use crate::notifications::{NotificationEvent, NotificationGateway};

#[derive(Debug, Serialize)]
pub struct LabelPage {
    pub labels: Vec<LabelEntity>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

pub struct LabelService {
    db: PgPool,
    gateway: Arc<NotificationGateway>,
}

impl LabelService {
    pub fn new(db: PgPool, gateway: Arc<NotificationGateway>) -> Self {
        Self { db, gateway }
    }

    /// Loads a label whose board is owned by `user_id`
    async fn owned_label(&self, id: Uuid, user_id: Uuid) -> DomainResult<Label> {
        let label = Label::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Label not found"))?;

        owned_board(&self.db, label.board_id, user_id).await?;
        Ok(label)
    }

    pub async fn get_labels(&self, dto: GetLabelsDto) -> DomainResult<LabelPage> {
        let GetLabelsDto {
            user_id,
            board_id,
            is_active,
            pagination,
        } = dto;

        owned_board(&self.db, board_id, user_id).await?;

        let (labels, total) = tokio::try_join!(
            Label::list_by_board(&self.db, board_id, is_active, pagination.limit, pagination.offset()),
            Label::count_by_board(&self.db, board_id, is_active),
        )?;

        let labels = labels
            .iter()
            .map(label_entity)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(LabelPage {
            labels,
            meta: PageMeta::new(pagination, total, &format!("/api/labels?boardId={}", board_id)),
        })
    }

    pub async fn get_label(&self, id: Uuid, user_id: Uuid) -> DomainResult<LabelEntity> {
        let label = self.owned_label(id, user_id).await?;
        label_entity(&label)
    }

    #[tracing::instrument(skip(self, dto), fields(board_id = %dto.board_id))]
    pub async fn create_label(&self, dto: CreateLabelDto) -> DomainResult<LabelEntity> {
        let board = owned_board(&self.db, dto.board_id, dto.user_id).await?;

        let label = Label::create(
            &self.db,
            CreateLabel {
                name: dto.name,
                color: dto.color,
                user_id: board.user_id,
                board_id: board.id,
            },
        )
        .await?;

        let entity = label_entity(&label)?;

        self.gateway
            .broadcast(&[board.user_id], NotificationEvent::LabelCreated, &entity)
            .await;

        Ok(entity)
    }

    #[tracing::instrument(skip(self, dto), fields(label_id = %dto.id))]
    pub async fn update_label(&self, dto: UpdateLabelDto) -> DomainResult<LabelEntity> {
        self.owned_label(dto.id, dto.user_id).await?;

        let label = Label::update(
            &self.db,
            dto.id,
            UpdateLabel {
                name: dto.name,
                color: dto.color,
                is_active: dto.is_active,
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("Label not found"))?;

        let entity = label_entity(&label)?;

        self.gateway
            .broadcast(&[label.user_id], NotificationEvent::LabelUpdated, &entity)
            .await;

        Ok(entity)
    }

    /// Hard delete; task links go with it
    #[tracing::instrument(skip(self))]
    pub async fn delete_label(&self, id: Uuid, user_id: Uuid) -> DomainResult<LabelEntity> {
        self.owned_label(id, user_id).await?;

        let label = Label::delete(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Label not found"))?;

        let entity = label_entity(&label)?;

        self.gateway
            .broadcast(&[label.user_id], NotificationEvent::LabelDeleted, &entity)
            .await;

        Ok(entity)
    }
}
