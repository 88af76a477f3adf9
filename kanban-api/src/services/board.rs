//! Board operations

use std::sync::Arc;

use kanban_shared::{
    dtos::{
        board::{CreateBoardDto, GetBoardsDto, UpdateBoardDto},
        pagination::PageMeta,
    },
    entities::BoardEntity,
    models::board::{Board, CreateBoard, UpdateBoard},
    DomainError, DomainResult,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{board_entity, owned_board};
use crate::notifications::{NotificationEvent, NotificationGateway};

/// One page of boards
#[derive(Debug, Serialize)]
pub struct BoardPage {
    pub boards: Vec<BoardEntity>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

pub struct BoardService {
    db: PgPool,
    gateway: Arc<NotificationGateway>,
}

impl BoardService {
    pub fn new(db: PgPool, gateway: Arc<NotificationGateway>) -> Self {
        Self { db, gateway }
    }

    pub async fn get_boards(&self, dto: GetBoardsDto) -> DomainResult<BoardPage> {
        let GetBoardsDto {
            user_id,
            is_active,
            pagination,
        } = dto;

        let (boards, total) = tokio::try_join!(
            Board::list_by_user(&self.db, user_id, is_active, pagination.limit, pagination.offset()),
            Board::count_by_user(&self.db, user_id, is_active),
        )?;

        let boards = boards
            .iter()
            .map(board_entity)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(BoardPage {
            boards,
            meta: PageMeta::new(pagination, total, "/api/boards"),
        })
    }

    pub async fn get_board(&self, id: Uuid, user_id: Uuid) -> DomainResult<BoardEntity> {
        let board = owned_board(&self.db, id, user_id).await?;
        board_entity(&board)
    }

    #[tracing::instrument(skip(self, dto), fields(user_id = %dto.user_id))]
    pub async fn create_board(&self, dto: CreateBoardDto) -> DomainResult<BoardEntity> {
        let board = Board::create(
            &self.db,
            CreateBoard {
                name: dto.name,
                user_id: dto.user_id,
            },
        )
        .await?;

        let entity = board_entity(&board)?;
        tracing::info!(board_id = %board.id, "Board created");

        self.gateway
            .broadcast(&[board.user_id], NotificationEvent::BoardCreated, &entity)
            .await;

        Ok(entity)
    }

    #[tracing::instrument(skip(self, dto), fields(board_id = %dto.id))]
    pub async fn update_board(&self, dto: UpdateBoardDto) -> DomainResult<BoardEntity> {
        owned_board(&self.db, dto.id, dto.user_id).await?;

        let board = Board::update(
            &self.db,
            dto.id,
            UpdateBoard {
                name: dto.name,
                is_active: dto.is_active,
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("Board not found"))?;

        let entity = board_entity(&board)?;

        self.gateway
            .broadcast(&[board.user_id], NotificationEvent::BoardUpdated, &entity)
            .await;

        Ok(entity)
    }

    /// Hard delete; returns the last-known board
    #[tracing::instrument(skip(self))]
    pub async fn delete_board(&self, id: Uuid, user_id: Uuid) -> DomainResult<BoardEntity> {
        owned_board(&self.db, id, user_id).await?;

        let board = Board::delete(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Board not found"))?;

        let entity = board_entity(&board)?;
        tracing::info!(board_id = %board.id, "Board deleted");

        self.gateway
            .broadcast(&[board.user_id], NotificationEvent::BoardDeleted, &entity)
            .await;

        Ok(entity)
    }
}
