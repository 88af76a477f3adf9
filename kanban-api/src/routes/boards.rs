/// Board endpoints
///
/// All require a bearer token and a validated email. Only the owner may see
/// or change a board.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanban_shared::{
    dtos::board::{CreateBoardDto, GetBoardsDto, UpdateBoardDto},
    entities::BoardEntity,
};
use serde_json::json;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{merge, parse_id, Payload, QueryObject},
    middleware::auth::AuthUser,
    services::board::BoardPage,
};

pub async fn list_boards(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryObject(query): QueryObject,
) -> ApiResult<Json<BoardPage>> {
    let dto = GetBoardsDto::create(&merge(query, [("userId", json!(user.id))]))
        .map_err(ApiError::BadRequest)?;
    Ok(Json(state.board_service().get_boards(dto).await?))
}

pub async fn get_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<BoardEntity>> {
    let board = state.board_service().get_board(parse_id(&id)?, user.id).await?;
    Ok(Json(board))
}

pub async fn create_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(body): Payload,
) -> ApiResult<(StatusCode, Json<BoardEntity>)> {
    let dto = CreateBoardDto::create(&merge(body, [("userId", json!(user.id))]))
        .map_err(ApiError::BadRequest)?;
    let board = state.board_service().create_board(dto).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn update_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> ApiResult<Json<BoardEntity>> {
    let id = parse_id(&id)?;
    let dto = UpdateBoardDto::create(&merge(
        body,
        [("id", json!(id)), ("userId", json!(user.id))],
    ))
    .map_err(ApiError::BadRequest)?;

    Ok(Json(state.board_service().update_board(dto).await?))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<BoardEntity>> {
    let board = state.board_service().delete_board(parse_id(&id)?, user.id).await?;
    Ok(Json(board))
}
