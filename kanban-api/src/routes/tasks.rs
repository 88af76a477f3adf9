/// Task endpoints
///
/// `boardId` may come from the query string or the body. On listing the
/// query wins, on creation the body does.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanban_shared::{
    dtos::task::{CreateTaskDto, GetTasksDto, UpdateTaskDto},
    entities::TaskEntity,
};
use serde_json::json;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{merge, overlay, parse_id, Payload, QueryObject},
    middleware::auth::AuthUser,
    services::task::TaskPage,
};

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryObject(query): QueryObject,
    Payload(body): Payload,
) -> ApiResult<Json<TaskPage>> {
    let object = merge(overlay(body, query), [("userId", json!(user.id))]);
    let dto = GetTasksDto::create(&object).map_err(ApiError::BadRequest)?;
    Ok(Json(state.task_service().get_tasks(dto).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskEntity>> {
    let task = state.task_service().get_task(parse_id(&id)?, user.id).await?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryObject(query): QueryObject,
    Payload(body): Payload,
) -> ApiResult<(StatusCode, Json<TaskEntity>)> {
    let object = merge(overlay(query, body), [("userId", json!(user.id))]);
    let dto = CreateTaskDto::create(&object).map_err(ApiError::BadRequest)?;
    let task = state.task_service().create_task(dto).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> ApiResult<Json<TaskEntity>> {
    let id = parse_id(&id)?;
    let dto = UpdateTaskDto::create(&merge(
        body,
        [("id", json!(id)), ("userId", json!(user.id))],
    ))
    .map_err(ApiError::BadRequest)?;

    Ok(Json(state.task_service().update_task(dto).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskEntity>> {
    let task = state.task_service().delete_task(parse_id(&id)?, user.id).await?;
    Ok(Json(task))
}
