/// Label endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanban_shared::{
    dtos::label::{CreateLabelDto, GetLabelsDto, UpdateLabelDto},
    entities::LabelEntity,
};
use serde_json::json;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{merge, overlay, parse_id, Payload, QueryObject},
    middleware::auth::AuthUser,
    services::label::LabelPage,
};

pub async fn list_labels(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryObject(query): QueryObject,
    Payload(body): Payload,
) -> ApiResult<Json<LabelPage>> {
    let object = merge(overlay(body, query), [("userId", json!(user.id))]);
    let dto = GetLabelsDto::create(&object).map_err(ApiError::BadRequest)?;
    Ok(Json(state.label_service().get_labels(dto).await?))
}

pub async fn get_label(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<LabelEntity>> {
    let label = state.label_service().get_label(parse_id(&id)?, user.id).await?;
    Ok(Json(label))
}

pub async fn create_label(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryObject(query): QueryObject,
    Payload(body): Payload,
) -> ApiResult<(StatusCode, Json<LabelEntity>)> {
    let object = merge(overlay(query, body), [("userId", json!(user.id))]);
    let dto = CreateLabelDto::create(&object).map_err(ApiError::BadRequest)?;
    let label = state.label_service().create_label(dto).await?;
    Ok((StatusCode::CREATED, Json(label)))
}

pub async fn update_label(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> ApiResult<Json<LabelEntity>> {
    let id = parse_id(&id)?;
    let dto = UpdateLabelDto::create(&merge(
        body,
        [("id", json!(id)), ("userId", json!(user.id))],
    ))
    .map_err(ApiError::BadRequest)?;

    Ok(Json(state.label_service().update_label(dto).await?))
}

pub async fn delete_label(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<LabelEntity>> {
    let label = state.label_service().delete_label(parse_id(&id)?, user.id).await?;
    Ok(Json(label))
}
