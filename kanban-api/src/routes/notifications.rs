/// Web-push subscription endpoints
///
/// - `POST /api/notifications/subscription` - store `{endpoint, keys: {p256dh, auth}}`
/// - `DELETE /api/notifications/subscription` - remove `{endpoint}`
/// - `GET /api/notifications/vapid-public-key` - key for `pushManager.subscribe`

use axum::{extract::State, http::StatusCode, Extension, Json};
use kanban_shared::dtos::push::{PushSubscriptionDto, RemovePushSubscriptionDto};
use serde_json::{json, Value};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{merge, Payload},
    middleware::auth::AuthUser,
};

pub async fn subscribe(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(body): Payload,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let dto = PushSubscriptionDto::create(&merge(body, [("userId", json!(user.id))]))
        .map_err(ApiError::BadRequest)?;

    let subscription = state.push_subscription_service().subscribe(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "endpoint": subscription.endpoint, "createdAt": subscription.created_at })),
    ))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(body): Payload,
) -> ApiResult<Json<Value>> {
    let dto = RemovePushSubscriptionDto::create(&merge(body, [("userId", json!(user.id))]))
        .map_err(ApiError::BadRequest)?;

    state.push_subscription_service().unsubscribe(dto).await?;
    Ok(Json(json!({ "message": "Subscription removed" })))
}

pub async fn vapid_public_key(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let push = state.config.push.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Push notifications are not configured".to_string())
    })?;

    Ok(Json(json!({ "publicKey": push.public_key })))
}
