/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - create an account, returns `{user, token}`
/// - `POST /api/auth/login` - returns `{user, token}`
/// - `PUT /api/auth/update` - multipart `name`, `password`, `image`
/// - `POST /api/auth/renew-token` - body `{token}`
/// - `GET /api/auth/validate-email/:token` - HTML
/// - `GET|POST /api/auth/request-password-change` - email from body or query
/// - `GET /api/auth/new-password/:token` - HTML form
/// - `POST /api/auth/change-password` - JSON or the HTML form's submission

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use kanban_shared::{
    dtos::auth::{
        ChangePasswordDto, LoginUserDto, RegisterUserDto, RequestPasswordChangeDto,
        UpdateUserDto,
    },
    entities::UserEntity,
    DomainError,
};
use serde_json::{json, Value};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{is_form, merge, overlay, Payload, QueryObject},
    html,
    middleware::auth::AuthUser,
    services::auth::AuthResponse,
};

/// Token failures on the landing pages render the expired-link page
fn expired_page() -> Response {
    (StatusCode::UNAUTHORIZED, Html(html::expired_token())).into_response()
}

fn is_token_failure(err: &DomainError) -> bool {
    matches!(err, DomainError::Unauthorized(_) | DomainError::NotFound(_))
}

pub async fn register(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let dto = RegisterUserDto::create(&body).map_err(ApiError::BadRequest)?;
    let response = state.auth_service().register_user(dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> ApiResult<Json<AuthResponse>> {
    let dto = LoginUserDto::create(&body).map_err(ApiError::BadRequest)?;
    let response = state.auth_service().login_user(dto).await?;
    Ok(Json(response))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UserEntity>> {
    let mut form = super::read_multipart(multipart).await?;
    let image = form.take_files("image").into_iter().next();

    let fields = merge(form.fields, [("id", json!(user.id))]);
    let dto = UpdateUserDto::create(&fields, image).map_err(ApiError::BadRequest)?;
    if dto.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let updated = state.auth_service().update_user(dto).await?;
    Ok(Json(updated))
}

pub async fn renew_token(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> ApiResult<Json<AuthResponse>> {
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing token".to_string()))?;

    let response = state.auth_service().renew_token(token).await?;
    Ok(Json(response))
}

pub async fn validate_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Response> {
    match state.auth_service().validate_email(&token).await {
        Ok(()) => Ok(Html(html::email_validated()).into_response()),
        Err(e) if is_token_failure(&e) => Ok(expired_page()),
        Err(e) => Err(e.into()),
    }
}

pub async fn request_password_change(
    State(state): State<AppState>,
    QueryObject(query): QueryObject,
    Payload(body): Payload,
) -> ApiResult<Json<Value>> {
    let dto = RequestPasswordChangeDto::create(&overlay(query, body)).map_err(ApiError::BadRequest)?;
    state.auth_service().request_password_change(&dto.email).await?;
    Ok(Json(json!({ "message": "Email sent" })))
}

pub async fn new_password_page(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Response> {
    match state.auth_service().validate_password_token(&token).await {
        Ok(_) => Ok(Html(html::change_password(&token)).into_response()),
        Err(e) if is_token_failure(&e) => Ok(expired_page()),
        Err(e) => Err(e.into()),
    }
}

/// Answers HTML to the reset form and JSON to API clients
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Payload(body): Payload,
) -> ApiResult<Response> {
    let from_form = is_form(&headers);
    let dto = ChangePasswordDto::create(&body).map_err(ApiError::BadRequest)?;

    match state.auth_service().change_password(dto).await {
        Ok(()) if from_form => Ok(Html(html::password_changed()).into_response()),
        Ok(()) => Ok(Json(json!({ "message": "Password updated" })).into_response()),
        Err(e) if from_form && is_token_failure(&e) => Ok(expired_page()),
        Err(e) => Err(e.into()),
    }
}
