/// Bearer token authentication
///
/// `jwt_auth_layer` validates `Authorization: Bearer <token>`, loads the user
/// and inserts an [`AuthUser`] into the request extensions. Handlers read it
/// with `Extension<AuthUser>`.
///
/// `require_validated_email` runs after it on the board, task and label
/// routes and rejects accounts whose email has not been confirmed yet.
///
/// # Errors
///
/// - missing or malformed header, bad or expired token → 401
/// - user deleted or disabled → 401
/// - email not validated → 403 `Email not validated`

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use kanban_shared::{
    auth::jwt::{self, TokenType},
    models::user::User,
    DomainError,
};
use uuid::Uuid;

use crate::{app::AppState, error::ApiError};

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub email_validated: bool,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            email_validated: user.email_validated,
        }
    }
}

/// Validates an access token and loads its active user
///
/// Shared by the HTTP middleware and the WebSocket handshake.
pub async fn authenticate(state: &AppState, token: &str) -> Result<User, ApiError> {
    let claims = jwt::validate_token(token, state.jwt_seed(), TokenType::Access)
        .map_err(DomainError::from)?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("User is disabled".to_string()));
    }

    Ok(user)
}

/// JWT authentication middleware layer
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let user = authenticate(&state, token).await?;
    tracing::debug!(user_id = %user.id, "Request authenticated");

    req.extensions_mut().insert(AuthUser::from(&user));

    Ok(next.run(req).await)
}

/// Rejects callers whose email is not validated
///
/// Must be layered inside `jwt_auth_layer`.
pub async fn require_validated_email(req: Request, next: Next) -> Result<Response, ApiError> {
    let validated = req
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.email_validated)
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    if !validated {
        return Err(ApiError::Forbidden("Email not validated".to_string()));
    }

    Ok(next.run(req).await)
}
