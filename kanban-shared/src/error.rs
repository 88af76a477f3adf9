/// Domain error kinds shared by entities and services
///
/// Services never speak HTTP. They return a [`DomainError`] whose kind the
/// controller layer maps onto a status code:
///
/// | Kind           | HTTP |
/// |----------------|------|
/// | `Validation`   | 400  |
/// | `Unauthorized` | 401  |
/// | `Forbidden`    | 403  |
/// | `NotFound`     | 404  |
/// | `Conflict`     | 409  |
/// | `Internal`     | 500  |
///
/// # Example
///
/// ```
/// use kanban_shared::error::DomainError;
///
/// let err = DomainError::not_found("Board not found");
/// assert_eq!(err.to_string(), "Board not found");
/// ```

/// Result alias used by services and entity factories
pub type DomainResult<T> = Result<T, DomainError>;

/// Structured error carrying a kind and a human-readable message
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Malformed input or a violated entity invariant
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to touch the resource
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (duplicate email, ...)
    #[error("{0}")]
    Conflict(String),

    /// Anything else. The message is for logs only.
    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        DomainError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        DomainError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Translate persistence failures into domain kinds
///
/// - `RowNotFound` → `NotFound`
/// - unique violations → `Conflict` (`Email already exists` for the users email key)
/// - foreign key violations → `NotFound` (the referenced row is gone)
/// - everything else → `Internal`
impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    if let Some(constraint) = db_err.constraint() {
                        if constraint.contains("email") {
                            return DomainError::Conflict("Email already exists".to_string());
                        }
                        return DomainError::Conflict(format!(
                            "Constraint violation: {}",
                            constraint
                        ));
                    }
                    return DomainError::Conflict("Resource already exists".to_string());
                }

                if db_err.is_foreign_key_violation() {
                    return DomainError::NotFound("Referenced resource not found".to_string());
                }

                DomainError::Internal(format!("Database error: {}", db_err))
            }
            _ => DomainError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<crate::auth::password::PasswordError> for DomainError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        DomainError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<crate::auth::jwt::JwtError> for DomainError {
    fn from(err: crate::auth::jwt::JwtError) -> Self {
        use crate::auth::jwt::JwtError;

        match err {
            JwtError::CreateError(msg) => DomainError::Internal(msg),
            JwtError::Expired => DomainError::Unauthorized("Token expired".to_string()),
            _ => DomainError::Unauthorized("Invalid token".to_string()),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Internal(format!("Serialization failed: {}", err))
    }
}
