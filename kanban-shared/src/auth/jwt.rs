/// JWT token generation and validation module
///
/// Tokens are signed using HS256 (HMAC-SHA256) with the configured seed and
/// carry the user id as subject plus a token type, so a link token mailed for
/// email validation can never be replayed as a bearer token.
///
/// # Token Types
///
/// - **Access**: bearer token for the REST API and the WebSocket gateway (24h)
/// - **EmailValidation**: embedded in the verification link (24h)
/// - **PasswordReset**: embedded in the password reset link (1h)
///
/// # Example
///
/// ```
/// use kanban_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key", TokenType::Access)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "kanban";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is valid but was issued for another purpose
    #[error("Wrong token type: expected {expected}, got {actual}")]
    WrongType { expected: String, actual: String },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    EmailValidation,
    PasswordReset,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::EmailValidation => Duration::hours(24),
            TokenType::PasswordReset => Duration::hours(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::EmailValidation => "email_validation",
            TokenType::PasswordReset => "password_reset",
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "kanban"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// What the token may be used for
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with the default expiration for `token_type`
    pub fn new(user_id: Uuid, token_type: TokenType) -> Self {
        let now = Utc::now();
        let expiration = now + token_type.default_expiration();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }
}

/// Creates a signed JWT token from claims
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Shorthand for `create_token(&Claims::new(user_id, token_type), secret)`
pub fn issue(user_id: Uuid, token_type: TokenType, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id, token_type), secret)
}

/// Validates a JWT token and checks it was issued as `expected`
///
/// Verifies signature, expiration, not-before, issuer and token type.
pub fn validate_token(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    let claims = token_data.claims;
    if claims.token_type != expected {
        return Err(JwtError::WrongType {
            expected: expected.as_str().to_string(),
            actual: claims.token_type.as_str().to_string(),
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::PasswordReset.default_expiration(), Duration::hours(1));
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let token = issue(user_id, TokenType::Access, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET, TokenType::Access).expect("Should validate");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, "kanban");
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = issue(Uuid::new_v4(), TokenType::Access, "secret1").unwrap();
        assert!(validate_token(&token, "wrong-secret", TokenType::Access).is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let mut claims = Claims::new(Uuid::new_v4(), TokenType::Access);
        claims.exp = claims.iat - 3600;

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET, TokenType::Access);
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_link_tokens_are_not_bearer_tokens() {
        let token = issue(Uuid::new_v4(), TokenType::EmailValidation, SECRET).unwrap();

        let result = validate_token(&token, SECRET, TokenType::Access);
        assert!(matches!(result.unwrap_err(), JwtError::WrongType { .. }));
        assert!(validate_token(&token, SECRET, TokenType::EmailValidation).is_ok());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = validate_token("not.a.jwt", SECRET, TokenType::Access);
        assert!(matches!(result.unwrap_err(), JwtError::ValidationError(_)));
    }
}
