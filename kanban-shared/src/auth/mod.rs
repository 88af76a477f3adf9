/// Authentication primitives
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: typed HS256 tokens (access, email validation, password reset)
///
/// Request-level concerns (extracting the bearer token, loading the user)
/// live in the API crate's auth middleware.

pub mod jwt;
pub mod password;
