/// Middleware for the API server
///
/// - `auth`: bearer token authentication and the validated-email gate
/// - `security`: security response headers

pub mod auth;
pub mod security;
