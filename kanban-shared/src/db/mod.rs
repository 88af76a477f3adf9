/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a health check
/// - `migrations`: embedded schema migrations
///
/// Row types and queries live in [`crate::models`].

pub mod migrations;
pub mod pool;
