//! # Kanban Shared Library
//!
//! Types and logic shared by the Kanban API server and the reminder worker.
//!
//! ## Module Organization
//!
//! - `dtos`: request payload validation
//! - `entities`: typed response objects built from persisted rows
//! - `models`: database rows and queries
//! - `db`: connection pool and migrations
//! - `auth`: password hashing and JWT tokens
//! - `push`: VAPID web push delivery
//! - `error`: domain error kinds

pub mod auth;
pub mod db;
pub mod dtos;
pub mod entities;
pub mod error;
pub mod models;
pub mod push;

pub use error::{DomainError, DomainResult};

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
