//! # Kanban API Server Library
//!
//! HTTP and WebSocket front end of the Kanban backend.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request payload extractors
//! - `mailer`: Outgoing email backends and templates
//! - `middleware`: Authentication and security headers
//! - `notifications`: WebSocket gateway
//! - `routes`: API route handlers
//! - `services`: Business operations

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod html;
pub mod mailer;
pub mod middleware;
pub mod notifications;
pub mod routes;
pub mod services;
