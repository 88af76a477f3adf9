//! # Kanban Reminder Worker
//!
//! Delivers web-push reminders for tasks whose reminder time has come.
//!
//! ## Modules
//!
//! - `config`: environment configuration
//! - `reminders`: claims due reminders from the tasks table
//! - `dispatcher`: poll loop and push delivery

pub mod config;
pub mod dispatcher;
pub mod reminders;
