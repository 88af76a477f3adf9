//! Real-time notification gateway
//!
//! Authenticated WebSocket clients connect to `GET /ws?token=<jwt>` and are
//! registered under their user id. Services call
//! [`NotificationGateway::broadcast`] after every board, task or label
//! mutation; each open connection of the listed users receives
//!
//! ```json
//! { "event": "task:updated", "payload": { ... } }
//! ```
//!
//! Delivery is best effort: no acknowledgement, no replay, and a connection
//! whose send queue is full or closed simply misses the message.

pub mod gateway;
pub mod socket;

pub use gateway::{NotificationEvent, NotificationGateway};
