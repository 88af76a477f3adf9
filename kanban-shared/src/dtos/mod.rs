/// Request DTOs
///
/// Every DTO is built by a `create(&Value)` constructor that turns an untyped
/// request payload into an immutable typed value, or returns the message of
/// the first rule it breaks. Validation is synchronous and does no I/O; the
/// controller lifts the message into a 400 response.
///
/// # Example
///
/// ```
/// use kanban_shared::dtos::board::CreateBoardDto;
/// use serde_json::json;
///
/// let err = CreateBoardDto::create(&json!({ "name": "Board" })).unwrap_err();
/// assert_eq!(err, "Missing user");
/// ```

pub mod auth;
pub mod board;
pub mod fields;
pub mod label;
pub mod pagination;
pub mod push;
pub mod task;
