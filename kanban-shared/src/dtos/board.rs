//! Board request DTOs

use serde_json::Value;
use uuid::Uuid;

use super::fields;
use super::pagination::PaginationDto;

/// Listing filter for the caller's boards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBoardsDto {
    pub user_id: Uuid,
    pub is_active: bool,
    pub pagination: PaginationDto,
}

impl GetBoardsDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let is_active = fields::flag(object, "isActive", true);
        let pagination = PaginationDto::create(object)?;

        Ok(Self {
            user_id,
            is_active,
            pagination,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBoardDto {
    pub user_id: Uuid,
    pub name: String,
}

impl CreateBoardDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let name = fields::text(object, "name").ok_or("Missing name")?;

        Ok(Self { user_id, name })
    }
}

/// Partial board update; `None` leaves a field untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBoardDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateBoardDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let id = fields::required_uuid(object, "id", "id")?;
        let user_id = fields::required_uuid(object, "userId", "user")?;

        let name = if fields::is_present(object, "name") {
            Some(fields::text(object, "name").ok_or("Name cannot be empty")?)
        } else {
            None
        };

        Ok(Self {
            id,
            user_id,
            name,
            is_active: fields::optional_flag(object, "isActive"),
        })
    }
}
