//! Label request DTOs

use serde_json::Value;
use uuid::Uuid;

use super::fields;
use super::pagination::PaginationDto;

/// `#RGB` or `#RRGGBB`, hex digits in either case
pub fn is_valid_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetLabelsDto {
    pub user_id: Uuid,
    pub board_id: Uuid,
    pub is_active: bool,
    pub pagination: PaginationDto,
}

impl GetLabelsDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let board_id = fields::required_uuid(object, "boardId", "board")?;
        let is_active = fields::flag(object, "isActive", true);
        let pagination = PaginationDto::create(object)?;

        Ok(Self {
            user_id,
            board_id,
            is_active,
            pagination,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLabelDto {
    pub user_id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub color: String,
}

impl CreateLabelDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let user_id = fields::required_uuid(object, "userId", "user")?;
        let board_id = fields::required_uuid(object, "boardId", "board")?;
        let name = fields::text(object, "name").ok_or("Missing name")?;
        let color = fields::text(object, "color").ok_or("Missing color")?;
        if !is_valid_color(&color) {
            return Err("Color is not valid".to_string());
        }

        Ok(Self {
            user_id,
            board_id,
            name,
            color,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLabelDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateLabelDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let id = fields::required_uuid(object, "id", "id")?;
        let user_id = fields::required_uuid(object, "userId", "user")?;

        let name = if fields::is_present(object, "name") {
            Some(fields::text(object, "name").ok_or("Name cannot be empty")?)
        } else {
            None
        };

        let color = match fields::is_present(object, "color") {
            true => match fields::text(object, "color") {
                Some(color) if is_valid_color(&color) => Some(color),
                _ => return Err("Color is not valid".to_string()),
            },
            false => None,
        };

        Ok(Self {
            id,
            user_id,
            name,
            color,
            is_active: fields::optional_flag(object, "isActive"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_format() {
        assert!(is_valid_color("#fff"));
        assert!(is_valid_color("#A0b1C2"));
        assert!(!is_valid_color("fff"));
        assert!(!is_valid_color("#ffff"));
        assert!(!is_valid_color("#ggg"));
    }

    #[test]
    fn test_create_label_rules() {
        let user = Uuid::new_v4().to_string();
        let board = Uuid::new_v4().to_string();

        assert_eq!(
            CreateLabelDto::create(&json!({ "userId": user })).unwrap_err(),
            "Missing board"
        );
        assert_eq!(
            CreateLabelDto::create(&json!({ "userId": user, "boardId": board, "color": "#fff" }))
                .unwrap_err(),
            "Missing name"
        );
        assert_eq!(
            CreateLabelDto::create(&json!({ "userId": user, "boardId": board, "name": "Bug" }))
                .unwrap_err(),
            "Missing color"
        );
        assert_eq!(
            CreateLabelDto::create(
                &json!({ "userId": user, "boardId": board, "name": "Bug", "color": "red" })
            )
            .unwrap_err(),
            "Color is not valid"
        );

        let dto = CreateLabelDto::create(
            &json!({ "userId": user, "boardId": board, "name": "Bug", "color": "#ff0000" }),
        )
        .unwrap();
        assert_eq!(dto.color, "#ff0000");
    }

    #[test]
    fn test_update_label_color() {
        let base = json!({
            "id": Uuid::new_v4().to_string(),
            "userId": Uuid::new_v4().to_string(),
        });

        let mut payload = base.clone();
        payload["color"] = json!("#123");
        assert_eq!(UpdateLabelDto::create(&payload).unwrap().color.as_deref(), Some("#123"));

        let mut payload = base.clone();
        payload["color"] = json!("");
        assert_eq!(UpdateLabelDto::create(&payload).unwrap_err(), "Color is not valid");

        assert!(UpdateLabelDto::create(&base).unwrap().color.is_none());
    }
}
