use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::DomainResult;

/// Public view of an account; the password hash never reaches it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_validated: bool,
    pub image: Option<String>,
    pub is_active: bool,
}

impl UserEntity {
    /// Requires `id`/`_id`, `name` and `email`
    pub fn from_object(object: &Value) -> DomainResult<Self> {
        let id = super::id(object)?;
        let name = super::required_text(object, "name")?;
        let email = super::required_text(object, "email")?;

        Ok(Self {
            id,
            name,
            email,
            email_validated: super::boolean(object, "emailValidated", false),
            image: super::optional_text(object, "image"),
            is_active: super::boolean(object, "isActive", true),
        })
    }
}
