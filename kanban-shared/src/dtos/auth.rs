/// Authentication request DTOs
///
/// Each constructor takes the raw request payload and short-circuits on the
/// first failing rule with a single message.

use serde_json::Value;
use uuid::Uuid;
use validator::ValidateEmail;

use super::fields;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn is_valid_email(email: &str) -> bool {
    email.to_string().validate_email()
}

fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password too short".to_string());
    }
    Ok(())
}

/// Registration payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserDto {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterUserDto {
    /// Validates `{ name, email, password }`
    ///
    /// ```
    /// use kanban_shared::dtos::auth::RegisterUserDto;
    /// use serde_json::json;
    ///
    /// let err = RegisterUserDto::create(&json!({ "email": "a@b.com", "password": "123456" }));
    /// assert_eq!(err.unwrap_err(), "Missing name");
    /// ```
    pub fn create(object: &Value) -> Result<Self, String> {
        let name = fields::text(object, "name").ok_or("Missing name")?;
        let email = fields::text(object, "email").ok_or("Missing email")?;
        if !is_valid_email(&email) {
            return Err("Email is not valid".to_string());
        }
        let password = fields::text(object, "password").ok_or("Missing password")?;
        check_password(&password)?;

        Ok(Self {
            name,
            email,
            password,
        })
    }
}

/// Login payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUserDto {
    pub email: String,
    pub password: String,
}

impl LoginUserDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let email = fields::text(object, "email").ok_or("Missing email")?;
        if !is_valid_email(&email) {
            return Err("Email is not valid".to_string());
        }
        let password = fields::text(object, "password").ok_or("Missing password")?;
        check_password(&password)?;

        Ok(Self { email, password })
    }
}

/// An uploaded image attached to a profile update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-side file name, used only for its extension
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Profile update: any of name, password or image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub password: Option<String>,
    pub image: Option<ImageUpload>,
}

impl UpdateUserDto {
    /// `object` carries the text fields plus `id` (the authenticated user)
    pub fn create(object: &Value, image: Option<ImageUpload>) -> Result<Self, String> {
        let id = fields::required_uuid(object, "id", "id")?;

        let name = if fields::is_present(object, "name") {
            Some(fields::text(object, "name").ok_or("Name cannot be empty")?)
        } else {
            None
        };

        let password = if fields::is_present(object, "password") {
            let password = fields::text(object, "password").ok_or("Password too short")?;
            check_password(&password)?;
            Some(password)
        } else {
            None
        };

        Ok(Self {
            id,
            name,
            password,
            image,
        })
    }

    /// `true` when the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none() && self.image.is_none()
    }
}

/// New password submitted from the reset page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePasswordDto {
    pub token: String,
    pub password: String,
}

impl ChangePasswordDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let token = fields::text(object, "token").ok_or("Missing token")?;
        let password = fields::text(object, "password").ok_or("Missing password")?;
        check_password(&password)?;

        Ok(Self { token, password })
    }
}

/// Address to send a password reset link to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPasswordChangeDto {
    pub email: String,
}

impl RequestPasswordChangeDto {
    pub fn create(object: &Value) -> Result<Self, String> {
        let email = fields::text(object, "email").ok_or("Missing email")?;
        if !is_valid_email(&email) {
            return Err("Email is not valid".to_string());
        }

        Ok(Self { email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(payload: Value) -> Result<RegisterUserDto, String> {
        RegisterUserDto::create(&payload)
    }

    #[test]
    fn test_register_valid() {
        let dto = register(json!({
            "name": "Test",
            "email": "test@test.com",
            "password": "123456"
        }))
        .unwrap();

        assert_eq!(dto.name, "Test");
        assert_eq!(dto.email, "test@test.com");
    }

    #[test]
    fn test_register_messages_in_rule_order() {
        let cases = [
            (json!({}), "Missing name"),
            (json!({ "name": "T" }), "Missing email"),
            (json!({ "name": "T", "email": "not-an-email" }), "Email is not valid"),
            (json!({ "name": "T", "email": "t@test.com" }), "Missing password"),
            (
                json!({ "name": "T", "email": "t@test.com", "password": "12345" }),
                "Password too short",
            ),
        ];

        for (payload, expected) in cases {
            assert_eq!(register(payload).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_register_short_circuits_on_first_failure() {
        // Both name and email are bad; only the first rule is reported
        let err = register(json!({ "email": "bad", "password": "1" })).unwrap_err();
        assert_eq!(err, "Missing name");
    }

    #[test]
    fn test_login() {
        assert!(LoginUserDto::create(&json!({ "email": "a@b.com", "password": "123456" })).is_ok());
        assert_eq!(
            LoginUserDto::create(&json!({ "password": "123456" })).unwrap_err(),
            "Missing email"
        );
        assert_eq!(
            LoginUserDto::create(&json!({ "email": "a@b.com" })).unwrap_err(),
            "Missing password"
        );
    }

    #[test]
    fn test_update_user() {
        let id = Uuid::new_v4();

        let dto = UpdateUserDto::create(&json!({ "id": id.to_string(), "name": "New" }), None).unwrap();
        assert_eq!(dto.name.as_deref(), Some("New"));
        assert!(dto.password.is_none());
        assert!(!dto.is_empty());

        assert_eq!(
            UpdateUserDto::create(&json!({ "name": "New" }), None).unwrap_err(),
            "Missing id"
        );
        assert_eq!(
            UpdateUserDto::create(&json!({ "id": id.to_string(), "name": "" }), None).unwrap_err(),
            "Name cannot be empty"
        );
        assert_eq!(
            UpdateUserDto::create(&json!({ "id": id.to_string(), "password": "123" }), None)
                .unwrap_err(),
            "Password too short"
        );
    }

    #[test]
    fn test_change_password() {
        assert_eq!(
            ChangePasswordDto::create(&json!({ "password": "123456" })).unwrap_err(),
            "Missing token"
        );
        assert!(ChangePasswordDto::create(&json!({ "token": "t", "password": "123456" })).is_ok());
    }

    #[test]
    fn test_request_password_change() {
        assert_eq!(
            RequestPasswordChangeDto::create(&json!({})).unwrap_err(),
            "Missing email"
        );
        assert_eq!(
            RequestPasswordChangeDto::create(&json!({ "email": "nope" })).unwrap_err(),
            "Email is not valid"
        );
        assert_eq!(
            RequestPasswordChangeDto::create(&json!({ "email": "a@b.com" })).unwrap().email,
            "a@b.com"
        );
    }
}
