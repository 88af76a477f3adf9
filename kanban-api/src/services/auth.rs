//! Account operations
//!
//! Registration, login, profile updates and the two emailed-token flows
//! (address validation and password reset). Tokens are typed JWTs, so an
//! access token cannot be replayed as a reset token.

use std::sync::Arc;

use kanban_shared::{
    auth::{
        jwt::{self, TokenType},
        password,
    },
    dtos::auth::{ChangePasswordDto, LoginUserDto, RegisterUserDto, UpdateUserDto},
    entities::UserEntity,
    models::user::{CreateUser, UpdateUser, User},
    DomainError, DomainResult,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::FileUploadService;
use crate::{
    config::Config,
    mailer::{templates, Mailer},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const PROFILE_FOLDER: &str = "users";

/// Body of register, login and renew-token responses
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserEntity,
    pub token: String,
}

pub(crate) fn user_entity(user: &User) -> DomainResult<UserEntity> {
    UserEntity::from_object(&serde_json::to_value(user)?)
}

/// Argon2 is CPU bound; keep it off the reactor
async fn hash(plain: String) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| DomainError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(DomainError::from)
}

async fn verify(plain: String, hash: String) -> DomainResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| DomainError::internal(format!("Verification task failed: {}", e)))?
        .map_err(DomainError::from)
}

pub struct AuthService {
    db: PgPool,
    config: Arc<Config>,
    mailer: Arc<dyn Mailer>,
    uploads: FileUploadService,
}

impl AuthService {
    pub fn new(
        db: PgPool,
        config: Arc<Config>,
        mailer: Arc<dyn Mailer>,
        uploads: FileUploadService,
    ) -> Self {
        Self {
            db,
            config,
            mailer,
            uploads,
        }
    }

    fn seed(&self) -> &str {
        &self.config.jwt.seed
    }

    fn link(&self, path: &str, token: &str) -> String {
        format!(
            "{}/api/auth/{}/{}",
            self.config.server.web_service_url.trim_end_matches('/'),
            path,
            token
        )
    }

    fn respond(&self, user: &User) -> DomainResult<AuthResponse> {
        Ok(AuthResponse {
            user: user_entity(user)?,
            token: jwt::issue(user.id, TokenType::Access, self.seed())?,
        })
    }

    async fn active_user(&self, id: Uuid) -> DomainResult<User> {
        let user = User::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::unauthorized("User not found"))?;

        if !user.is_active {
            return Err(DomainError::unauthorized("User is disabled"));
        }
        Ok(user)
    }

    /// Creates the account and mails the validation link
    ///
    /// If the email cannot be sent the account is removed again so the
    /// address can register once more.
    #[tracing::instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn register_user(&self, dto: RegisterUserDto) -> DomainResult<AuthResponse> {
        let password_hash = hash(dto.password).await?;

        let user = User::create(
            &self.db,
            CreateUser {
                name: dto.name,
                email: dto.email,
                password: password_hash,
            },
        )
        .await?;

        if let Err(e) = self.send_validation_email(&user).await {
            tracing::error!(user_id = %user.id, error = %e, "Validation email failed, rolling back registration");
            User::delete(&self.db, user.id).await?;
            return Err(e);
        }

        tracing::info!(user_id = %user.id, "User registered");
        self.respond(&user)
    }

    async fn send_validation_email(&self, user: &User) -> DomainResult<()> {
        let token = jwt::issue(user.id, TokenType::EmailValidation, self.seed())?;
        let email = templates::email_validation(
            &user.email,
            &user.name,
            &self.link("validate-email", &token),
        );

        self.mailer
            .send(&email)
            .await
            .map_err(|e| DomainError::internal(format!("Error sending email: {}", e)))
    }

    #[tracing::instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn login_user(&self, dto: LoginUserDto) -> DomainResult<AuthResponse> {
        let user = User::find_by_email(&self.db, &dto.email)
            .await?
            .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

        if !user.is_active {
            return Err(DomainError::unauthorized("User is disabled"));
        }

        if !verify(dto.password, user.password.clone()).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        self.respond(&user)
    }

    /// Changes name, password or profile image
    ///
    /// A new image replaces the previous file, which is deleted afterwards.
    /// When the update fails the new file is removed instead.
    #[tracing::instrument(skip(self, dto), fields(user_id = %dto.id))]
    pub async fn update_user(&self, dto: UpdateUserDto) -> DomainResult<UserEntity> {
        let current = self.active_user(dto.id).await?;

        let password = match dto.password {
            Some(plain) => Some(hash(plain).await?),
            None => None,
        };
        let stored = match dto.image {
            Some(file) => Some(self.uploads.upload_single(PROFILE_FOLDER, file).await?),
            None => None,
        };
        let replaced_image = stored.is_some();

        let updated = User::update(
            &self.db,
            current.id,
            UpdateUser {
                name: dto.name,
                password,
                image: stored.clone().map(Some),
                ..Default::default()
            },
        )
        .await
        .map_err(DomainError::from)
        .and_then(|user| user.ok_or_else(|| DomainError::not_found("User not found")));
        let user = self
            .uploads
            .discard_on_error(PROFILE_FOLDER, stored.as_deref(), updated)
            .await?;

        if replaced_image {
            if let Some(previous) = current.image.as_deref() {
                self.uploads.remove(PROFILE_FOLDER, previous).await;
            }
        }

        user_entity(&user)
    }

    /// Trades a still-valid access token for a fresh one
    pub async fn renew_token(&self, token: &str) -> DomainResult<AuthResponse> {
        let claims = jwt::validate_token(token, self.seed(), TokenType::Access)?;
        let user = self.active_user(claims.sub).await?;
        self.respond(&user)
    }

    #[tracing::instrument(skip_all)]
    pub async fn validate_email(&self, token: &str) -> DomainResult<()> {
        let claims = jwt::validate_token(token, self.seed(), TokenType::EmailValidation)?;

        if !User::mark_email_validated(&self.db, claims.sub).await? {
            return Err(DomainError::not_found("User not found"));
        }

        tracing::info!(user_id = %claims.sub, "Email validated");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn request_password_change(&self, email: &str) -> DomainResult<()> {
        let user = User::find_by_email(&self.db, email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        let token = jwt::issue(user.id, TokenType::PasswordReset, self.seed())?;
        let message =
            templates::password_reset(&user.email, &user.name, &self.link("new-password", &token));

        self.mailer
            .send(&message)
            .await
            .map_err(|e| DomainError::internal(format!("Error sending email: {}", e)))
    }

    /// Checks a reset token and returns the user it was issued for
    pub async fn validate_password_token(&self, token: &str) -> DomainResult<Uuid> {
        let claims = jwt::validate_token(token, self.seed(), TokenType::PasswordReset)?;
        let user = self.active_user(claims.sub).await?;
        Ok(user.id)
    }

    #[tracing::instrument(skip_all)]
    pub async fn change_password(&self, dto: ChangePasswordDto) -> DomainResult<()> {
        let user_id = self.validate_password_token(&dto.token).await?;
        let password_hash = hash(dto.password).await?;

        User::update(
            &self.db,
            user_id,
            UpdateUser {
                password: Some(password_hash),
                ..Default::default()
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("User not found"))?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
