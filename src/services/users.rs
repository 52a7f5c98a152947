//! Account registration and credential login.

use crate::{
    auth::{self, hash_password, verify_password},
    config::AppConfig,
    db::DbPool,
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            phone_number: model.phone_number,
            is_admin: model.is_admin,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            event_sender,
            config,
        }
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, ServiceError> {
        request.validate()?;
        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();

        let result = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(request.username),
            email: Set(request.email.to_lowercase()),
            password_hash: Set(password_hash),
            full_name: Set(request.full_name),
            phone_number: Set(request.phone_number),
            is_admin: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.db)
        .await;

        let model = result.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("Username or email is already registered".to_string())
            } else {
                ServiceError::DatabaseError(e)
            }
        })?;

        info!(user_id = %model.id, "User registered");
        self.event_sender
            .publish(Event::UserRegistered(model.id))
            .await;
        Ok(model.into())
    }

    /// Verifies credentials and issues a signed token. Failures are
    /// reported identically whether the account exists or not.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ServiceError> {
        request.validate()?;
        let model = UserEntity::find()
            .filter(user::Column::Username.eq(request.username.clone()))
            .filter(user::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?;

        let model = match model {
            Some(m) if verify_password(&request.password, &m.password_hash)? => m,
            _ => {
                warn!("Login rejected");
                return Err(ServiceError::Unauthorized(
                    "Invalid username or password".to_string(),
                ));
            }
        };

        let token = auth::issue_token(&self.config, model.id, &model.username, model.is_admin)?;
        Ok(LoginResponse {
            token,
            user: model.into(),
        })
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserResponse, ServiceError> {
        let model = self.find_user(user_id).await?;
        Ok(model.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, ServiceError> {
        request.validate()?;
        let model = self.find_user(user_id).await?;

        let mut active = model.into_active_model();
        if let Some(full_name) = request.full_name {
            active.full_name = Set(Some(full_name));
        }
        if let Some(phone) = request.phone_number {
            active.phone_number = Set(Some(phone));
        }
        if let Some(password) = request.password {
            active.password_hash = Set(hash_password(&password)?);
        }
        active.updated_at = Set(Some(Utc::now()));
        Ok(active.update(&*self.db).await?.into())
    }

    async fn find_user(&self, user_id: Uuid) -> Result<user::Model, ServiceError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| ServiceError::NotFound(format!("User with ID {} not found", user_id)))
    }
}
