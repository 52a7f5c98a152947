//! Registration, login, and profile endpoints.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, success_response};
use crate::services::users::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::AppState;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username or email taken", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.register(payload).await?;
    Ok(created_response(user))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state.services.users.login(payload).await?;
    Ok(success_response(response))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Profile returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let profile = state.services.users.get_profile(user.user_id).await?;
    Ok(success_response(profile))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let profile = state
        .services
        .users
        .update_profile(user.user_id, payload)
        .await?;
    Ok(success_response(profile))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/me", put(update_me))
}
