//! Theatre, screen, and seat administration endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, pagination, success_response};
use crate::services::theatres::{
    CreateScreenRequest, CreateSeatRequest, CreateTheatreRequest, TheatreFilters,
    UpdateTheatreRequest,
};
use crate::{AppState, PaginatedResponse};

#[derive(Debug, Deserialize)]
pub struct TheatreListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub city: Option<String>,
    pub include_inactive: Option<bool>,
}

/// List theatres
#[utoipa::path(
    get,
    path = "/api/v1/theatres",
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("city" = Option<String>, Query, description = "Filter by city"),
        ("include_inactive" = Option<bool>, Query, description = "Include inactive theatres")
    ),
    responses((status = 200, description = "Theatres returned")),
    tag = "theatres"
)]
pub async fn list_theatres(
    State(state): State<AppState>,
    Query(query): Query<TheatreListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination(&state, query.page, query.limit);
    let filters = TheatreFilters {
        city: query.city,
        include_inactive: query.include_inactive,
    };
    let (theatres, total) = state
        .services
        .theatres
        .list_theatres(filters, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        theatres, total, page, limit,
    )))
}

/// Get one theatre
#[utoipa::path(
    get,
    path = "/api/v1/theatres/:id",
    params(("id" = Uuid, Path, description = "Theatre ID")),
    responses(
        (status = 200, description = "Theatre returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "theatres"
)]
pub async fn get_theatre(
    State(state): State<AppState>,
    Path(theatre_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let theatre = state.services.theatres.get_theatre(theatre_id).await?;
    Ok(success_response(theatre))
}

/// Create a theatre (admin)
#[utoipa::path(
    post,
    path = "/api/v1/theatres",
    responses(
        (status = 201, description = "Theatre created"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "theatres"
)]
pub async fn create_theatre(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateTheatreRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let theatre = state.services.theatres.create_theatre(payload).await?;
    Ok(created_response(theatre))
}

/// Update a theatre (admin)
#[utoipa::path(
    put,
    path = "/api/v1/theatres/:id",
    params(("id" = Uuid, Path, description = "Theatre ID")),
    responses(
        (status = 200, description = "Theatre updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "theatres"
)]
pub async fn update_theatre(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(theatre_id): Path<Uuid>,
    Json(payload): Json<UpdateTheatreRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let theatre = state
        .services
        .theatres
        .update_theatre(theatre_id, payload)
        .await?;
    Ok(success_response(theatre))
}

/// Screens of a theatre
#[utoipa::path(
    get,
    path = "/api/v1/theatres/:id/screens",
    params(("id" = Uuid, Path, description = "Theatre ID")),
    responses(
        (status = 200, description = "Screens returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "theatres"
)]
pub async fn list_screens(
    State(state): State<AppState>,
    Path(theatre_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let screens = state.services.theatres.list_screens(theatre_id).await?;
    Ok(success_response(screens))
}

/// Add a screen with its seat grid (admin)
#[utoipa::path(
    post,
    path = "/api/v1/theatres/:id/screens",
    params(("id" = Uuid, Path, description = "Theatre ID")),
    responses(
        (status = 201, description = "Screen created"),
        (status = 409, description = "Screen name taken", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "theatres"
)]
pub async fn create_screen(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(theatre_id): Path<Uuid>,
    Json(payload): Json<CreateScreenRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let screen = state
        .services
        .theatres
        .create_screen(theatre_id, payload)
        .await?;
    Ok(created_response(screen))
}

/// Seats of a screen
#[utoipa::path(
    get,
    path = "/api/v1/screens/:id/seats",
    params(("id" = Uuid, Path, description = "Screen ID")),
    responses(
        (status = 200, description = "Seats returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "theatres"
)]
pub async fn list_seats(
    State(state): State<AppState>,
    Path(screen_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let seats = state.services.theatres.list_seats(screen_id).await?;
    Ok(success_response(seats))
}

/// Add a single seat to a screen (admin)
#[utoipa::path(
    post,
    path = "/api/v1/screens/:id/seats",
    params(("id" = Uuid, Path, description = "Screen ID")),
    responses(
        (status = 201, description = "Seat created"),
        (status = 409, description = "Seat position taken", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "theatres"
)]
pub async fn create_seat(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(screen_id): Path<Uuid>,
    Json(payload): Json<CreateSeatRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let seat = state
        .services
        .theatres
        .create_seat(screen_id, payload)
        .await?;
    Ok(created_response(seat))
}

pub fn theatre_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_theatres))
        .route("/", post(create_theatre))
        .route("/:id", get(get_theatre))
        .route("/:id", put(update_theatre))
        .route("/:id/screens", get(list_screens))
        .route("/:id/screens", post(create_screen))
}

pub fn screen_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/seats", get(list_seats))
        .route("/:id/seats", post(create_seat))
}
