//! Show schedule endpoints, including the per-show seat map.

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
use crate::services::shows::{CreateShowRequest, ShowFilters, UpdateShowRequest};
use crate::{AppState, PaginatedResponse};

#[derive(Debug, Deserialize)]
pub struct ShowListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub movie_id: Option<Uuid>,
    pub theatre_id: Option<Uuid>,
    pub date: Option<chrono::NaiveDate>,
}

/// List upcoming shows
#[utoipa::path(
    get,
    path = "/api/v1/shows",
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("movie_id" = Option<Uuid>, Query, description = "Filter by movie"),
        ("theatre_id" = Option<Uuid>, Query, description = "Filter by theatre"),
        ("date" = Option<String>, Query, description = "Filter by date (YYYY-MM-DD)")
    ),
    responses((status = 200, description = "Shows returned")),
    tag = "shows"
)]
pub async fn list_shows(
    State(state): State<AppState>,
    Query(query): Query<ShowListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination(&state, query.page, query.limit);
    let filters = ShowFilters {
        movie_id: query.movie_id,
        theatre_id: query.theatre_id,
        date: query.date,
    };
    let (shows, total) = state
        .services
        .shows
        .list_shows(filters, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        shows, total, page, limit,
    )))
}

/// Get one show
#[utoipa::path(
    get,
    path = "/api/v1/shows/:id",
    params(("id" = Uuid, Path, description = "Show ID")),
    responses(
        (status = 200, description = "Show returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shows"
)]
pub async fn get_show(
    State(state): State<AppState>,
    Path(show_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let show = state.services.shows.get_show(show_id).await?;
    Ok(success_response(show))
}

/// Seat map with availability for a show
#[utoipa::path(
    get,
    path = "/api/v1/shows/:id/seats",
    params(("id" = Uuid, Path, description = "Show ID")),
    responses(
        (status = 200, description = "Seat map returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shows"
)]
pub async fn seat_map(
    State(state): State<AppState>,
    Path(show_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let map = state.services.shows.seat_map(show_id).await?;
    Ok(success_response(map))
}

/// Schedule a show (admin)
#[utoipa::path(
    post,
    path = "/api/v1/shows",
    responses(
        (status = 201, description = "Show scheduled"),
        (status = 400, description = "Invalid times", body = crate::errors::ErrorResponse),
        (status = 409, description = "Slot conflict", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shows"
)]
pub async fn create_show(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateShowRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let show = state.services.shows.create_show(payload).await?;
    Ok(created_response(show))
}

/// Update or cancel a show (admin)
#[utoipa::path(
    put,
    path = "/api/v1/shows/:id",
    params(("id" = Uuid, Path, description = "Show ID")),
    responses(
        (status = 200, description = "Show updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Invalid status transition", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shows"
)]
pub async fn update_show(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(show_id): Path<Uuid>,
    Json(payload): Json<UpdateShowRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let show = state.services.shows.update_show(show_id, payload).await?;
    Ok(success_response(show))
}

pub fn show_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shows))
        .route("/", post(create_show))
        .route("/:id", get(get_show))
        .route("/:id", put(update_show))
        .route("/:id/seats", get(seat_map))
}
