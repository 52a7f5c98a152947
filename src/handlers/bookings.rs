//! Seat booking and cancellation endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, pagination, success_response};
use crate::services::bookings::{CancelBookingRequest, CreateBookingRequest};
use crate::{AppState, ListQuery};

/// Book seats for a show
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    responses(
        (status = 201, description = "Booking confirmed"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Seats already taken", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let booking = state
        .services
        .bookings
        .create_booking(user.user_id, payload)
        .await?;
    Ok(created_response(booking))
}

/// The caller's bookings, newest first
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Bookings returned")),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination(&state, query.page, query.limit);
    let bookings = state
        .services
        .bookings
        .list_user_bookings(user.user_id, page, limit)
        .await?;
    Ok(success_response(bookings))
}

/// One booking with its tickets
#[utoipa::path(
    get,
    path = "/api/v1/bookings/:id",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking returned"),
        (status = 403, description = "Not the owner", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let booking = state
        .services
        .bookings
        .get_booking(user.user_id, user.is_admin, booking_id)
        .await?;
    Ok(success_response(booking))
}

/// Cancel a confirmed booking
#[utoipa::path(
    post,
    path = "/api/v1/bookings/:id/cancel",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 409, description = "Already cancelled", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not cancellable in this state", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let cancellation = state
        .services
        .bookings
        .cancel_booking(user.user_id, user.is_admin, booking_id, payload)
        .await?;
    Ok(success_response(cancellation))
}

/// Cancellation record for a booking
#[utoipa::path(
    get,
    path = "/api/v1/bookings/:id/cancellation",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Cancellation returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn get_cancellation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let cancellation = state
        .services
        .bookings
        .get_cancellation(user.user_id, user.is_admin, booking_id)
        .await?;
    Ok(success_response(cancellation))
}

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/cancellation", get(get_cancellation))
}
