//! Payment lifecycle endpoints. The gateway callback is the only
//! unauthenticated route; it is authenticated by its HMAC signature
//! instead.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, success_response};
use crate::services::payments::{CreateBookingPaymentRequest, GatewayCallback};
use crate::AppState;

/// Create a payment for a booking
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    responses(
        (status = 201, description = "Payment created"),
        (status = 409, description = "Booking already paid", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBookingPaymentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .services
        .payments
        .create_booking_payment(user.user_id, payload)
        .await?;
    Ok(created_response(payment))
}

/// Get one payment
#[utoipa::path(
    get,
    path = "/api/v1/payments/:id",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .services
        .payments
        .get_payment(user.user_id, user.is_admin, payment_id)
        .await?;
    Ok(success_response(payment))
}

/// Open a gateway order for a pending payment
#[utoipa::path(
    post,
    path = "/api/v1/payments/:id/checkout",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Checkout opened"),
        (status = 422, description = "Payment not pending", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
pub async fn start_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let checkout = state
        .services
        .payments
        .start_checkout(user.user_id, user.is_admin, payment_id)
        .await?;
    Ok(success_response(checkout))
}

/// Gateway callback (signature-authenticated)
#[utoipa::path(
    post,
    path = "/api/v1/payments/callback",
    responses(
        (status = 200, description = "Payment completed"),
        (status = 400, description = "Signature verification failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown gateway order", body = crate::errors::ErrorResponse)
    ),
    tag = "payments"
)]
pub async fn gateway_callback(
    State(state): State<AppState>,
    Json(payload): Json<GatewayCallback>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state.services.payments.handle_callback(payload).await?;
    Ok(success_response(payment))
}

/// Complete a payment without a real gateway (simulated mode only)
#[utoipa::path(
    post,
    path = "/api/v1/payments/:id/simulate-success",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment completed"),
        (status = 422, description = "Not in simulated mode or checkout not started", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
pub async fn simulate_success(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .services
        .payments
        .simulate_success(user.user_id, user.is_admin, payment_id)
        .await?;
    Ok(success_response(payment))
}

/// Reset a failed payment for another attempt
#[utoipa::path(
    post,
    path = "/api/v1/payments/:id/retry",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment reset to pending"),
        (status = 422, description = "Payment not retryable", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
pub async fn retry_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .services
        .payments
        .retry_payment(user.user_id, user.is_admin, payment_id)
        .await?;
    Ok(success_response(payment))
}

/// Abandon an in-flight payment
#[utoipa::path(
    post,
    path = "/api/v1/payments/:id/cancel",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment cancelled"),
        (status = 422, description = "Not cancellable in this state", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
pub async fn cancel_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .services
        .payments
        .cancel_payment(user.user_id, user.is_admin, payment_id)
        .await?;
    Ok(success_response(payment))
}

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/callback", post(gateway_callback))
        .route("/:id", get(get_payment))
        .route("/:id/checkout", post(start_checkout))
        .route("/:id/simulate-success", post(simulate_success))
        .route("/:id/retry", post(retry_payment))
        .route("/:id/cancel", post(cancel_payment))
}
