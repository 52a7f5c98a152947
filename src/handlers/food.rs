//! Concession endpoints: catalog, cart, and food orders.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::entities::food_order::FoodOrderStatus;
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, pagination, success_response};
use crate::services::food::{AddCartItemRequest, CheckoutCartRequest, UpdateCartItemRequest};
use crate::{AppState, ListQuery, PaginatedResponse};

#[derive(Debug, Deserialize)]
pub struct FoodItemQuery {
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub include_unavailable: bool,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

fn parse_food_order_status(s: &str) -> Result<FoodOrderStatus, ServiceError> {
    match s {
        "pending" => Ok(FoodOrderStatus::Pending),
        "preparing" => Ok(FoodOrderStatus::Preparing),
        "ready" => Ok(FoodOrderStatus::Ready),
        "delivered" => Ok(FoodOrderStatus::Delivered),
        "cancelled" => Ok(FoodOrderStatus::Cancelled),
        other => Err(ServiceError::InvalidInput(format!(
            "Unknown food order status '{}'",
            other
        ))),
    }
}

/// Food categories
#[utoipa::path(
    get,
    path = "/api/v1/food/categories",
    responses((status = 200, description = "Categories returned")),
    tag = "food"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let categories = state.services.food.list_categories().await?;
    Ok(success_response(categories))
}

/// Food items, hiding unavailable ones unless asked
#[utoipa::path(
    get,
    path = "/api/v1/food/items",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("include_unavailable" = Option<bool>, Query, description = "Include unavailable items")
    ),
    responses((status = 200, description = "Items returned")),
    tag = "food"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<FoodItemQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state
        .services
        .food
        .list_items(query.category_id, query.include_unavailable)
        .await?;
    Ok(success_response(items))
}

/// The caller's active cart
#[utoipa::path(
    get,
    path = "/api/v1/food/cart",
    responses((status = 200, description = "Cart returned")),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let cart = state
        .services
        .food
        .get_or_create_active_cart(user.user_id)
        .await?;
    Ok(success_response(cart))
}

/// Add an item to the cart (same item accumulates)
#[utoipa::path(
    post,
    path = "/api/v1/food/cart/items",
    responses(
        (status = 200, description = "Cart updated"),
        (status = 404, description = "Item unavailable", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn add_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddCartItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let cart = state.services.food.add_item(user.user_id, payload).await?;
    Ok(success_response(cart))
}

/// Set a cart line's quantity (0 removes it)
#[utoipa::path(
    put,
    path = "/api/v1/food/cart/items/:food_item_id",
    params(("food_item_id" = Uuid, Path, description = "Food item ID")),
    responses(
        (status = 200, description = "Cart updated"),
        (status = 404, description = "Line not in cart", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(food_item_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let cart = state
        .services
        .food
        .update_item(user.user_id, food_item_id, payload)
        .await?;
    Ok(success_response(cart))
}

/// Remove everything from the cart
#[utoipa::path(
    delete,
    path = "/api/v1/food/cart/items",
    responses((status = 200, description = "Cart cleared")),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let cart = state.services.food.clear_cart(user.user_id).await?;
    Ok(success_response(cart))
}

/// Convert the cart into a food order with its payment
#[utoipa::path(
    post,
    path = "/api/v1/food/cart/checkout",
    responses(
        (status = 201, description = "Order placed"),
        (status = 422, description = "Cart empty or item unavailable", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn checkout_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutCartRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .services
        .food
        .checkout_cart(user.user_id, payload)
        .await?;
    Ok(created_response(order))
}

/// The caller's food orders
#[utoipa::path(
    get,
    path = "/api/v1/food/orders",
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Orders returned")),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination(&state, query.page, query.limit);
    let (orders, total) = state
        .services
        .food
        .list_user_orders(user.user_id, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        orders, total, page, limit,
    )))
}

/// One food order
#[utoipa::path(
    get,
    path = "/api/v1/food/orders/:id",
    params(("id" = Uuid, Path, description = "Food order ID")),
    responses(
        (status = 200, description = "Order returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .services
        .food
        .get_order(user.user_id, user.is_admin, order_id)
        .await?;
    Ok(success_response(order))
}

/// Move an order through the kitchen pipeline (admin)
#[utoipa::path(
    put,
    path = "/api/v1/food/orders/:id/status",
    params(("id" = Uuid, Path, description = "Food order ID")),
    responses(
        (status = 200, description = "Status updated"),
        (status = 422, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let next = parse_food_order_status(&payload.status)?;
    let order = state
        .services
        .food
        .update_order_status(order_id, next)
        .await?;
    Ok(success_response(order))
}

/// Cancel a pending or preparing order
#[utoipa::path(
    post,
    path = "/api/v1/food/orders/:id/cancel",
    params(("id" = Uuid, Path, description = "Food order ID")),
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 422, description = "Too late to cancel", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "food"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .services
        .food
        .cancel_order(user.user_id, user.is_admin, order_id)
        .await?;
    Ok(success_response(order))
}

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/items", get(list_items))
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_cart_item))
        .route("/cart/items", delete(clear_cart))
        .route("/cart/items/:food_item_id", put(update_cart_item))
        .route("/cart/checkout", post(checkout_cart))
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", put(update_order_status))
        .route("/orders/:id/cancel", post(cancel_order))
}
