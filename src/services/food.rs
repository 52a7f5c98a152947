//! Concession ordering: catalog, the per-user TTL cart, and the food
//! order lifecycle.
//!
//! The cart is a first-class row, not session state. At most one
//! active, unexpired cart per user is honored; expired or converted
//! carts are treated as absent and a fresh one is handed out.

use crate::{
    common::generate_code,
    config::AppConfig,
    db::DbPool,
    entities::{
        cart::{self, CartStatus, Entity as CartEntity},
        cart_item::{self, Entity as CartItemEntity},
        food_category::{self, Entity as FoodCategoryEntity},
        food_item::{self, Entity as FoodItemEntity},
        booking::Entity as BookingEntity,
        food_order::{self, Entity as FoodOrderEntity, FoodOrderStatus},
        food_order_item,
        payment::{self, Entity as PaymentEntity, PaymentStatus},
        theatre::Entity as TheatreEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::payments::{food_order_note, parse_payment_method},
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

const FOOD_TAX_RATE: Decimal = dec!(0.05);

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct AddCartItemRequest {
    pub food_item_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateCartItemRequest {
    /// New absolute quantity; 0 removes the line
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckoutCartRequest {
    pub theatre_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub discount: Option<Decimal>,
    pub special_instructions: Option<String>,
    pub method: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub food_item_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub items: Vec<CartItemResponse>,
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FoodOrderItemResponse {
    pub food_item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FoodOrderResponse {
    pub id: Uuid,
    pub order_code: String,
    pub user_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub theatre_id: Uuid,
    pub total_amount: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub final_amount: Decimal,
    pub status: String,
    pub special_instructions: Option<String>,
    pub estimated_ready_time: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<FoodOrderItemResponse>,
    /// Present when checkout created the payment alongside the order
    pub payment_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct FoodService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
}

impl FoodService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            event_sender,
            config,
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<food_category::Model>, ServiceError> {
        Ok(FoodCategoryEntity::find()
            .filter(food_category::Column::IsActive.eq(true))
            .order_by_asc(food_category::Column::Name)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_items(
        &self,
        category_id: Option<Uuid>,
        include_unavailable: bool,
    ) -> Result<Vec<food_item::Model>, ServiceError> {
        let mut query = FoodItemEntity::find().order_by_asc(food_item::Column::Name);
        if let Some(cat) = category_id {
            query = query.filter(food_item::Column::CategoryId.eq(cat));
        }
        if !include_unavailable {
            query = query.filter(food_item::Column::IsAvailable.eq(true));
        }
        Ok(query.all(&*self.db).await?)
    }

    /// Returns the user's active, unexpired cart, creating one when
    /// none exists. Converted and expired carts are never resurrected.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_or_create_active_cart(&self, user_id: Uuid) -> Result<CartResponse, ServiceError> {
        let db = &*self.db;

        let existing = CartEntity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .filter(cart::Column::Status.eq(CartStatus::Active))
            .order_by_desc(cart::Column::CreatedAt)
            .one(db)
            .await?;

        if let Some(model) = existing {
            if model.is_expired() {
                info!(cart_id = %model.id, "Active cart expired, abandoning");
                let mut active = model.into_active_model();
                active.status = Set(CartStatus::Abandoned);
                active.updated_at = Set(Some(Utc::now()));
                active.update(db).await?;
            } else {
                return self.cart_response(model).await;
            }
        }

        let now = Utc::now();
        let model = cart::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            status: Set(CartStatus::Active),
            expires_at: Set(now + Duration::hours(self.config.cart_ttl_hours)),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(db)
        .await?;

        self.cart_response(model).await
    }

    /// Upserts a cart line: the same item accumulates quantity and
    /// takes the new instructions. Adding slides the cart's expiry.
    #[instrument(skip(self, request), fields(user_id = %user_id, food_item_id = %request.food_item_id))]
    pub async fn add_item(
        &self,
        user_id: Uuid,
        request: AddCartItemRequest,
    ) -> Result<CartResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db;

        let item = FoodItemEntity::find_by_id(request.food_item_id)
            .one(db)
            .await?
            .filter(|i| i.is_available)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Food item with ID {} not found or unavailable",
                    request.food_item_id
                ))
            })?;

        let cart_model = self.active_cart_model(user_id).await?;
        let now = Utc::now();

        let existing_line = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .filter(cart_item::Column::FoodItemId.eq(item.id))
            .one(db)
            .await?;

        match existing_line {
            Some(line) => {
                let mut active = line.clone().into_active_model();
                active.quantity = Set(line.quantity + request.quantity);
                active.special_instructions = Set(request.special_instructions);
                active.updated_at = Set(Some(now));
                active.update(db).await?;
            }
            None => {
                cart_item::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    cart_id: Set(cart_model.id),
                    food_item_id: Set(item.id),
                    quantity: Set(request.quantity),
                    special_instructions: Set(request.special_instructions),
                    created_at: Set(now),
                    updated_at: Set(Some(now)),
                }
                .insert(db)
                .await?;
            }
        }

        // Sliding TTL: activity keeps the cart alive
        let cart_id = cart_model.id;
        let mut active = cart_model.into_active_model();
        active.expires_at = Set(now + Duration::hours(self.config.cart_ttl_hours));
        active.updated_at = Set(Some(now));
        let refreshed = active.update(db).await?;

        info!(cart_id = %cart_id, "Cart item added");
        self.cart_response(refreshed).await
    }

    /// Sets a line's absolute quantity; 0 removes the line.
    #[instrument(skip(self, request), fields(user_id = %user_id, food_item_id = %food_item_id))]
    pub async fn update_item(
        &self,
        user_id: Uuid,
        food_item_id: Uuid,
        request: UpdateCartItemRequest,
    ) -> Result<CartResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db;
        let cart_model = self.active_cart_model(user_id).await?;

        let line = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .filter(cart_item::Column::FoodItemId.eq(food_item_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Item {} is not in the cart", food_item_id))
            })?;

        if request.quantity == 0 {
            line.delete(db).await?;
        } else {
            let mut active = line.into_active_model();
            active.quantity = Set(request.quantity);
            if request.special_instructions.is_some() {
                active.special_instructions = Set(request.special_instructions);
            }
            active.updated_at = Set(Some(Utc::now()));
            active.update(db).await?;
        }

        self.cart_response(cart_model).await
    }

    /// Empties the user's active cart.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn clear_cart(&self, user_id: Uuid) -> Result<CartResponse, ServiceError> {
        let db = &*self.db;
        let cart_model = self.active_cart_model(user_id).await?;

        CartItemEntity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .exec(db)
            .await?;

        self.cart_response(cart_model).await
    }

    /// Converts the active cart into a food order with its payment.
    ///
    /// Prices are captured at checkout time; order, lines, payment, and
    /// the cart's flip to 'converted' commit in one transaction.
    #[instrument(skip(self, request), fields(user_id = %user_id, theatre_id = %request.theatre_id))]
    pub async fn checkout_cart(
        &self,
        user_id: Uuid,
        request: CheckoutCartRequest,
    ) -> Result<FoodOrderResponse, ServiceError> {
        let method = parse_payment_method(&request.method)?;
        let db = &*self.db;

        TheatreEntity::find_by_id(request.theatre_id)
            .one(db)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Theatre with ID {} not found",
                    request.theatre_id
                ))
            })?;

        // A linked booking must exist and belong to the ordering user
        if let Some(booking_id) = request.booking_id {
            let booking_model = BookingEntity::find_by_id(booking_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Booking with ID {} not found", booking_id))
                })?;
            if booking_model.user_id != user_id {
                return Err(ServiceError::Forbidden(
                    "Food orders may only reference the user's own booking".to_string(),
                ));
            }
        }

        let cart_model = self.active_cart_model(user_id).await?;
        let lines = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .all(db)
            .await?;
        if lines.is_empty() {
            return Err(ServiceError::InvalidOperation(
                "Cart is empty".to_string(),
            ));
        }

        let item_ids: Vec<Uuid> = lines.iter().map(|l| l.food_item_id).collect();
        let items = FoodItemEntity::find()
            .filter(food_item::Column::Id.is_in(item_ids))
            .all(db)
            .await?;

        let mut subtotal = Decimal::ZERO;
        let mut max_prep_minutes: i64 = 0;
        let mut order_lines = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = items
                .iter()
                .find(|i| i.id == line.food_item_id)
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Food item with ID {} no longer exists",
                        line.food_item_id
                    ))
                })?;
            if !item.is_available {
                return Err(ServiceError::InvalidOperation(format!(
                    "{} is no longer available",
                    item.name
                )));
            }
            let line_total = (item.price * Decimal::from(line.quantity)).round_dp(2);
            subtotal += line_total;
            max_prep_minutes = max_prep_minutes.max(item.preparation_time_minutes as i64);
            order_lines.push((item.clone(), line.quantity, line_total, line.special_instructions.clone()));
        }

        let discount = request.discount.unwrap_or(Decimal::ZERO);
        if discount < Decimal::ZERO || discount > subtotal {
            return Err(ServiceError::InvalidInput(format!(
                "Discount must be between 0 and the order subtotal ({})",
                subtotal
            )));
        }
        let tax = (subtotal * FOOD_TAX_RATE).round_dp(2);
        let final_amount = subtotal - discount + tax;

        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = db.begin().await?;

        let order = food_order::ActiveModel {
            id: Set(order_id),
            order_code: Set(generate_code("FO")),
            user_id: Set(user_id),
            booking_id: Set(request.booking_id),
            theatre_id: Set(request.theatre_id),
            total_amount: Set(subtotal),
            discount: Set(discount),
            tax: Set(tax),
            final_amount: Set(final_amount),
            status: Set(FoodOrderStatus::Pending),
            special_instructions: Set(request.special_instructions),
            estimated_ready_time: Set(Some(now + Duration::minutes(max_prep_minutes))),
            delivered_at: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await?;

        let mut item_responses = Vec::with_capacity(order_lines.len());
        for (item, quantity, line_total, instructions) in &order_lines {
            food_order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                food_order_id: Set(order_id),
                food_item_id: Set(item.id),
                quantity: Set(*quantity),
                unit_price: Set(item.price),
                total_price: Set(*line_total),
                special_instructions: Set(instructions.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            item_responses.push(FoodOrderItemResponse {
                food_item_id: item.id,
                name: item.name.clone(),
                quantity: *quantity,
                unit_price: item.price,
                total_price: *line_total,
            });
        }

        let payment_model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            payment_code: Set(generate_code("PAY")),
            booking_id: Set(None),
            amount: Set(final_amount),
            processing_charges: Set(Decimal::ZERO),
            total_amount: Set(final_amount),
            method: Set(method),
            status: Set(PaymentStatus::Pending),
            gateway_order_id: Set(None),
            gateway_payment_id: Set(None),
            gateway_signature: Set(None),
            currency: Set(self.config.gateway.currency.clone()),
            notes: Set(Some(food_order_note(order_id))),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await?;

        let mut cart_active = cart_model.into_active_model();
        cart_active.status = Set(CartStatus::Converted);
        cart_active.updated_at = Set(Some(now));
        cart_active.update(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit food order checkout");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, final_amount = %final_amount, "Food order placed");
        self.event_sender
            .publish(Event::FoodOrderPlaced(order_id))
            .await;

        Ok(to_order_response(order, item_responses, Some(payment_model.id)))
    }

    pub async fn get_order(
        &self,
        user_id: Uuid,
        is_admin: bool,
        order_id: Uuid,
    ) -> Result<FoodOrderResponse, ServiceError> {
        let model = self.find_owned(user_id, is_admin, order_id).await?;
        let items = self.order_items(order_id).await?;
        Ok(to_order_response(model, items, None))
    }

    pub async fn list_user_orders(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<FoodOrderResponse>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = FoodOrderEntity::find()
            .filter(food_order::Column::UserId.eq(user_id))
            .order_by_desc(food_order::Column::CreatedAt)
            .paginate(db, limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        let mut orders = Vec::with_capacity(models.len());
        for model in models {
            let items = self.order_items(model.id).await?;
            orders.push(to_order_response(model, items, None));
        }
        Ok((orders, total))
    }

    /// Kitchen-side transition (admin): preparing -> ready -> delivered.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        next: FoodOrderStatus,
    ) -> Result<FoodOrderResponse, ServiceError> {
        let db = &*self.db;
        let model = FoodOrderEntity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Food order with ID {} not found", order_id))
            })?;

        if !model.status.can_transition_to(next) {
            return Err(ServiceError::InvalidStateTransition {
                entity: "food_order",
                from: model.status.to_string(),
                to: next.to_string(),
            });
        }

        let old_status = model.status.to_string();
        let now = Utc::now();
        let mut active = model.into_active_model();
        active.status = Set(next);
        if next == FoodOrderStatus::Delivered {
            active.delivered_at = Set(Some(now));
        }
        active.updated_at = Set(Some(now));
        let updated = active.update(db).await?;

        self.event_sender
            .publish(Event::FoodOrderStatusChanged {
                order_id,
                old_status,
                new_status: next.to_string(),
            })
            .await;

        let items = self.order_items(order_id).await?;
        Ok(to_order_response(updated, items, None))
    }

    /// Cancels a pending or preparing order; the linked payment is
    /// cancelled in the same transaction when still in flight.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(
        &self,
        user_id: Uuid,
        is_admin: bool,
        order_id: Uuid,
    ) -> Result<FoodOrderResponse, ServiceError> {
        let db = &*self.db;
        let model = self.find_owned(user_id, is_admin, order_id).await?;

        if !model.status.can_transition_to(FoodOrderStatus::Cancelled) {
            return Err(ServiceError::InvalidStateTransition {
                entity: "food_order",
                from: model.status.to_string(),
                to: FoodOrderStatus::Cancelled.to_string(),
            });
        }

        let note = food_order_note(order_id);
        let linked_payment = PaymentEntity::find()
            .filter(payment::Column::Notes.eq(note))
            .one(db)
            .await?;

        let old_status = model.status.to_string();
        let now = Utc::now();
        let txn = db.begin().await?;

        let mut active = model.into_active_model();
        active.status = Set(FoodOrderStatus::Cancelled);
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        if let Some(pay) = linked_payment {
            if pay.status.can_transition_to(PaymentStatus::Cancelled) {
                let payment_id = pay.id;
                let mut p = pay.into_active_model();
                p.status = Set(PaymentStatus::Cancelled);
                p.updated_at = Set(Some(now));
                p.update(&txn).await?;
                info!(payment_id = %payment_id, "Linked payment cancelled with order");
            }
        }

        txn.commit().await?;

        self.event_sender
            .publish(Event::FoodOrderStatusChanged {
                order_id,
                old_status,
                new_status: FoodOrderStatus::Cancelled.to_string(),
            })
            .await;

        let items = self.order_items(order_id).await?;
        Ok(to_order_response(updated, items, None))
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        is_admin: bool,
        order_id: Uuid,
    ) -> Result<food_order::Model, ServiceError> {
        let model = FoodOrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Food order with ID {} not found", order_id))
            })?;
        if model.user_id != user_id && !is_admin {
            return Err(ServiceError::Forbidden(
                "Food orders are visible to their owner only".to_string(),
            ));
        }
        Ok(model)
    }

    async fn active_cart_model(&self, user_id: Uuid) -> Result<cart::Model, ServiceError> {
        let cart_response = self.get_or_create_active_cart(user_id).await?;
        CartEntity::find_by_id(cart_response.id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::InternalError("Cart vanished mid-request".to_string()))
    }

    async fn cart_response(&self, model: cart::Model) -> Result<CartResponse, ServiceError> {
        let db = &*self.db;
        let lines = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(model.id))
            .all(db)
            .await?;
        let item_ids: Vec<Uuid> = lines.iter().map(|l| l.food_item_id).collect();
        let items = FoodItemEntity::find()
            .filter(food_item::Column::Id.is_in(item_ids))
            .all(db)
            .await?;

        let mut subtotal = Decimal::ZERO;
        let mut responses = Vec::with_capacity(lines.len());
        for line in &lines {
            let (name, unit_price) = items
                .iter()
                .find(|i| i.id == line.food_item_id)
                .map(|i| (i.name.clone(), i.price))
                .unwrap_or_else(|| ("(removed)".to_string(), Decimal::ZERO));
            let line_total = (unit_price * Decimal::from(line.quantity)).round_dp(2);
            subtotal += line_total;
            responses.push(CartItemResponse {
                food_item_id: line.food_item_id,
                name,
                unit_price,
                quantity: line.quantity,
                line_total,
                special_instructions: line.special_instructions.clone(),
            });
        }

        Ok(CartResponse {
            id: model.id,
            user_id: model.user_id,
            status: model.status.to_string(),
            expires_at: model.expires_at,
            items: responses,
            subtotal,
        })
    }

    async fn order_items(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<FoodOrderItemResponse>, ServiceError> {
        let db = &*self.db;
        let lines = food_order_item::Entity::find()
            .filter(food_order_item::Column::FoodOrderId.eq(order_id))
            .all(db)
            .await?;
        let item_ids: Vec<Uuid> = lines.iter().map(|l| l.food_item_id).collect();
        let items = FoodItemEntity::find()
            .filter(food_item::Column::Id.is_in(item_ids))
            .all(db)
            .await?;

        Ok(lines
            .into_iter()
            .map(|l| FoodOrderItemResponse {
                food_item_id: l.food_item_id,
                name: items
                    .iter()
                    .find(|i| i.id == l.food_item_id)
                    .map(|i| i.name.clone())
                    .unwrap_or_else(|| "(removed)".to_string()),
                quantity: l.quantity,
                unit_price: l.unit_price,
                total_price: l.total_price,
            })
            .collect())
    }
}

fn to_order_response(
    model: food_order::Model,
    items: Vec<FoodOrderItemResponse>,
    payment_id: Option<Uuid>,
) -> FoodOrderResponse {
    FoodOrderResponse {
        id: model.id,
        order_code: model.order_code,
        user_id: model.user_id,
        booking_id: model.booking_id,
        theatre_id: model.theatre_id,
        total_amount: model.total_amount,
        discount: model.discount,
        tax: model.tax,
        final_amount: model.final_amount,
        status: model.status.to_string(),
        special_instructions: model.special_instructions,
        estimated_ready_time: model.estimated_ready_time,
        delivered_at: model.delivered_at,
        created_at: model.created_at,
        items,
        payment_id,
    }
}
