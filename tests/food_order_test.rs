mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use cinepass_api::entities::food_order::FoodOrderStatus;
use cinepass_api::errors::ServiceError;
use cinepass_api::services::food::{
    AddCartItemRequest, CheckoutCartRequest, UpdateCartItemRequest,
};
use common::{register_user, seed_food, seed_show, spawn_app, FoodFixture, TestApp};

async fn fill_cart(app: &TestApp, user_id: Uuid, food: &FoodFixture) {
    // Two adds of the same item accumulate into one line
    for _ in 0..2 {
        app.services
            .food
            .add_item(
                user_id,
                AddCartItemRequest {
                    food_item_id: food.popcorn_id,
                    quantity: 1,
                    special_instructions: None,
                },
            )
            .await
            .expect("add popcorn");
    }
    app.services
        .food
        .add_item(
            user_id,
            AddCartItemRequest {
                food_item_id: food.cola_id,
                quantity: 1,
                special_instructions: None,
            },
        )
        .await
        .expect("add cola");
}

#[tokio::test]
async fn cart_lines_accumulate_and_quantity_zero_removes() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "alice").await;
    let food = seed_food(&app).await;

    fill_cart(&app, user_id, &food).await;
    let cart = app
        .services
        .food
        .get_or_create_active_cart(user_id)
        .await
        .expect("get cart");
    assert_eq!(cart.items.len(), 2);
    let popcorn_line = cart
        .items
        .iter()
        .find(|i| i.food_item_id == food.popcorn_id)
        .expect("popcorn line");
    assert_eq!(popcorn_line.quantity, 2);
    assert_eq!(cart.subtotal, dec!(320.00));

    let cart = app
        .services
        .food
        .update_item(
            user_id,
            food.cola_id,
            UpdateCartItemRequest {
                quantity: 0,
                special_instructions: None,
            },
        )
        .await
        .expect("remove cola");
    assert_eq!(cart.items.len(), 1);

    let cart = app.services.food.clear_cart(user_id).await.expect("clear");
    assert!(cart.items.is_empty());
    assert_eq!(cart.subtotal, dec!(0.00));
}

#[tokio::test]
async fn an_expired_cart_is_abandoned_and_replaced() {
    use chrono::{Duration, Utc};
    use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};

    use cinepass_api::entities::cart::{self, CartStatus};

    let app = spawn_app().await;
    let user_id = register_user(&app, "gail").await;
    let food = seed_food(&app).await;

    fill_cart(&app, user_id, &food).await;
    let original = app
        .services
        .food
        .get_or_create_active_cart(user_id)
        .await
        .expect("get cart");

    // Age the cart past its TTL
    let row = cart::Entity::find_by_id(original.id)
        .one(&*app.db)
        .await
        .expect("query cart")
        .expect("cart row");
    let mut active = row.into_active_model();
    active.expires_at = Set(Utc::now() - Duration::minutes(1));
    active.update(&*app.db).await.expect("age cart");

    let fresh = app
        .services
        .food
        .get_or_create_active_cart(user_id)
        .await
        .expect("get cart again");
    assert_ne!(fresh.id, original.id);
    assert!(fresh.items.is_empty());

    let old_row = cart::Entity::find_by_id(original.id)
        .one(&*app.db)
        .await
        .expect("query cart")
        .expect("cart row");
    assert_eq!(old_row.status, CartStatus::Abandoned);
}

#[tokio::test]
async fn checkout_prices_the_order_and_opens_a_fresh_cart() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "bob").await;
    let food = seed_food(&app).await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    fill_cart(&app, user_id, &food).await;
    let order = app
        .services
        .food
        .checkout_cart(
            user_id,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: None,
                discount: None,
                special_instructions: Some("No salt".to_string()),
                method: "upi".to_string(),
            },
        )
        .await
        .expect("checkout");

    assert_eq!(order.status, "pending");
    assert_eq!(order.total_amount, dec!(320.00));
    assert_eq!(order.tax, dec!(16.00));
    assert_eq!(order.final_amount, dec!(336.00));
    assert!(order.estimated_ready_time.is_some());
    assert_eq!(order.items.len(), 2);

    let payment_id = order.payment_id.expect("payment created with order");
    let payment = app
        .services
        .payments
        .get_payment(user_id, false, payment_id)
        .await
        .expect("get payment");
    assert_eq!(payment.amount, dec!(336.00));
    assert_eq!(payment.booking_id, None);

    // The converted cart is replaced by an empty active one
    let cart = app
        .services
        .food
        .get_or_create_active_cart(user_id)
        .await
        .expect("get cart");
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn an_empty_cart_cannot_be_checked_out() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "carol").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    let err = app
        .services
        .food
        .checkout_cart(
            user_id,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: None,
                discount: None,
                special_instructions: None,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect_err("empty cart must be rejected");
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn checkout_rejects_a_nonexistent_booking_reference() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "hank").await;
    let food = seed_food(&app).await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    fill_cart(&app, user_id, &food).await;
    let err = app
        .services
        .food
        .checkout_cart(
            user_id,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: Some(Uuid::new_v4()),
                discount: None,
                special_instructions: None,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect_err("unknown booking must be rejected");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn checkout_rejects_another_users_booking_reference() {
    use cinepass_api::services::bookings::CreateBookingRequest;

    let app = spawn_app().await;
    let owner = register_user(&app, "iris").await;
    let other = register_user(&app, "jack").await;
    let food = seed_food(&app).await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    let booking = app
        .services
        .bookings
        .create_booking(
            owner,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: vec![fixture.seat_ids[0]],
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect("booking succeeds");

    fill_cart(&app, other, &food).await;
    let err = app
        .services
        .food
        .checkout_cart(
            other,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: Some(booking.id),
                discount: None,
                special_instructions: None,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect_err("foreign booking must be rejected");
    assert_matches!(err, ServiceError::Forbidden(_));

    // The owner's own booking is an acceptable reference
    fill_cart(&app, owner, &food).await;
    let order = app
        .services
        .food
        .checkout_cart(
            owner,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: Some(booking.id),
                discount: None,
                special_instructions: None,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect("own booking is accepted");
    assert_eq!(order.booking_id, Some(booking.id));
}

#[tokio::test]
async fn paying_for_the_order_moves_it_to_preparing() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "dave").await;
    let food = seed_food(&app).await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    fill_cart(&app, user_id, &food).await;
    let order = app
        .services
        .food
        .checkout_cart(
            user_id,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: None,
                discount: None,
                special_instructions: None,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect("checkout");
    let payment_id = order.payment_id.expect("payment id");

    app.services
        .payments
        .start_checkout(user_id, false, payment_id)
        .await
        .expect("start checkout");
    app.services
        .payments
        .simulate_success(user_id, false, payment_id)
        .await
        .expect("simulate success");

    let order = app
        .services
        .food
        .get_order(user_id, false, order.id)
        .await
        .expect("get order");
    assert_eq!(order.status, "preparing");
}

#[tokio::test]
async fn kitchen_walks_the_order_to_delivered() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "erin").await;
    let food = seed_food(&app).await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    fill_cart(&app, user_id, &food).await;
    let order = app
        .services
        .food
        .checkout_cart(
            user_id,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: None,
                discount: None,
                special_instructions: None,
                method: "wallet".to_string(),
            },
        )
        .await
        .expect("checkout");

    // Delivery before preparation is not a legal jump
    let err = app
        .services
        .food
        .update_order_status(order.id, FoodOrderStatus::Delivered)
        .await
        .expect_err("pending cannot jump to delivered");
    assert_matches!(err, ServiceError::InvalidStateTransition { .. });

    for next in [
        FoodOrderStatus::Preparing,
        FoodOrderStatus::Ready,
        FoodOrderStatus::Delivered,
    ] {
        app.services
            .food
            .update_order_status(order.id, next)
            .await
            .expect("legal transition");
    }

    let order = app
        .services
        .food
        .get_order(user_id, false, order.id)
        .await
        .expect("get order");
    assert_eq!(order.status, "delivered");
    assert!(order.delivered_at.is_some());
}

#[tokio::test]
async fn cancelling_an_order_cancels_its_pending_payment() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "frank").await;
    let food = seed_food(&app).await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    fill_cart(&app, user_id, &food).await;
    let order = app
        .services
        .food
        .checkout_cart(
            user_id,
            CheckoutCartRequest {
                theatre_id: fixture.theatre_id,
                booking_id: None,
                discount: None,
                special_instructions: None,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect("checkout");
    let payment_id = order.payment_id.expect("payment id");

    let cancelled = app
        .services
        .food
        .cancel_order(user_id, false, order.id)
        .await
        .expect("cancel order");
    assert_eq!(cancelled.status, "cancelled");

    let payment = app
        .services
        .payments
        .get_payment(user_id, false, payment_id)
        .await
        .expect("get payment");
    assert_eq!(payment.status, "cancelled");
}
