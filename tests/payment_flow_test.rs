mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use cinepass_api::errors::ServiceError;
use cinepass_api::services::bookings::CreateBookingRequest;
use cinepass_api::services::payments::{CreateBookingPaymentRequest, GatewayCallback};
use common::{register_user, seed_show, spawn_app, TestApp};

async fn booked(app: &TestApp, username: &str) -> (Uuid, Uuid) {
    let user_id = register_user(app, username).await;
    let fixture = seed_show(app, "Screen 1", dec!(150.00)).await;
    let booking = app
        .services
        .bookings
        .create_booking(
            user_id,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: fixture.seat_ids[..2].to_vec(),
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect("booking succeeds");
    (user_id, booking.id)
}

#[tokio::test]
async fn simulated_checkout_completes_payment_and_confirms_booking() {
    let app = spawn_app().await;
    let (user_id, booking_id) = booked(&app, "alice").await;

    let payment = app
        .services
        .payments
        .create_booking_payment(
            user_id,
            CreateBookingPaymentRequest {
                booking_id,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect("create payment");
    assert_eq!(payment.status, "pending");
    assert_eq!(payment.amount, dec!(315.00));

    let checkout = app
        .services
        .payments
        .start_checkout(user_id, false, payment.id)
        .await
        .expect("start checkout");
    assert!(checkout.simulated);
    assert_eq!(checkout.amount_minor, 31500);
    assert_eq!(checkout.payment.status, "processing");

    let completed = app
        .services
        .payments
        .simulate_success(user_id, false, payment.id)
        .await
        .expect("simulate success");
    assert_eq!(completed.status, "completed");
    assert!(completed.completed_at.is_some());

    let booking = app
        .services
        .bookings
        .get_booking(user_id, false, booking_id)
        .await
        .expect("get booking");
    assert_eq!(booking.status, "confirmed");
}

#[tokio::test]
async fn bad_callback_signature_fails_the_payment() {
    let app = spawn_app().await;
    let (user_id, booking_id) = booked(&app, "bob").await;

    let payment = app
        .services
        .payments
        .create_booking_payment(
            user_id,
            CreateBookingPaymentRequest {
                booking_id,
                method: "upi".to_string(),
            },
        )
        .await
        .expect("create payment");
    let checkout = app
        .services
        .payments
        .start_checkout(user_id, false, payment.id)
        .await
        .expect("start checkout");

    let err = app
        .services
        .payments
        .handle_callback(GatewayCallback {
            gateway_order_id: checkout.gateway_order_id,
            gateway_payment_id: "sim_pay_tampered".to_string(),
            signature: "deadbeef".to_string(),
        })
        .await
        .expect_err("tampered signature must be rejected");
    assert_matches!(err, ServiceError::SignatureVerificationFailed);

    let after = app
        .services
        .payments
        .get_payment(user_id, false, payment.id)
        .await
        .expect("get payment");
    assert_eq!(after.status, "failed");

    // Failure leaves the booking untouched
    let booking = app
        .services
        .bookings
        .get_booking(user_id, false, booking_id)
        .await
        .expect("get booking");
    assert_eq!(booking.status, "pending");
}

#[tokio::test]
async fn failed_payment_can_be_retried_and_completed() {
    let app = spawn_app().await;
    let (user_id, booking_id) = booked(&app, "carol").await;

    let payment = app
        .services
        .payments
        .create_booking_payment(
            user_id,
            CreateBookingPaymentRequest {
                booking_id,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect("create payment");
    let checkout = app
        .services
        .payments
        .start_checkout(user_id, false, payment.id)
        .await
        .expect("start checkout");

    // Force a failure
    let _ = app
        .services
        .payments
        .handle_callback(GatewayCallback {
            gateway_order_id: checkout.gateway_order_id,
            gateway_payment_id: "x".to_string(),
            signature: "bad".to_string(),
        })
        .await;

    let retried = app
        .services
        .payments
        .retry_payment(user_id, false, payment.id)
        .await
        .expect("retry payment");
    assert_eq!(retried.status, "pending");
    assert!(retried.gateway_order_id.is_none());

    app.services
        .payments
        .start_checkout(user_id, false, payment.id)
        .await
        .expect("second checkout");
    let completed = app
        .services
        .payments
        .simulate_success(user_id, false, payment.id)
        .await
        .expect("simulate success");
    assert_eq!(completed.status, "completed");
}

#[tokio::test]
async fn completed_booking_cannot_be_paid_again() {
    let app = spawn_app().await;
    let (user_id, booking_id) = booked(&app, "dave").await;

    let payment = app
        .services
        .payments
        .create_booking_payment(
            user_id,
            CreateBookingPaymentRequest {
                booking_id,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect("create payment");
    app.services
        .payments
        .start_checkout(user_id, false, payment.id)
        .await
        .expect("start checkout");
    app.services
        .payments
        .simulate_success(user_id, false, payment.id)
        .await
        .expect("simulate success");

    let err = app
        .services
        .payments
        .create_booking_payment(
            user_id,
            CreateBookingPaymentRequest {
                booking_id,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect_err("second payment must be rejected");
    assert_matches!(
        err,
        ServiceError::Conflict(_) | ServiceError::InvalidOperation(_)
    );
}

#[tokio::test]
async fn cancelling_a_processing_payment_blocks_completion() {
    let app = spawn_app().await;
    let (user_id, booking_id) = booked(&app, "erin").await;

    let payment = app
        .services
        .payments
        .create_booking_payment(
            user_id,
            CreateBookingPaymentRequest {
                booking_id,
                method: "credit_card".to_string(),
            },
        )
        .await
        .expect("create payment");
    app.services
        .payments
        .start_checkout(user_id, false, payment.id)
        .await
        .expect("start checkout");
    let cancelled = app
        .services
        .payments
        .cancel_payment(user_id, false, payment.id)
        .await
        .expect("cancel payment");
    assert_eq!(cancelled.status, "cancelled");

    let err = app
        .services
        .payments
        .simulate_success(user_id, false, payment.id)
        .await
        .expect_err("cancelled payment must not complete");
    assert_matches!(err, ServiceError::InvalidStateTransition { .. });
}
