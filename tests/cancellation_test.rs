mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use cinepass_api::entities::refund;
use cinepass_api::errors::ServiceError;
use cinepass_api::services::bookings::{CancelBookingRequest, CreateBookingRequest};
use cinepass_api::services::payments::CreateBookingPaymentRequest;
use common::{register_user, seed_show, spawn_app, ShowFixture, TestApp};

/// Books two seats, pays, and walks the booking to 'confirmed'.
async fn confirmed_booking(app: &TestApp, user_id: Uuid, fixture: &ShowFixture) -> Uuid {
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

    let payment = app
        .services
        .payments
        .create_booking_payment(
            user_id,
            CreateBookingPaymentRequest {
                booking_id: booking.id,
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

    booking.id
}

#[tokio::test]
async fn cancelling_a_confirmed_booking_releases_seats_and_queues_a_refund() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "alice").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let booking_id = confirmed_booking(&app, user_id, &fixture).await;

    let cancellation = app
        .services
        .bookings
        .cancel_booking(
            user_id,
            false,
            booking_id,
            CancelBookingRequest {
                cancellation_reason: Some("Plans changed".to_string()),
                cancellation_charges: dec!(50.00),
            },
        )
        .await
        .expect("cancellation succeeds");
    assert_eq!(cancellation.cancellation_charges, dec!(50.00));
    // 2 seats at 150 plus 5% tax is 315; refund is net of charges
    assert_eq!(cancellation.refund_amount, dec!(265.00));

    let booking = app
        .services
        .bookings
        .get_booking(user_id, false, booking_id)
        .await
        .expect("get booking");
    assert_eq!(booking.status, "cancelled");
    assert!(booking.tickets.iter().all(|t| t.status == "cancelled"));

    // The paid booking gets a pending refund against the gross amount
    let refund_row = refund::Entity::find()
        .filter(refund::Column::CancellationId.eq(cancellation.id))
        .one(&*app.db)
        .await
        .expect("query refunds")
        .expect("refund row exists");
    assert_eq!(refund_row.refund_amount, dec!(315.00));
    assert_eq!(refund_row.refund_charges, dec!(50.00));
    assert_eq!(refund_row.net_refund_amount, dec!(265.00));
    assert_eq!(refund_row.status.to_string(), "pending");

    // Released seats are bookable again by someone else
    let other = register_user(&app, "bob").await;
    app.services
        .bookings
        .create_booking(
            other,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: fixture.seat_ids[..2].to_vec(),
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect("released seats can be rebooked");

    let fetched = app
        .services
        .bookings
        .get_cancellation(user_id, false, booking_id)
        .await
        .expect("get cancellation");
    assert_eq!(fetched.id, cancellation.id);
}

#[tokio::test]
async fn cancellation_charges_cannot_exceed_the_booking_amount() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "carol").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let booking_id = confirmed_booking(&app, user_id, &fixture).await;

    for charges in [dec!(-1.00), dec!(315.01)] {
        let err = app
            .services
            .bookings
            .cancel_booking(
                user_id,
                false,
                booking_id,
                CancelBookingRequest {
                    cancellation_reason: None,
                    cancellation_charges: charges,
                },
            )
            .await
            .expect_err("out-of-range charges must be rejected");
        assert_matches!(err, ServiceError::InvalidInput(_));
    }
}

#[tokio::test]
async fn a_booking_cannot_be_cancelled_twice() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "dave").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let booking_id = confirmed_booking(&app, user_id, &fixture).await;

    app.services
        .bookings
        .cancel_booking(
            user_id,
            false,
            booking_id,
            CancelBookingRequest {
                cancellation_reason: None,
                cancellation_charges: dec!(0.00),
            },
        )
        .await
        .expect("first cancellation succeeds");

    let err = app
        .services
        .bookings
        .cancel_booking(
            user_id,
            false,
            booking_id,
            CancelBookingRequest {
                cancellation_reason: None,
                cancellation_charges: dec!(0.00),
            },
        )
        .await
        .expect_err("second cancellation must be rejected");
    assert_matches!(
        err,
        ServiceError::InvalidStateTransition { .. } | ServiceError::Conflict(_)
    );
}

#[tokio::test]
async fn unpaid_bookings_are_not_cancellable() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "erin").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let booking = app
        .services
        .bookings
        .create_booking(
            user_id,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: vec![fixture.seat_ids[0]],
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect("booking succeeds");

    let err = app
        .services
        .bookings
        .cancel_booking(
            user_id,
            false,
            booking.id,
            CancelBookingRequest {
                cancellation_reason: None,
                cancellation_charges: dec!(0.00),
            },
        )
        .await
        .expect_err("pending booking must not be cancellable");
    assert_matches!(err, ServiceError::InvalidStateTransition { .. });
}

#[tokio::test]
async fn cancellations_are_visible_to_their_owner_only() {
    let app = spawn_app().await;
    let owner = register_user(&app, "frank").await;
    let stranger = register_user(&app, "grace").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let booking_id = confirmed_booking(&app, owner, &fixture).await;

    app.services
        .bookings
        .cancel_booking(
            owner,
            false,
            booking_id,
            CancelBookingRequest {
                cancellation_reason: None,
                cancellation_charges: dec!(0.00),
            },
        )
        .await
        .expect("cancellation succeeds");

    let err = app
        .services
        .bookings
        .get_cancellation(stranger, false, booking_id)
        .await
        .expect_err("stranger must not see the cancellation");
    assert_matches!(err, ServiceError::Forbidden(_));
}
