mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;

use cinepass_api::errors::ServiceError;
use cinepass_api::services::bookings::CreateBookingRequest;
use common::{register_user, seed_show, spawn_app};

#[tokio::test]
async fn booking_two_seats_prices_with_five_percent_tax() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "alice").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

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

    assert_eq!(booking.total_amount, dec!(300.00));
    assert_eq!(booking.tax_amount, dec!(15.00));
    assert_eq!(booking.final_amount, dec!(315.00));
    assert_eq!(booking.status, "pending");
    assert_eq!(booking.tickets.len(), 2);
    for ticket in &booking.tickets {
        assert_eq!(ticket.final_price, dec!(157.50));
        assert_eq!(ticket.status, "active");
    }
}

#[tokio::test]
async fn screen_two_charges_flat_price_per_seat() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "bob").await;
    let fixture = seed_show(&app, "Screen 2", dec!(150.00)).await;

    let booking = app
        .services
        .bookings
        .create_booking(
            user_id,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: fixture.seat_ids[..1].to_vec(),
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect("booking succeeds");

    // Flat override, not the 150.00 the seat row carries
    assert_eq!(booking.total_amount, dec!(300.00));
    assert_eq!(booking.final_amount, dec!(315.00));
}

#[tokio::test]
async fn same_seat_cannot_be_booked_twice() {
    let app = spawn_app().await;
    let first = register_user(&app, "carol").await;
    let second = register_user(&app, "dave").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let contested = vec![fixture.seat_ids[0]];

    app.services
        .bookings
        .create_booking(
            first,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: contested.clone(),
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect("first booking succeeds");

    let err = app
        .services
        .bookings
        .create_booking(
            second,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: contested,
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect_err("second booking must fail");

    assert_matches!(
        err,
        ServiceError::SeatsUnavailable { .. } | ServiceError::SeatConflict
    );
}

#[tokio::test]
async fn concurrent_bookings_for_one_seat_admit_exactly_one_winner() {
    let app = spawn_app().await;
    let first = register_user(&app, "erin").await;
    let second = register_user(&app, "frank").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let contested = vec![fixture.seat_ids[0]];

    let request = |user| {
        let contested = contested.clone();
        let bookings = app.services.bookings.clone();
        let show_id = fixture.show_id;
        async move {
            bookings
                .create_booking(
                    user,
                    CreateBookingRequest {
                        show_id,
                        seat_ids: contested,
                        discount_amount: None,
                        payment_method: None,
                    },
                )
                .await
        }
    };

    let (a, b) = tokio::join!(request(first), request(second));

    let outcomes = [a, b];
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one booking may win the seat");
    let loser = outcomes
        .iter()
        .find_map(|r| r.as_ref().err())
        .expect("one booking must lose");
    assert_matches!(
        loser,
        ServiceError::SeatsUnavailable { .. } | ServiceError::SeatConflict
    );
}

#[tokio::test]
async fn duplicate_seats_in_one_request_are_rejected() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "grace").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let seat = fixture.seat_ids[0];

    let err = app
        .services
        .bookings
        .create_booking(
            user_id,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: vec![seat, seat],
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect_err("duplicate seats must be rejected");

    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn foreign_seats_are_rejected() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "heidi").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;
    let other = seed_show(&app, "Screen 1", dec!(150.00)).await;

    let err = app
        .services
        .bookings
        .create_booking(
            user_id,
            CreateBookingRequest {
                show_id: fixture.show_id,
                seat_ids: vec![other.seat_ids[0]],
                discount_amount: None,
                payment_method: None,
            },
        )
        .await
        .expect_err("seat from another screen must be rejected");

    assert_matches!(err, ServiceError::InvalidInput(_) | ServiceError::NotFound(_));
}

#[tokio::test]
async fn seat_map_reflects_bookings() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "ivan").await;
    let fixture = seed_show(&app, "Screen 1", dec!(150.00)).await;

    let before = app
        .services
        .shows
        .seat_map(fixture.show_id)
        .await
        .expect("seat map");
    assert_eq!(before.total_seats, 6);
    assert_eq!(before.available_seats, 6);

    app.services
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

    let after = app
        .services
        .shows
        .seat_map(fixture.show_id)
        .await
        .expect("seat map");
    assert_eq!(after.available_seats, 4);
    let booked: Vec<_> = after.seats.iter().filter(|s| !s.is_available).collect();
    assert_eq!(booked.len(), 2);
}
