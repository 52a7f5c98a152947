//! Property checks for the pricing arithmetic. These run without a
//! database; the inputs mirror what the seat map feeds the booking
//! path (2 dp rupee amounts).

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use cinepass_api::services::bookings::price_booking;

/// Seat prices as paise so every generated amount has exactly 2 dp.
fn seat_prices() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u64..=100_000, 1..=10)
        .prop_map(|paise| paise.into_iter().map(|p| Decimal::new(p as i64, 2)).collect())
}

proptest! {
    #[test]
    fn totals_reconcile(prices in seat_prices(), discount_paise in 0u64..=50_000) {
        let subtotal: Decimal = prices.iter().copied().sum();
        let discount = Decimal::new(discount_paise as i64, 2).min(subtotal);

        let pricing = price_booking(&prices, discount).unwrap();

        prop_assert_eq!(pricing.total_amount, subtotal);
        prop_assert_eq!(
            pricing.tax_amount,
            (subtotal * dec!(0.05)).round_dp(2)
        );
        prop_assert_eq!(
            pricing.final_amount,
            pricing.total_amount - discount + pricing.tax_amount
        );
    }

    #[test]
    fn amounts_are_never_negative(prices in seat_prices(), discount_paise in 0u64..=50_000) {
        let subtotal: Decimal = prices.iter().copied().sum();
        let discount = Decimal::new(discount_paise as i64, 2).min(subtotal);

        let pricing = price_booking(&prices, discount).unwrap();

        prop_assert!(pricing.final_amount >= Decimal::ZERO);
        prop_assert!(pricing.tax_amount >= Decimal::ZERO);
        prop_assert!(pricing.tax_share >= Decimal::ZERO);
        prop_assert!(pricing.discount_share >= Decimal::ZERO);
    }

    #[test]
    fn per_ticket_shares_stay_close_to_the_booking_totals(prices in seat_prices()) {
        let pricing = price_booking(&prices, Decimal::ZERO).unwrap();
        let count = Decimal::from(prices.len() as u64);

        // Shares are rounded per ticket, so the reassembled sum may
        // drift by at most half a paisa per ticket.
        let reassembled = pricing.tax_share * count;
        let drift = (reassembled - pricing.tax_amount).abs();
        prop_assert!(drift <= dec!(0.005) * count);
    }

    #[test]
    fn discount_above_subtotal_is_rejected(prices in seat_prices()) {
        let subtotal: Decimal = prices.iter().copied().sum();
        prop_assert!(price_booking(&prices, subtotal + dec!(0.01)).is_err());
    }
}

#[test]
fn empty_seat_list_is_rejected() {
    assert!(price_booking(&[], Decimal::ZERO).is_err());
}
