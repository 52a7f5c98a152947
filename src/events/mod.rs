//! In-process domain events.
//!
//! Services fire events after their transaction commits; a single
//! consumer task logs them. Delivery is best-effort: a full or closed
//! channel is logged and swallowed, never propagated to the caller.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the booking, payment, and food services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Booking lifecycle
    BookingCreated(Uuid),
    BookingConfirmed(Uuid),
    BookingCancelled(Uuid),

    // Payment lifecycle
    PaymentInitiated(Uuid),
    PaymentCompleted(Uuid),
    PaymentFailed(Uuid),
    PaymentRetried(Uuid),
    PaymentCancelled(Uuid),
    RefundRequested(Uuid),

    // Food ordering
    FoodOrderPlaced(Uuid),
    FoodOrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // Accounts
    UserRegistered(Uuid),
}

/// Cloneable producer handle around the event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Fire-and-forget send; a delivery failure is logged and dropped.
    pub async fn publish(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!(error = %e, ?event, "Event delivery failed");
        }
    }
}

/// Consumer loop. Runs until every sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::BookingCreated(id) => info!(booking_id = %id, "Booking created"),
            Event::BookingConfirmed(id) => info!(booking_id = %id, "Booking confirmed"),
            Event::BookingCancelled(id) => info!(booking_id = %id, "Booking cancelled"),
            Event::PaymentInitiated(id) => info!(payment_id = %id, "Payment checkout started"),
            Event::PaymentCompleted(id) => info!(payment_id = %id, "Payment completed"),
            Event::PaymentFailed(id) => warn!(payment_id = %id, "Payment failed"),
            Event::PaymentRetried(id) => info!(payment_id = %id, "Payment reset for retry"),
            Event::PaymentCancelled(id) => info!(payment_id = %id, "Payment cancelled"),
            Event::RefundRequested(id) => info!(refund_id = %id, "Refund requested"),
            Event::FoodOrderPlaced(id) => info!(order_id = %id, "Food order placed"),
            Event::FoodOrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(
                order_id = %order_id,
                from = %old_status,
                to = %new_status,
                "Food order status changed"
            ),
            Event::UserRegistered(id) => info!(user_id = %id, "User registered"),
        }
    }
    info!("Event processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();

        sender.send(Event::BookingCreated(id)).await.unwrap();

        match rx.recv().await {
            Some(Event::BookingCreated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn publish_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or error out
        sender.publish(Event::PaymentFailed(Uuid::new_v4())).await;
    }
}
