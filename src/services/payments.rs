//! Payment lifecycle: checkout provisioning, the gateway callback state
//! machine, retries, and the invoice/refund bookkeeping that hangs off a
//! completed payment.
//!
//! The hosted gateway sits behind [`PaymentGateway`]; only the simulated
//! implementation ships. The callback applies the payment update and its
//! cascade (booking confirmation or food-order kickoff) in a single
//! transaction, so a failed cascade never leaves a half-applied payment.

use crate::{
    common::generate_code,
    config::AppConfig,
    db::DbPool,
    entities::{
        booking::{BookingStatus, Entity as BookingEntity},
        food_order::{Entity as FoodOrderEntity, FoodOrderStatus},
        invoice,
        payment::{self, Entity as PaymentEntity, PaymentMethod, PaymentStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Note string linking a payment to a food order.
const FOOD_ORDER_NOTE_PREFIX: &str = "food_order:";

/// Seam to the hosted payment gateway. The real HTTP client is out of
/// scope; the simulated implementation fabricates order ids locally.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Registers an order with the gateway, returning its order id.
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<String, ServiceError>;
}

/// Test-friendly gateway that mints order ids without any network.
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn create_order(
        &self,
        _amount_minor: i64,
        _currency: &str,
        _receipt: &str,
    ) -> Result<String, ServiceError> {
        let suffix: String = {
            let mut rng = rand::thread_rng();
            (0..12)
                .map(|_| std::char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
                .collect()
        };
        Ok(format!("sim_order_{}", suffix))
    }
}

/// Computes the callback signature: HMAC-SHA256 over
/// `"<order_id>|<payment_id>"`, hex-encoded.
pub fn compute_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time signature check (via `Mac::verify_slice`).
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.verify_slice(&provided).is_ok()
}

fn parse_food_order_note(notes: Option<&str>) -> Option<Uuid> {
    notes?
        .trim()
        .strip_prefix(FOOD_ORDER_NOTE_PREFIX)
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}

/// Formats the payment note that ties it to a food order.
pub fn food_order_note(order_id: Uuid) -> String {
    format!("{}{}", FOOD_ORDER_NOTE_PREFIX, order_id)
}

pub fn parse_payment_method(raw: &str) -> Result<PaymentMethod, ServiceError> {
    match raw.to_ascii_lowercase().as_str() {
        "credit_card" => Ok(PaymentMethod::CreditCard),
        "debit_card" => Ok(PaymentMethod::DebitCard),
        "upi" => Ok(PaymentMethod::Upi),
        "net_banking" => Ok(PaymentMethod::NetBanking),
        "wallet" => Ok(PaymentMethod::Wallet),
        other => Err(ServiceError::InvalidInput(format!(
            "Unknown payment method: {}",
            other
        ))),
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateBookingPaymentRequest {
    pub booking_id: Uuid,
    pub method: String,
}

/// Callback payload posted by the gateway (or fabricated in simulated
/// mode).
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GatewayCallback {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub payment_code: String,
    pub booking_id: Option<Uuid>,
    pub amount: Decimal,
    pub processing_charges: Decimal,
    pub total_amount: Decimal,
    pub method: String,
    pub status: String,
    pub gateway_order_id: Option<String>,
    pub currency: String,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub payment: PaymentResponse,
    pub gateway_order_id: String,
    /// Amount in the currency's minor unit (paise for INR)
    pub amount_minor: i64,
    pub currency: String,
    pub simulated: bool,
}

#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        config: Arc<AppConfig>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            db,
            event_sender,
            config,
            gateway,
        }
    }

    /// Creates (or returns) the payment row for a pending booking. One
    /// row per checkout; the same row is reused across retries.
    #[instrument(skip(self, request), fields(booking_id = %request.booking_id))]
    pub async fn create_booking_payment(
        &self,
        user_id: Uuid,
        request: CreateBookingPaymentRequest,
    ) -> Result<PaymentResponse, ServiceError> {
        let method = parse_payment_method(&request.method)?;
        let db = &*self.db;

        let booking_model = BookingEntity::find_by_id(request.booking_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Booking with ID {} not found",
                    request.booking_id
                ))
            })?;
        if booking_model.user_id != user_id {
            return Err(ServiceError::Forbidden(
                "Only the booking owner may pay for it".to_string(),
            ));
        }
        if booking_model.status != BookingStatus::Pending {
            return Err(ServiceError::InvalidOperation(format!(
                "Booking is not awaiting payment (status: {})",
                booking_model.status
            )));
        }

        if let Some(existing) = PaymentEntity::find()
            .filter(payment::Column::BookingId.eq(booking_model.id))
            .one(db)
            .await?
        {
            return match existing.status {
                PaymentStatus::Completed => Err(ServiceError::Conflict(
                    "Booking is already paid".to_string(),
                )),
                PaymentStatus::Cancelled => Err(ServiceError::Conflict(
                    "Payment for this booking was cancelled".to_string(),
                )),
                _ => Ok(to_response(existing)),
            };
        }

        let now = Utc::now();
        let model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            payment_code: Set(generate_code("PAY")),
            booking_id: Set(Some(booking_model.id)),
            amount: Set(booking_model.final_amount),
            processing_charges: Set(Decimal::ZERO),
            total_amount: Set(booking_model.final_amount),
            method: Set(method),
            status: Set(PaymentStatus::Pending),
            gateway_order_id: Set(None),
            gateway_payment_id: Set(None),
            gateway_signature: Set(None),
            currency: Set(self.config.gateway.currency.clone()),
            notes: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(db)
        .await?;

        info!(payment_id = %model.id, "Payment row created for booking");
        Ok(to_response(model))
    }

    /// Takes a pending payment to 'processing' and provisions the
    /// gateway order. A gateway failure falls back to a locally minted
    /// order id so checkout keeps working offline.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn start_checkout(
        &self,
        user_id: Uuid,
        is_admin: bool,
        payment_id: Uuid,
    ) -> Result<CheckoutResponse, ServiceError> {
        let db = &*self.db;
        let model = self.find_owned(user_id, is_admin, payment_id).await?;

        if !model.status.can_transition_to(PaymentStatus::Processing) {
            return Err(ServiceError::InvalidStateTransition {
                entity: "payment",
                from: model.status.to_string(),
                to: PaymentStatus::Processing.to_string(),
            });
        }

        let amount_minor = (model.total_amount * dec!(100))
            .round()
            .to_i64()
            .ok_or_else(|| {
                ServiceError::InternalError("Payment amount out of range".to_string())
            })?;

        let gateway_order_id = match self
            .gateway
            .create_order(amount_minor, &model.currency, &model.payment_code)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                // Keep checkout alive when the gateway is unreachable;
                // the callback path treats the fallback id like any other.
                warn!(error = %e, payment_id = %model.id, "Gateway order creation failed, using fallback id");
                format!("fallback_order_{}", model.id)
            }
        };

        let mut active = model.into_active_model();
        active.status = Set(PaymentStatus::Processing);
        active.gateway_order_id = Set(Some(gateway_order_id.clone()));
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        info!(
            payment_id = %updated.id,
            gateway_order_id = %gateway_order_id,
            amount_minor,
            "Checkout started"
        );
        self.event_sender
            .publish(Event::PaymentInitiated(updated.id))
            .await;

        let currency = updated.currency.clone();
        Ok(CheckoutResponse {
            payment: to_response(updated),
            gateway_order_id,
            amount_minor,
            currency,
            simulated: self.config.gateway.is_simulated(),
        })
    }

    /// Applies the gateway's success/failure callback.
    ///
    /// A valid signature completes the payment and cascades in one
    /// transaction: a booking-linked payment confirms the booking; a
    /// food-order payment moves the order to 'preparing'; an invoice is
    /// issued either way. An invalid signature marks the payment failed
    /// and surfaces a typed error, leaving every cascade untouched.
    #[instrument(skip(self, callback), fields(gateway_order_id = %callback.gateway_order_id))]
    pub async fn handle_callback(
        &self,
        callback: GatewayCallback,
    ) -> Result<PaymentResponse, ServiceError> {
        let db = &*self.db;

        let model = PaymentEntity::find()
            .filter(payment::Column::GatewayOrderId.eq(callback.gateway_order_id.clone()))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No payment for gateway order {}",
                    callback.gateway_order_id
                ))
            })?;

        if model.status != PaymentStatus::Processing {
            return Err(ServiceError::InvalidStateTransition {
                entity: "payment",
                from: model.status.to_string(),
                to: PaymentStatus::Completed.to_string(),
            });
        }

        let valid = verify_signature(
            &self.config.gateway.secret,
            &callback.gateway_order_id,
            &callback.gateway_payment_id,
            &callback.signature,
        );
        if !valid {
            warn!(payment_id = %model.id, "Callback signature mismatch");
            let payment_id = model.id;
            let mut active = model.into_active_model();
            active.status = Set(PaymentStatus::Failed);
            active.updated_at = Set(Some(Utc::now()));
            active.update(db).await?;

            self.event_sender
                .publish(Event::PaymentFailed(payment_id))
                .await;
            return Err(ServiceError::SignatureVerificationFailed);
        }

        let now = Utc::now();
        let booking_ref = model.booking_id;
        let food_order_ref = parse_food_order_note(model.notes.as_deref());
        let payment_id = model.id;
        let (amount, total_amount) = (model.amount, model.total_amount);

        let txn = db.begin().await?;

        let mut active = model.into_active_model();
        active.status = Set(PaymentStatus::Completed);
        active.gateway_payment_id = Set(Some(callback.gateway_payment_id.clone()));
        active.gateway_signature = Set(Some(callback.signature.clone()));
        active.completed_at = Set(Some(now));
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        let mut confirmed_booking = None;
        if let Some(booking_id) = booking_ref {
            let booking_model = BookingEntity::find_by_id(booking_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Booking with ID {} not found", booking_id))
                })?;
            if !booking_model
                .status
                .can_transition_to(BookingStatus::Confirmed)
            {
                return Err(ServiceError::InvalidStateTransition {
                    entity: "booking",
                    from: booking_model.status.to_string(),
                    to: BookingStatus::Confirmed.to_string(),
                });
            }
            let mut b = booking_model.into_active_model();
            b.status = Set(BookingStatus::Confirmed);
            b.updated_at = Set(Some(now));
            b.update(&txn).await?;
            confirmed_booking = Some(booking_id);
        } else if let Some(order_id) = food_order_ref {
            let order = FoodOrderEntity::find_by_id(order_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Food order with ID {} not found", order_id))
                })?;
            if order
                .status
                .can_transition_to(FoodOrderStatus::Preparing)
            {
                let mut o = order.into_active_model();
                o.status = Set(FoodOrderStatus::Preparing);
                o.updated_at = Set(Some(now));
                o.update(&txn).await?;
            }
        }

        let today = now.date_naive();
        invoice::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_code: Set(generate_code("INV")),
            payment_id: Set(payment_id),
            invoice_date: Set(today),
            due_date: Set(today + Duration::days(7)),
            subtotal: Set(amount),
            tax: Set(Decimal::ZERO),
            total: Set(total_amount),
            is_paid: Set(true),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to commit payment callback");
            ServiceError::DatabaseError(e)
        })?;

        info!(payment_id = %payment_id, "Payment completed");
        self.event_sender
            .publish(Event::PaymentCompleted(payment_id))
            .await;
        if let Some(booking_id) = confirmed_booking {
            self.event_sender
                .publish(Event::BookingConfirmed(booking_id))
                .await;
        }

        Ok(to_response(updated))
    }

    /// Simulated-mode convenience: fabricates a gateway payment id and
    /// a valid signature, then drives the normal callback path.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn simulate_success(
        &self,
        user_id: Uuid,
        is_admin: bool,
        payment_id: Uuid,
    ) -> Result<PaymentResponse, ServiceError> {
        if !self.config.gateway.is_simulated() {
            return Err(ServiceError::InvalidOperation(
                "Simulated completion requires the simulated gateway".to_string(),
            ));
        }

        let model = self.find_owned(user_id, is_admin, payment_id).await?;
        let order_id = model.gateway_order_id.clone().ok_or_else(|| {
            ServiceError::InvalidOperation(
                "Checkout has not been started for this payment".to_string(),
            )
        })?;

        let gateway_payment_id = format!("sim_pay_{}", Uuid::new_v4().simple());
        let signature =
            compute_signature(&self.config.gateway.secret, &order_id, &gateway_payment_id);

        self.handle_callback(GatewayCallback {
            gateway_order_id: order_id,
            gateway_payment_id,
            signature,
        })
        .await
    }

    /// Resets a failed (or never-started) payment so the user can
    /// re-enter checkout. The row is reused; prior gateway fields are
    /// cleared rather than archived.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn retry_payment(
        &self,
        user_id: Uuid,
        is_admin: bool,
        payment_id: Uuid,
    ) -> Result<PaymentResponse, ServiceError> {
        let db = &*self.db;
        let model = self.find_owned(user_id, is_admin, payment_id).await?;

        if !model.status.is_retryable() {
            return Err(ServiceError::InvalidStateTransition {
                entity: "payment",
                from: model.status.to_string(),
                to: PaymentStatus::Pending.to_string(),
            });
        }

        let mut active = model.into_active_model();
        active.status = Set(PaymentStatus::Pending);
        active.gateway_order_id = Set(None);
        active.gateway_payment_id = Set(None);
        active.gateway_signature = Set(None);
        active.completed_at = Set(None);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        info!(payment_id = %payment_id, "Payment reset for retry");
        self.event_sender
            .publish(Event::PaymentRetried(payment_id))
            .await;

        Ok(to_response(updated))
    }

    /// Abandons an in-flight payment.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn cancel_payment(
        &self,
        user_id: Uuid,
        is_admin: bool,
        payment_id: Uuid,
    ) -> Result<PaymentResponse, ServiceError> {
        let db = &*self.db;
        let model = self.find_owned(user_id, is_admin, payment_id).await?;

        if !model.status.can_transition_to(PaymentStatus::Cancelled) {
            return Err(ServiceError::InvalidStateTransition {
                entity: "payment",
                from: model.status.to_string(),
                to: PaymentStatus::Cancelled.to_string(),
            });
        }

        let mut active = model.into_active_model();
        active.status = Set(PaymentStatus::Cancelled);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        self.event_sender
            .publish(Event::PaymentCancelled(payment_id))
            .await;

        Ok(to_response(updated))
    }

    pub async fn get_payment(
        &self,
        user_id: Uuid,
        is_admin: bool,
        payment_id: Uuid,
    ) -> Result<PaymentResponse, ServiceError> {
        let model = self.find_owned(user_id, is_admin, payment_id).await?;
        Ok(to_response(model))
    }

    /// Loads a payment and enforces ownership: a booking payment belongs
    /// to the booking's user, a food-order payment to the order's user.
    async fn find_owned(
        &self,
        user_id: Uuid,
        is_admin: bool,
        payment_id: Uuid,
    ) -> Result<payment::Model, ServiceError> {
        let db = &*self.db;
        let model = PaymentEntity::find_by_id(payment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Payment with ID {} not found", payment_id))
            })?;

        if is_admin {
            return Ok(model);
        }

        let owner = if let Some(booking_id) = model.booking_id {
            BookingEntity::find_by_id(booking_id)
                .one(db)
                .await?
                .map(|b| b.user_id)
        } else if let Some(order_id) = parse_food_order_note(model.notes.as_deref()) {
            FoodOrderEntity::find_by_id(order_id)
                .one(db)
                .await?
                .map(|o| o.user_id)
        } else {
            None
        };

        match owner {
            Some(owner_id) if owner_id == user_id => Ok(model),
            _ => Err(ServiceError::Forbidden(
                "Payments are visible to their owner only".to_string(),
            )),
        }
    }
}

fn to_response(model: payment::Model) -> PaymentResponse {
    PaymentResponse {
        id: model.id,
        payment_code: model.payment_code,
        booking_id: model.booking_id,
        amount: model.amount,
        processing_charges: model.processing_charges,
        total_amount: model.total_amount,
        method: model.method.to_string(),
        status: model.status.to_string(),
        gateway_order_id: model.gateway_order_id,
        currency: model.currency,
        notes: model.notes,
        completed_at: model.completed_at,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_gateway_secret";

    #[test]
    fn signature_round_trip() {
        let sig = compute_signature(SECRET, "sim_order_abc", "sim_pay_def");
        assert!(verify_signature(SECRET, "sim_order_abc", "sim_pay_def", &sig));
    }

    #[test]
    fn signature_rejects_tampering() {
        let sig = compute_signature(SECRET, "sim_order_abc", "sim_pay_def");
        assert!(!verify_signature(SECRET, "sim_order_abc", "sim_pay_XXX", &sig));
        assert!(!verify_signature(SECRET, "sim_order_XXX", "sim_pay_def", &sig));
        assert!(!verify_signature("other_secret", "sim_order_abc", "sim_pay_def", &sig));
        assert!(!verify_signature(SECRET, "sim_order_abc", "sim_pay_def", "not-hex!"));
    }

    #[test]
    fn food_order_note_round_trip() {
        let id = Uuid::new_v4();
        let note = food_order_note(id);
        assert_eq!(parse_food_order_note(Some(&note)), Some(id));
        assert_eq!(parse_food_order_note(Some("unrelated note")), None);
        assert_eq!(parse_food_order_note(Some("food_order:not-a-uuid")), None);
        assert_eq!(parse_food_order_note(None), None);
    }

    #[test]
    fn method_parsing() {
        assert_eq!(parse_payment_method("upi").unwrap(), PaymentMethod::Upi);
        assert_eq!(
            parse_payment_method("Credit_Card").unwrap(),
            PaymentMethod::CreditCard
        );
        assert!(parse_payment_method("cheque").is_err());
    }

    #[tokio::test]
    async fn simulated_gateway_mints_prefixed_ids() {
        let id = SimulatedGateway
            .create_order(31_500, "INR", "PAY1234ABCD")
            .await
            .unwrap();
        assert!(id.starts_with("sim_order_"));
        assert_eq!(id.len(), "sim_order_".len() + 12);
    }
}
