use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Money owed back after a cancellation; 1:1 with both the payment
/// and the cancellation record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "refunds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub refund_code: String,
    pub payment_id: Uuid,
    pub cancellation_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub refund_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub refund_charges: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub net_refund_amount: Decimal,
    pub status: RefundStatus,
    #[sea_orm(nullable)]
    pub reason: Option<String>,
    #[sea_orm(nullable)]
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment::Entity",
        from = "Column::PaymentId",
        to = "super::payment::Column::Id"
    )]
    Payment,
    #[sea_orm(
        belongs_to = "super::booking_cancellation::Entity",
        from = "Column::CancellationId",
        to = "super::booking_cancellation::Column::Id"
    )]
    Cancellation,
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl Related<super::booking_cancellation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cancellation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, strum::Display)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefundStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RefundStatus {
    pub fn can_transition_to(self, next: RefundStatus) -> bool {
        use RefundStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Rejected)
                | (Processing, Completed)
                | (Processing, Rejected)
        )
    }
}
