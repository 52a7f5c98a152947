use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "theatres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[sea_orm(nullable)]
    pub phone_number: Option<String>,
    pub total_screens: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::screen::Entity")]
    Screens,
    #[sea_orm(has_many = "super::food_order::Entity")]
    FoodOrders,
}

impl Related<super::screen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Screens.def()
    }
}

impl Related<super::food_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
