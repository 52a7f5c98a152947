use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A film in the catalog; `rating` is the 0-10 aggregate of user reviews
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub release_date: Date,
    pub duration_minutes: i32,
    pub language: String,
    #[sea_orm(nullable)]
    pub certification: Option<String>,
    #[sea_orm(nullable)]
    pub director: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub rating: Decimal,
    pub status: MovieStatus,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genre::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_review::Entity")]
    MovieReviews,
    #[sea_orm(has_many = "super::show::Entity")]
    Shows,
}

impl Related<super::movie_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieReviews.def()
    }
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, strum::Display)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MovieStatus {
    #[sea_orm(string_value = "coming_soon")]
    ComingSoon,
    #[sea_orm(string_value = "now_showing")]
    NowShowing,
    #[sea_orm(string_value = "ended")]
    Ended,
}
