//! Theatres, their screens, and the seat layout per screen.

use crate::{
    db::DbPool,
    entities::{
        screen::{self, Entity as ScreenEntity},
        seat::{self, Entity as SeatEntity, SeatType},
        theatre::{self, Entity as TheatreEntity},
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateTheatreRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateTheatreRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}

/// Creates a screen and, when row counts are given, its full seat
/// grid in one shot.
#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateScreenRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 50, message = "Rows must be 1-50"))]
    pub total_rows: i32,
    #[validate(range(min = 1, max = 100, message = "Seats per row must be 1-100"))]
    pub seats_per_row: i32,
    pub base_price: Decimal,
    pub seat_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateSeatRequest {
    #[validate(length(min = 1, max = 5))]
    pub row: String,
    #[validate(range(min = 1))]
    pub seat_number: i32,
    pub seat_type: Option<String>,
    pub base_price: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct TheatreFilters {
    pub city: Option<String>,
    pub include_inactive: Option<bool>,
}

pub fn parse_seat_type(s: &str) -> Result<SeatType, ServiceError> {
    match s {
        "standard" => Ok(SeatType::Standard),
        "premium" => Ok(SeatType::Premium),
        "vip" => Ok(SeatType::Vip),
        "couple" => Ok(SeatType::Couple),
        other => Err(ServiceError::InvalidInput(format!(
            "Unknown seat type '{}'",
            other
        ))),
    }
}

/// Row indexes map to spreadsheet-style labels: 0 -> A, 25 -> Z,
/// 26 -> AA.
fn row_label(index: i32) -> String {
    let mut n = index;
    let mut label = String::new();
    loop {
        label.insert(0, (b'A' + (n % 26) as u8) as char);
        n = n / 26 - 1;
        if n < 0 {
            break;
        }
    }
    label
}

#[derive(Clone)]
pub struct TheatreService {
    db: Arc<DbPool>,
}

impl TheatreService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_theatre(
        &self,
        request: CreateTheatreRequest,
    ) -> Result<theatre::Model, ServiceError> {
        request.validate()?;
        let now = Utc::now();
        let model = theatre::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            address: Set(request.address),
            city: Set(request.city),
            state: Set(request.state),
            postal_code: Set(request.postal_code),
            phone_number: Set(request.phone_number),
            total_screens: Set(0),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.db)
        .await?;
        info!(theatre_id = %model.id, "Theatre created");
        Ok(model)
    }

    pub async fn update_theatre(
        &self,
        theatre_id: Uuid,
        request: UpdateTheatreRequest,
    ) -> Result<theatre::Model, ServiceError> {
        request.validate()?;
        let model = self.find_theatre(theatre_id).await?;
        let mut active = model.into_active_model();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }
        if let Some(city) = request.city {
            active.city = Set(city);
        }
        if let Some(state) = request.state {
            active.state = Set(state);
        }
        if let Some(postal_code) = request.postal_code {
            active.postal_code = Set(postal_code);
        }
        if let Some(phone) = request.phone_number {
            active.phone_number = Set(Some(phone));
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));
        Ok(active.update(&*self.db).await?)
    }

    pub async fn get_theatre(&self, theatre_id: Uuid) -> Result<theatre::Model, ServiceError> {
        self.find_theatre(theatre_id).await
    }

    pub async fn list_theatres(
        &self,
        filters: TheatreFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<theatre::Model>, u64), ServiceError> {
        let mut query = TheatreEntity::find().order_by_asc(theatre::Column::Name);
        if let Some(city) = &filters.city {
            query = query.filter(theatre::Column::City.eq(city.clone()));
        }
        if !filters.include_inactive.unwrap_or(false) {
            query = query.filter(theatre::Column::IsActive.eq(true));
        }
        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((models, total))
    }

    /// Creates a screen under a theatre together with its seat grid.
    /// Screen names are unique within a theatre.
    #[instrument(skip(self, request), fields(theatre_id = %theatre_id, name = %request.name))]
    pub async fn create_screen(
        &self,
        theatre_id: Uuid,
        request: CreateScreenRequest,
    ) -> Result<screen::Model, ServiceError> {
        request.validate()?;
        if request.base_price <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Base price must be positive".to_string(),
            ));
        }
        let seat_type = match request.seat_type.as_deref() {
            Some(s) => parse_seat_type(s)?,
            None => SeatType::Standard,
        };
        let db = &*self.db;
        let theatre_model = self.find_theatre(theatre_id).await?;

        let now = Utc::now();
        let screen_id = Uuid::new_v4();
        let txn = db.begin().await?;

        let inserted = screen::ActiveModel {
            id: Set(screen_id),
            theatre_id: Set(theatre_id),
            name: Set(request.name),
            capacity: Set(request.total_rows * request.seats_per_row),
            total_rows: Set(request.total_rows),
            seats_per_row: Set(request.seats_per_row),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict(
                    "A screen with this name already exists in the theatre".to_string(),
                )
            } else {
                ServiceError::DatabaseError(e)
            }
        })?;

        for row_index in 0..request.total_rows {
            let row = row_label(row_index);
            for number in 1..=request.seats_per_row {
                seat::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    screen_id: Set(screen_id),
                    row: Set(row.clone()),
                    seat_number: Set(number),
                    seat_type: Set(seat_type),
                    base_price: Set(request.base_price),
                    is_active: Set(true),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await?;
            }
        }

        let mut theatre_active = theatre_model.clone().into_active_model();
        theatre_active.total_screens = Set(theatre_model.total_screens + 1);
        theatre_active.updated_at = Set(Some(now));
        theatre_active.update(&txn).await?;

        txn.commit().await?;
        info!(screen_id = %screen_id, seats = inserted.capacity, "Screen created with seat grid");
        Ok(inserted)
    }

    pub async fn list_screens(
        &self,
        theatre_id: Uuid,
    ) -> Result<Vec<screen::Model>, ServiceError> {
        self.find_theatre(theatre_id).await?;
        Ok(ScreenEntity::find()
            .filter(screen::Column::TheatreId.eq(theatre_id))
            .order_by_asc(screen::Column::Name)
            .all(&*self.db)
            .await?)
    }

    pub async fn get_screen(&self, screen_id: Uuid) -> Result<screen::Model, ServiceError> {
        ScreenEntity::find_by_id(screen_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Screen with ID {} not found", screen_id))
            })
    }

    /// Adds one seat to a screen. Position (row, number) is unique
    /// per screen.
    pub async fn create_seat(
        &self,
        screen_id: Uuid,
        request: CreateSeatRequest,
    ) -> Result<seat::Model, ServiceError> {
        request.validate()?;
        if request.base_price <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Base price must be positive".to_string(),
            ));
        }
        let seat_type = match request.seat_type.as_deref() {
            Some(s) => parse_seat_type(s)?,
            None => SeatType::Standard,
        };
        self.get_screen(screen_id).await?;

        seat::ActiveModel {
            id: Set(Uuid::new_v4()),
            screen_id: Set(screen_id),
            row: Set(request.row.to_uppercase()),
            seat_number: Set(request.seat_number),
            seat_type: Set(seat_type),
            base_price: Set(request.base_price),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("This seat position is already taken".to_string())
            } else {
                ServiceError::DatabaseError(e)
            }
        })
    }

    pub async fn list_seats(&self, screen_id: Uuid) -> Result<Vec<seat::Model>, ServiceError> {
        self.get_screen(screen_id).await?;
        Ok(SeatEntity::find()
            .filter(seat::Column::ScreenId.eq(screen_id))
            .order_by_asc(seat::Column::Row)
            .order_by_asc(seat::Column::SeatNumber)
            .all(&*self.db)
            .await?)
    }

    async fn find_theatre(&self, theatre_id: Uuid) -> Result<theatre::Model, ServiceError> {
        TheatreEntity::find_by_id(theatre_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Theatre with ID {} not found", theatre_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::row_label;

    #[test]
    fn row_labels_follow_spreadsheet_order() {
        assert_eq!(row_label(0), "A");
        assert_eq!(row_label(25), "Z");
        assert_eq!(row_label(26), "AA");
        assert_eq!(row_label(27), "AB");
    }
}
