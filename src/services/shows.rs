//! Show scheduling and the per-show seat map.
//!
//! A seat is available for a show when it is active and no
//! non-cancelled ticket exists for the (show, seat) pair. The seat
//! map reports exactly that; the booking path re-checks it under the
//! unique index.

use crate::{
    db::DbPool,
    entities::{
        movie::{self, Entity as MovieEntity},
        screen::{self, Entity as ScreenEntity},
        seat::{self, Entity as SeatEntity},
        show::{self, Entity as ShowEntity, ShowStatus},
        theatre::Entity as TheatreEntity,
        ticket::{self, Entity as TicketEntity, TicketStatus},
    },
    errors::ServiceError,
    services::bookings::screen_two_override,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateShowRequest {
    pub movie_id: Uuid,
    pub screen_id: Uuid,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub end_time: NaiveTime,
    pub base_ticket_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateShowRequest {
    pub show_date: Option<NaiveDate>,
    pub show_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub base_ticket_price: Option<Decimal>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowFilters {
    pub movie_id: Option<Uuid>,
    pub theatre_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShowResponse {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub movie_title: String,
    pub screen_id: Uuid,
    pub screen_name: String,
    pub theatre_id: Uuid,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub end_time: NaiveTime,
    pub base_ticket_price: Decimal,
    pub status: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeatMapEntry {
    pub seat_id: Uuid,
    pub label: String,
    pub row: String,
    pub seat_number: i32,
    pub seat_type: String,
    /// Effective price for this show, overrides included
    pub price: Decimal,
    pub is_available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeatMapResponse {
    pub show_id: Uuid,
    pub screen_id: Uuid,
    pub total_seats: usize,
    pub available_seats: usize,
    pub seats: Vec<SeatMapEntry>,
}

pub fn parse_show_status(s: &str) -> Result<ShowStatus, ServiceError> {
    match s {
        "available" => Ok(ShowStatus::Available),
        "housefull" => Ok(ShowStatus::Housefull),
        "cancelled" => Ok(ShowStatus::Cancelled),
        other => Err(ServiceError::InvalidInput(format!(
            "Unknown show status '{}'",
            other
        ))),
    }
}

#[derive(Clone)]
pub struct ShowService {
    db: Arc<DbPool>,
}

impl ShowService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(movie_id = %request.movie_id, screen_id = %request.screen_id))]
    pub async fn create_show(
        &self,
        request: CreateShowRequest,
    ) -> Result<ShowResponse, ServiceError> {
        if request.end_time <= request.show_time {
            return Err(ServiceError::InvalidInput(
                "End time must be after show time".to_string(),
            ));
        }
        if request.base_ticket_price <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Base ticket price must be positive".to_string(),
            ));
        }
        let db = &*self.db;

        let movie_model = MovieEntity::find_by_id(request.movie_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Movie with ID {} not found", request.movie_id))
            })?;
        let screen_model = ScreenEntity::find_by_id(request.screen_id)
            .one(db)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Screen with ID {} not found or inactive",
                    request.screen_id
                ))
            })?;

        // Overlap on the same screen and date is rejected outright
        let overlapping = ShowEntity::find()
            .filter(show::Column::ScreenId.eq(request.screen_id))
            .filter(show::Column::ShowDate.eq(request.show_date))
            .filter(show::Column::IsActive.eq(true))
            .filter(show::Column::Status.ne(ShowStatus::Cancelled))
            .all(db)
            .await?
            .into_iter()
            .any(|s| request.show_time < s.end_time && s.show_time < request.end_time);
        if overlapping {
            return Err(ServiceError::Conflict(
                "The screen already has a show in this time slot".to_string(),
            ));
        }

        let now = Utc::now();
        let model = show::ActiveModel {
            id: Set(Uuid::new_v4()),
            movie_id: Set(request.movie_id),
            screen_id: Set(request.screen_id),
            show_date: Set(request.show_date),
            show_time: Set(request.show_time),
            end_time: Set(request.end_time),
            base_ticket_price: Set(request.base_ticket_price),
            status: Set(ShowStatus::Available),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(db)
        .await?;

        info!(show_id = %model.id, "Show scheduled");
        Ok(to_show_response(model, &movie_model, &screen_model))
    }

    pub async fn update_show(
        &self,
        show_id: Uuid,
        request: UpdateShowRequest,
    ) -> Result<ShowResponse, ServiceError> {
        let db = &*self.db;
        let model = self.find_show(show_id).await?;

        let next_status = match request.status.as_deref() {
            Some(s) => Some(parse_show_status(s)?),
            None => None,
        };
        if let Some(next) = next_status {
            if !model.status.can_transition_to(next) {
                return Err(ServiceError::InvalidStateTransition {
                    entity: "show",
                    from: model.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        let show_time = request.show_time.unwrap_or(model.show_time);
        let end_time = request.end_time.unwrap_or(model.end_time);
        if end_time <= show_time {
            return Err(ServiceError::InvalidInput(
                "End time must be after show time".to_string(),
            ));
        }
        if let Some(price) = request.base_ticket_price {
            if price <= Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "Base ticket price must be positive".to_string(),
                ));
            }
        }

        let mut active = model.into_active_model();
        if let Some(date) = request.show_date {
            active.show_date = Set(date);
        }
        active.show_time = Set(show_time);
        active.end_time = Set(end_time);
        if let Some(price) = request.base_ticket_price {
            active.base_ticket_price = Set(price);
        }
        if let Some(next) = next_status {
            active.status = Set(next);
            if next == ShowStatus::Cancelled {
                active.is_active = Set(false);
            }
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        self.show_response(updated).await
    }

    pub async fn get_show(&self, show_id: Uuid) -> Result<ShowResponse, ServiceError> {
        let model = self.find_show(show_id).await?;
        self.show_response(model).await
    }

    pub async fn list_shows(
        &self,
        filters: ShowFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ShowResponse>, u64), ServiceError> {
        let db = &*self.db;
        let mut query = ShowEntity::find()
            .filter(show::Column::IsActive.eq(true))
            .order_by_asc(show::Column::ShowDate)
            .order_by_asc(show::Column::ShowTime);

        if let Some(movie_id) = filters.movie_id {
            query = query.filter(show::Column::MovieId.eq(movie_id));
        }
        if let Some(date) = filters.date {
            query = query.filter(show::Column::ShowDate.eq(date));
        }
        if let Some(theatre_id) = filters.theatre_id {
            TheatreEntity::find_by_id(theatre_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Theatre with ID {} not found", theatre_id))
                })?;
            let screen_ids: Vec<Uuid> = ScreenEntity::find()
                .filter(screen::Column::TheatreId.eq(theatre_id))
                .all(db)
                .await?
                .into_iter()
                .map(|s| s.id)
                .collect();
            query = query.filter(show::Column::ScreenId.is_in(screen_ids));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        let mut shows = Vec::with_capacity(models.len());
        for model in models {
            shows.push(self.show_response(model).await?);
        }
        Ok((shows, total))
    }

    /// The seat map for a show: every active seat of the screen with
    /// its effective price and whether it can still be booked.
    #[instrument(skip(self), fields(show_id = %show_id))]
    pub async fn seat_map(&self, show_id: Uuid) -> Result<SeatMapResponse, ServiceError> {
        let db = &*self.db;
        let show_model = self.find_show(show_id).await?;
        let screen_model = ScreenEntity::find_by_id(show_model.screen_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Screen with ID {} not found",
                    show_model.screen_id
                ))
            })?;

        let seats = SeatEntity::find()
            .filter(seat::Column::ScreenId.eq(screen_model.id))
            .filter(seat::Column::IsActive.eq(true))
            .order_by_asc(seat::Column::Row)
            .order_by_asc(seat::Column::SeatNumber)
            .all(db)
            .await?;

        let taken: HashSet<Uuid> = TicketEntity::find()
            .filter(ticket::Column::ShowId.eq(show_id))
            .filter(ticket::Column::Status.ne(TicketStatus::Cancelled))
            .all(db)
            .await?
            .into_iter()
            .map(|t| t.seat_id)
            .collect();

        let override_price = screen_two_override(&screen_model);
        let entries: Vec<SeatMapEntry> = seats
            .into_iter()
            .map(|s| SeatMapEntry {
                seat_id: s.id,
                label: s.label(),
                row: s.row.clone(),
                seat_number: s.seat_number,
                seat_type: s.seat_type.to_string(),
                price: override_price.unwrap_or(s.base_price),
                is_available: !taken.contains(&s.id),
            })
            .collect();

        let available = entries.iter().filter(|e| e.is_available).count();
        Ok(SeatMapResponse {
            show_id,
            screen_id: screen_model.id,
            total_seats: entries.len(),
            available_seats: available,
            seats: entries,
        })
    }

    async fn find_show(&self, show_id: Uuid) -> Result<show::Model, ServiceError> {
        ShowEntity::find_by_id(show_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Show with ID {} not found", show_id)))
    }

    async fn show_response(&self, model: show::Model) -> Result<ShowResponse, ServiceError> {
        let db = &*self.db;
        let movie_model = MovieEntity::find_by_id(model.movie_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Movie with ID {} not found", model.movie_id))
            })?;
        let screen_model = ScreenEntity::find_by_id(model.screen_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Screen with ID {} not found", model.screen_id))
            })?;
        Ok(to_show_response(model, &movie_model, &screen_model))
    }
}

fn to_show_response(
    model: show::Model,
    movie_model: &movie::Model,
    screen_model: &screen::Model,
) -> ShowResponse {
    ShowResponse {
        id: model.id,
        movie_id: model.movie_id,
        movie_title: movie_model.title.clone(),
        screen_id: model.screen_id,
        screen_name: screen_model.name.clone(),
        theatre_id: screen_model.theatre_id,
        show_date: model.show_date,
        show_time: model.show_time,
        end_time: model.end_time,
        base_ticket_price: model.base_ticket_price,
        status: model.status.to_string(),
        is_active: model.is_active,
    }
}
