//! Seeds a demo catalog: an admin account, genres and movies, one
//! theatre with two screens, a week of shows, and the food menu.
//!
//! Safe to run repeatedly; existing rows are matched by their natural
//! keys and left alone.

use chrono::{Duration as ChronoDuration, NaiveTime, Utc};
use clap::Parser;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use cinepass_api as api;
use api::entities::{
    food_category, food_item, genre,
    movie::{self, MovieStatus},
    movie_genre,
    screen,
    seat::{self, SeatType},
    show::{self, ShowStatus},
    theatre, user,
};
use api::errors::ServiceError;

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Populate the database with demo data")]
struct Args {
    /// Admin username to create
    #[arg(long, default_value = "admin")]
    admin_username: String,

    /// Admin password (change it after first login)
    #[arg(long, default_value = "admin-password")]
    admin_password: String,

    /// How many days of shows to schedule, starting today
    #[arg(long, default_value_t = 7)]
    show_days: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = api::config::load_config()?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    let db = api::db::establish_connection_from_app_config(&cfg).await?;
    api::db::run_migrations(&db).await?;
    let db = Arc::new(db);

    seed_admin(&db, &args.admin_username, &args.admin_password).await?;
    let genre_ids = seed_genres(&db).await?;
    let movie_ids = seed_movies(&db, &genre_ids).await?;
    let screen_ids = seed_theatre(&db).await?;
    seed_shows(&db, &movie_ids, &screen_ids, args.show_days).await?;
    seed_food(&db).await?;

    info!("Seed complete");
    Ok(())
}

async fn seed_admin(
    db: &Arc<sea_orm::DatabaseConnection>,
    username: &str,
    password: &str,
) -> Result<(), ServiceError> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&**db)
        .await?;
    if existing.is_some() {
        info!(username, "Admin already present");
        return Ok(());
    }
    let now = Utc::now();
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(format!("{}@cinepass.local", username)),
        password_hash: Set(api::auth::hash_password(password)?),
        full_name: Set(Some("CinePass Admin".to_string())),
        phone_number: Set(None),
        is_admin: Set(true),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(Some(now)),
    }
    .insert(&**db)
    .await?;
    info!(username, "Admin created");
    Ok(())
}

async fn seed_genres(
    db: &Arc<sea_orm::DatabaseConnection>,
) -> Result<Vec<Uuid>, ServiceError> {
    let names = ["Action", "Drama", "Comedy", "Thriller", "Animation"];
    let futures = names.iter().map(|name| {
        let db = db.clone();
        async move {
            if let Some(existing) = genre::Entity::find()
                .filter(genre::Column::Name.eq(*name))
                .one(&*db)
                .await?
            {
                return Ok::<Uuid, ServiceError>(existing.id);
            }
            let model = genre::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name.to_string()),
                description: Set(None),
                created_at: Set(Utc::now()),
            }
            .insert(&*db)
            .await?;
            Ok(model.id)
        }
    });
    let ids = try_join_all(futures).await?;
    info!(count = ids.len(), "Genres ready");
    Ok(ids)
}

async fn seed_movies(
    db: &Arc<sea_orm::DatabaseConnection>,
    genre_ids: &[Uuid],
) -> Result<Vec<Uuid>, ServiceError> {
    let today = Utc::now().date_naive();
    let catalog: [(&str, &str, i32, MovieStatus); 3] = [
        (
            "Midnight Express Line",
            "A night-train heist goes sideways.",
            128,
            MovieStatus::NowShowing,
        ),
        (
            "The Last Projectionist",
            "A single-screen cinema fights the multiplex era.",
            112,
            MovieStatus::NowShowing,
        ),
        (
            "Papercut Skies",
            "An animated tale of a city folded from paper.",
            96,
            MovieStatus::ComingSoon,
        ),
    ];

    let mut movie_ids = Vec::with_capacity(catalog.len());
    for (index, (title, description, duration, status)) in catalog.into_iter().enumerate() {
        if let Some(existing) = movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(&**db)
            .await?
        {
            movie_ids.push(existing.id);
            continue;
        }
        let now = Utc::now();
        let movie_id = Uuid::new_v4();
        movie::ActiveModel {
            id: Set(movie_id),
            title: Set(title.to_string()),
            description: Set(Some(description.to_string())),
            release_date: Set(today - ChronoDuration::days(14)),
            duration_minutes: Set(duration),
            language: Set("English".to_string()),
            certification: Set(Some("UA".to_string())),
            director: Set(None),
            rating: Set(Decimal::ZERO),
            status: Set(status),
            is_featured: Set(index == 0),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&**db)
        .await?;

        // Two genres per movie, rotating through the list
        for offset in 0..2usize {
            let genre_id = genre_ids[(index + offset) % genre_ids.len()];
            movie_genre::ActiveModel {
                id: Set(Uuid::new_v4()),
                movie_id: Set(movie_id),
                genre_id: Set(genre_id),
                created_at: Set(now),
            }
            .insert(&**db)
            .await?;
        }
        movie_ids.push(movie_id);
    }
    info!(count = movie_ids.len(), "Movies ready");
    Ok(movie_ids)
}

/// One theatre with "Screen 1" (standard) and "Screen 2" (the
/// premium hall with its flat price).
async fn seed_theatre(
    db: &Arc<sea_orm::DatabaseConnection>,
) -> Result<Vec<Uuid>, ServiceError> {
    let theatre_name = "CinePass Central";
    let theatre_id = match theatre::Entity::find()
        .filter(theatre::Column::Name.eq(theatre_name))
        .one(&**db)
        .await?
    {
        Some(existing) => existing.id,
        None => {
            let now = Utc::now();
            let model = theatre::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(theatre_name.to_string()),
                address: Set("1 Marquee Road".to_string()),
                city: Set("Mumbai".to_string()),
                state: Set("Maharashtra".to_string()),
                postal_code: Set("400001".to_string()),
                phone_number: Set(None),
                total_screens: Set(2),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            }
            .insert(&**db)
            .await?;
            model.id
        }
    };

    let mut screen_ids = Vec::with_capacity(2);
    for (name, rows, per_row, price, seat_type) in [
        ("Screen 1", 8, 10, dec!(150.00), SeatType::Standard),
        ("Screen 2", 6, 8, dec!(250.00), SeatType::Premium),
    ] {
        let screen_id = match screen::Entity::find()
            .filter(screen::Column::TheatreId.eq(theatre_id))
            .filter(screen::Column::Name.eq(name))
            .one(&**db)
            .await?
        {
            Some(existing) => existing.id,
            None => {
                let now = Utc::now();
                let screen_id = Uuid::new_v4();
                screen::ActiveModel {
                    id: Set(screen_id),
                    theatre_id: Set(theatre_id),
                    name: Set(name.to_string()),
                    capacity: Set(rows * per_row),
                    total_rows: Set(rows),
                    seats_per_row: Set(per_row),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(Some(now)),
                }
                .insert(&**db)
                .await?;

                for row_index in 0..rows {
                    let row = char::from(b'A' + row_index as u8).to_string();
                    for number in 1..=per_row {
                        seat::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            screen_id: Set(screen_id),
                            row: Set(row.clone()),
                            seat_number: Set(number),
                            seat_type: Set(seat_type),
                            base_price: Set(price),
                            is_active: Set(true),
                            created_at: Set(now),
                        }
                        .insert(&**db)
                        .await?;
                    }
                }
                screen_id
            }
        };
        screen_ids.push(screen_id);
    }
    info!(theatre = theatre_name, "Theatre ready");
    Ok(screen_ids)
}

async fn seed_shows(
    db: &Arc<sea_orm::DatabaseConnection>,
    movie_ids: &[Uuid],
    screen_ids: &[Uuid],
    days: i64,
) -> Result<(), ServiceError> {
    let today = Utc::now().date_naive();
    let slots = [
        (
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
        ),
        (
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        ),
    ];

    let mut created = 0usize;
    for day in 0..days {
        let date = today + ChronoDuration::days(day);
        for (screen_index, screen_id) in screen_ids.iter().enumerate() {
            for (slot_index, (start, end)) in slots.iter().enumerate() {
                let movie_id = movie_ids[(screen_index + slot_index) % movie_ids.len()];
                let exists = show::Entity::find()
                    .filter(show::Column::ScreenId.eq(*screen_id))
                    .filter(show::Column::ShowDate.eq(date))
                    .filter(show::Column::ShowTime.eq(*start))
                    .one(&**db)
                    .await?
                    .is_some();
                if exists {
                    continue;
                }
                let now = Utc::now();
                show::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    movie_id: Set(movie_id),
                    screen_id: Set(*screen_id),
                    show_date: Set(date),
                    show_time: Set(*start),
                    end_time: Set(*end),
                    base_ticket_price: Set(dec!(180.00)),
                    status: Set(ShowStatus::Available),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(Some(now)),
                }
                .insert(&**db)
                .await?;
                created += 1;
            }
        }
    }
    info!(created, "Shows scheduled");
    Ok(())
}

async fn seed_food(db: &Arc<sea_orm::DatabaseConnection>) -> Result<(), ServiceError> {
    let menu: [(&str, &[(&str, Decimal, i32, bool)]); 2] = [
        (
            "Snacks",
            &[
                ("Salted Popcorn (L)", dec!(250.00), 5, true),
                ("Cheese Nachos", dec!(290.00), 8, true),
                ("Veg Burger", dec!(220.00), 12, true),
            ],
        ),
        (
            "Beverages",
            &[
                ("Cola (L)", dec!(180.00), 2, true),
                ("Cold Coffee", dec!(210.00), 6, true),
            ],
        ),
    ];

    for (category_name, items) in menu {
        let category_id = match food_category::Entity::find()
            .filter(food_category::Column::Name.eq(category_name))
            .one(&**db)
            .await?
        {
            Some(existing) => existing.id,
            None => {
                let model = food_category::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(category_name.to_string()),
                    description: Set(None),
                    is_active: Set(true),
                    created_at: Set(Utc::now()),
                }
                .insert(&**db)
                .await?;
                model.id
            }
        };

        for (name, price, prep_minutes, vegetarian) in items {
            let exists = food_item::Entity::find()
                .filter(food_item::Column::Name.eq(*name))
                .one(&**db)
                .await?
                .is_some();
            if exists {
                continue;
            }
            let now = Utc::now();
            food_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                category_id: Set(Some(category_id)),
                name: Set(name.to_string()),
                description: Set(None),
                price: Set(*price),
                quantity_unit: Set("piece".to_string()),
                is_available: Set(true),
                is_vegetarian: Set(*vegetarian),
                preparation_time_minutes: Set(*prep_minutes),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            }
            .insert(&**db)
            .await?;
        }
    }
    info!("Food menu ready");
    Ok(())
}
