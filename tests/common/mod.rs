//! Shared test harness: a fresh SQLite database per test with the
//! full service stack wired on top.
#![allow(dead_code)]

use chrono::{Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

use cinepass_api as api;

use api::config::AppConfig;
use api::entities::{food_category, food_item};
use api::db::{establish_connection_with_config, run_migrations, DbConfig, DbPool};
use api::events::EventSender;
use api::handlers::AppServices;
use api::services::shows::CreateShowRequest;
use api::services::theatres::{CreateScreenRequest, CreateTheatreRequest};
use api::services::users::RegisterRequest;

pub struct TestApp {
    pub db: Arc<DbPool>,
    pub config: Arc<AppConfig>,
    pub services: AppServices,
    // Dropping the dir deletes the database file
    _tmp: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let tmp = TempDir::new().expect("create temp dir");
    let db_path = tmp.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    // One connection so SQLite serializes writers deterministically
    let db = establish_connection_with_config(&DbConfig {
        url,
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    })
    .await
    .expect("connect test db");
    run_migrations(&db).await.expect("run migrations");
    let db = Arc::new(db);

    let config = Arc::new(AppConfig::new(
        "unused".to_string(),
        "test_secret_that_is_definitely_long_enough_for_the_sixty_four_char_rule".to_string(),
        3600,
        "127.0.0.1".to_string(),
        0,
        "development".to_string(),
    ));

    let (tx, mut rx) = mpsc::channel(64);
    // Drain events so publishes never block
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let event_sender = Arc::new(EventSender::new(tx));

    let services = AppServices::new(db.clone(), event_sender, config.clone());

    TestApp {
        db,
        config,
        services,
        _tmp: tmp,
    }
}

pub async fn register_user(app: &TestApp, username: &str) -> Uuid {
    app.services
        .users
        .register(RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct-horse-battery".to_string(),
            full_name: None,
            phone_number: None,
        })
        .await
        .expect("register user")
        .id
}

pub struct ShowFixture {
    pub show_id: Uuid,
    pub theatre_id: Uuid,
    pub screen_id: Uuid,
    pub seat_ids: Vec<Uuid>,
    pub seat_price: Decimal,
}

/// A theatre with one screen (2 rows x 3 seats at `seat_price`) and a
/// show tomorrow evening.
pub async fn seed_show(app: &TestApp, screen_name: &str, seat_price: Decimal) -> ShowFixture {
    let theatre = app
        .services
        .theatres
        .create_theatre(CreateTheatreRequest {
            name: format!("Test Theatre {}", Uuid::new_v4().simple()),
            address: "1 Test Street".to_string(),
            city: "Testville".to_string(),
            state: "TS".to_string(),
            postal_code: "00000".to_string(),
            phone_number: None,
        })
        .await
        .expect("create theatre");

    let screen = app
        .services
        .theatres
        .create_screen(
            theatre.id,
            CreateScreenRequest {
                name: screen_name.to_string(),
                total_rows: 2,
                seats_per_row: 3,
                base_price: seat_price,
                seat_type: None,
            },
        )
        .await
        .expect("create screen");

    let seats = app
        .services
        .theatres
        .list_seats(screen.id)
        .await
        .expect("list seats");

    let movie = app
        .services
        .movies
        .create_movie(api::services::movies::CreateMovieRequest {
            title: format!("Test Feature {}", Uuid::new_v4().simple()),
            description: None,
            release_date: Utc::now().date_naive(),
            duration_minutes: 120,
            language: "English".to_string(),
            certification: None,
            director: None,
            status: Some("now_showing".to_string()),
            is_featured: None,
            genre_ids: vec![],
        })
        .await
        .expect("create movie");

    let show = app
        .services
        .shows
        .create_show(CreateShowRequest {
            movie_id: movie.id,
            screen_id: screen.id,
            show_date: Utc::now().date_naive() + Duration::days(1),
            show_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            base_ticket_price: dec!(180.00),
        })
        .await
        .expect("create show");

    ShowFixture {
        show_id: show.id,
        theatre_id: theatre.id,
        screen_id: screen.id,
        seat_ids: seats.iter().map(|s| s.id).collect(),
        seat_price,
    }
}

pub struct FoodFixture {
    pub category_id: Uuid,
    pub popcorn_id: Uuid,
    pub cola_id: Uuid,
}

/// A snacks category with two items: popcorn at 120.00 (10 min prep)
/// and cola at 80.00 (2 min prep).
pub async fn seed_food(app: &TestApp) -> FoodFixture {
    use sea_orm::{ActiveModelTrait, Set};

    let now = Utc::now();
    let category = food_category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Snacks {}", Uuid::new_v4().simple())),
        description: Set(None),
        is_active: Set(true),
        created_at: Set(now),
    }
    .insert(&*app.db)
    .await
    .expect("insert category");

    let mut ids = Vec::new();
    for (name, price, prep) in [("Popcorn", dec!(120.00), 10), ("Cola", dec!(80.00), 2)] {
        let item = food_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(Some(category.id)),
            name: Set(format!("{} {}", name, Uuid::new_v4().simple())),
            description: Set(None),
            price: Set(price),
            quantity_unit: Set("piece".to_string()),
            is_available: Set(true),
            is_vegetarian: Set(true),
            preparation_time_minutes: Set(prep),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&*app.db)
        .await
        .expect("insert item");
        ids.push(item.id);
    }

    FoodFixture {
        category_id: category.id,
        popcorn_id: ids[0],
        cola_id: ids[1],
    }
}
