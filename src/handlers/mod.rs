pub mod bookings;
pub mod common;
pub mod food;
pub mod movies;
pub mod payments;
pub mod shows;
pub mod theatres;
pub mod users;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<services::users::UserService>,
    pub movies: Arc<services::movies::MovieService>,
    pub theatres: Arc<services::theatres::TheatreService>,
    pub shows: Arc<services::shows::ShowService>,
    pub bookings: Arc<services::bookings::BookingService>,
    pub payments: Arc<services::payments::PaymentService>,
    pub food: Arc<services::food::FoodService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, config: Arc<AppConfig>) -> Self {
        let gateway: Arc<dyn services::payments::PaymentGateway> =
            Arc::new(services::payments::SimulatedGateway);
        Self {
            users: Arc::new(services::users::UserService::new(
                db.clone(),
                event_sender.clone(),
                config.clone(),
            )),
            movies: Arc::new(services::movies::MovieService::new(db.clone())),
            theatres: Arc::new(services::theatres::TheatreService::new(db.clone())),
            shows: Arc::new(services::shows::ShowService::new(db.clone())),
            bookings: Arc::new(services::bookings::BookingService::new(
                db.clone(),
                event_sender.clone(),
            )),
            payments: Arc::new(services::payments::PaymentService::new(
                db.clone(),
                event_sender.clone(),
                config.clone(),
                gateway,
            )),
            food: Arc::new(services::food::FoodService::new(db, event_sender, config)),
        }
    }
}
