use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CinePass API",
        version = "1.0.0",
        description = r#"
# CinePass Ticketing API

Backend for a multiplex chain: movie and theatre catalog, show
scheduling, seat booking, payments, and concession ordering.

## Authentication

Most endpoints require a JWT obtained from `/api/v1/auth/login`:

```
Authorization: Bearer <your-jwt-token>
```

The payment gateway callback is the only unauthenticated write; it is
verified by its HMAC signature instead.

## Pagination

List endpoints accept `page` (1-based) and `limit` query parameters.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Registration, login, and profile"),
        (name = "movies", description = "Movie catalog, genres, and reviews"),
        (name = "theatres", description = "Theatres, screens, and seat layouts"),
        (name = "shows", description = "Show schedule and seat maps"),
        (name = "bookings", description = "Seat booking and cancellation"),
        (name = "payments", description = "Payment lifecycle and gateway callback"),
        (name = "food", description = "Concession catalog, cart, and orders")
    ),
    paths(
        // Auth
        crate::handlers::users::register,
        crate::handlers::users::login,
        crate::handlers::users::me,
        crate::handlers::users::update_me,

        // Movies
        crate::handlers::movies::list_movies,
        crate::handlers::movies::get_movie,
        crate::handlers::movies::create_movie,
        crate::handlers::movies::update_movie,
        crate::handlers::movies::list_genres,
        crate::handlers::movies::create_genre,
        crate::handlers::movies::list_reviews,
        crate::handlers::movies::write_review,

        // Theatres
        crate::handlers::theatres::list_theatres,
        crate::handlers::theatres::get_theatre,
        crate::handlers::theatres::create_theatre,
        crate::handlers::theatres::update_theatre,
        crate::handlers::theatres::list_screens,
        crate::handlers::theatres::create_screen,
        crate::handlers::theatres::list_seats,
        crate::handlers::theatres::create_seat,

        // Shows
        crate::handlers::shows::list_shows,
        crate::handlers::shows::get_show,
        crate::handlers::shows::seat_map,
        crate::handlers::shows::create_show,
        crate::handlers::shows::update_show,

        // Bookings
        crate::handlers::bookings::create_booking,
        crate::handlers::bookings::list_bookings,
        crate::handlers::bookings::get_booking,
        crate::handlers::bookings::cancel_booking,
        crate::handlers::bookings::get_cancellation,

        // Payments
        crate::handlers::payments::create_payment,
        crate::handlers::payments::get_payment,
        crate::handlers::payments::start_checkout,
        crate::handlers::payments::gateway_callback,
        crate::handlers::payments::simulate_success,
        crate::handlers::payments::retry_payment,
        crate::handlers::payments::cancel_payment,

        // Food
        crate::handlers::food::list_categories,
        crate::handlers::food::list_items,
        crate::handlers::food::get_cart,
        crate::handlers::food::add_cart_item,
        crate::handlers::food::update_cart_item,
        crate::handlers::food::clear_cart,
        crate::handlers::food::checkout_cart,
        crate::handlers::food::list_orders,
        crate::handlers::food::get_order,
        crate::handlers::food::update_order_status,
        crate::handlers::food::cancel_order
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,
            crate::ListQuery,
            crate::errors::ErrorResponse,
            crate::services::users::RegisterRequest,
            crate::services::users::LoginRequest,
            crate::services::users::UpdateProfileRequest,
            crate::services::movies::CreateMovieRequest,
            crate::services::movies::UpdateMovieRequest,
            crate::services::movies::CreateGenreRequest,
            crate::services::movies::WriteReviewRequest,
            crate::services::theatres::CreateTheatreRequest,
            crate::services::theatres::UpdateTheatreRequest,
            crate::services::theatres::CreateScreenRequest,
            crate::services::theatres::CreateSeatRequest,
            crate::services::shows::CreateShowRequest,
            crate::services::shows::UpdateShowRequest,
            crate::services::bookings::CreateBookingRequest,
            crate::services::bookings::CancelBookingRequest,
            crate::services::payments::CreateBookingPaymentRequest,
            crate::services::payments::GatewayCallback,
            crate::services::food::AddCartItemRequest,
            crate::services::food::UpdateCartItemRequest,
            crate::services::food::CheckoutCartRequest,
            crate::handlers::food::UpdateOrderStatusRequest
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
