//! Movie catalog endpoints. Reads are public; writes are admin-only.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, pagination, success_response};
use crate::services::movies::{
    CreateGenreRequest, CreateMovieRequest, MovieFilters, UpdateMovieRequest, WriteReviewRequest,
};
use crate::{AppState, ListQuery, PaginatedResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub genre_id: Option<Uuid>,
    pub language: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
}

/// List movies with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/movies",
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "coming_soon | now_showing | ended"),
        ("genre_id" = Option<Uuid>, Query, description = "Filter by genre"),
        ("language" = Option<String>, Query, description = "Filter by language"),
        ("search" = Option<String>, Query, description = "Title substring search"),
        ("featured" = Option<bool>, Query, description = "Featured only")
    ),
    responses(
        (status = 200, description = "Movies returned"),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination(&state, query.page, query.limit);
    let filters = MovieFilters {
        status: query.status,
        genre_id: query.genre_id,
        language: query.language,
        search: query.search,
        featured: query.featured,
    };
    let (movies, total) = state
        .services
        .movies
        .list_movies(filters, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        movies, total, page, limit,
    )))
}

/// Get one movie with its genres
#[utoipa::path(
    get,
    path = "/api/v1/movies/:id",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let movie = state.services.movies.get_movie(movie_id).await?;
    Ok(success_response(movie))
}

/// Create a movie (admin)
#[utoipa::path(
    post,
    path = "/api/v1/movies",
    responses(
        (status = 201, description = "Movie created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let movie = state.services.movies.create_movie(payload).await?;
    Ok(created_response(movie))
}

/// Update a movie (admin)
#[utoipa::path(
    put,
    path = "/api/v1/movies/:id",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie updated"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(movie_id): Path<Uuid>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let movie = state
        .services
        .movies
        .update_movie(movie_id, payload)
        .await?;
    Ok(success_response(movie))
}

/// List genres
#[utoipa::path(
    get,
    path = "/api/v1/genres",
    responses((status = 200, description = "Genres returned")),
    tag = "movies"
)]
pub async fn list_genres(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let genres = state.services.movies.list_genres().await?;
    Ok(success_response(genres))
}

/// Create a genre (admin)
#[utoipa::path(
    post,
    path = "/api/v1/genres",
    responses(
        (status = 201, description = "Genre created"),
        (status = 409, description = "Name already exists", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "movies"
)]
pub async fn create_genre(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateGenreRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let genre = state.services.movies.create_genre(payload).await?;
    Ok(created_response(genre))
}

/// Reviews for a movie
#[utoipa::path(
    get,
    path = "/api/v1/movies/:id/reviews",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Reviews returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination(&state, query.page, query.limit);
    let (reviews, total) = state
        .services
        .movies
        .list_reviews(movie_id, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        reviews, total, page, limit,
    )))
}

/// Write or replace the caller's review
#[utoipa::path(
    post,
    path = "/api/v1/movies/:id/reviews",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 201, description = "Review saved"),
        (status = 400, description = "Invalid rating", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "movies"
)]
pub async fn write_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(movie_id): Path<Uuid>,
    Json(payload): Json<WriteReviewRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let review = state
        .services
        .movies
        .write_review(movie_id, user.user_id, payload)
        .await?;
    Ok(created_response(review))
}

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies))
        .route("/", post(create_movie))
        .route("/:id", get(get_movie))
        .route("/:id", put(update_movie))
        .route("/:id/reviews", get(list_reviews))
        .route("/:id/reviews", post(write_review))
}

pub fn genre_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_genres))
        .route("/", post(create_genre))
}
