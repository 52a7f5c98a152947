//! Movie catalog: movies, genres, and user reviews.
//!
//! A user holds at most one review per movie; writing again replaces
//! it. The movie's stored rating is the rounded average of its
//! reviews and is recomputed on every review write.

use crate::{
    db::DbPool,
    entities::{
        genre::{self, Entity as GenreEntity},
        movie::{self, Entity as MovieEntity, MovieStatus},
        movie_genre::{self, Entity as MovieGenreEntity},
        movie_review::{self, Entity as MovieReviewEntity},
    },
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub release_date: NaiveDate,
    #[validate(range(min = 1, max = 600, message = "Duration must be 1-600 minutes"))]
    pub duration_minutes: i32,
    #[validate(length(min = 1, max = 50))]
    pub language: String,
    pub certification: Option<String>,
    pub director: Option<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub genre_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateMovieRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<i32>,
    pub language: Option<String>,
    pub certification: Option<String>,
    pub director: Option<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub genre_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateGenreRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct WriteReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub review_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MovieFilters {
    pub status: Option<String>,
    pub genre_id: Option<Uuid>,
    pub language: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub release_date: NaiveDate,
    pub duration_minutes: i32,
    pub language: String,
    pub certification: Option<String>,
    pub director: Option<String>,
    pub rating: Decimal,
    pub status: String,
    pub is_featured: bool,
    pub genres: Vec<genre::Model>,
}

pub fn parse_movie_status(s: &str) -> Result<MovieStatus, ServiceError> {
    match s {
        "coming_soon" => Ok(MovieStatus::ComingSoon),
        "now_showing" => Ok(MovieStatus::NowShowing),
        "ended" => Ok(MovieStatus::Ended),
        other => Err(ServiceError::InvalidInput(format!(
            "Unknown movie status '{}'",
            other
        ))),
    }
}

#[derive(Clone)]
pub struct MovieService {
    db: Arc<DbPool>,
}

impl MovieService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_movie(
        &self,
        request: CreateMovieRequest,
    ) -> Result<MovieResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db;
        let status = match request.status.as_deref() {
            Some(s) => parse_movie_status(s)?,
            None => MovieStatus::ComingSoon,
        };
        self.ensure_genres_exist(&request.genre_ids).await?;

        let now = Utc::now();
        let movie_id = Uuid::new_v4();
        let txn = db.begin().await?;

        let model = movie::ActiveModel {
            id: Set(movie_id),
            title: Set(request.title),
            description: Set(request.description),
            release_date: Set(request.release_date),
            duration_minutes: Set(request.duration_minutes),
            language: Set(request.language),
            certification: Set(request.certification),
            director: Set(request.director),
            rating: Set(Decimal::ZERO),
            status: Set(status),
            is_featured: Set(request.is_featured.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await?;

        for genre_id in &request.genre_ids {
            movie_genre::ActiveModel {
                id: Set(Uuid::new_v4()),
                movie_id: Set(movie_id),
                genre_id: Set(*genre_id),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        info!(movie_id = %movie_id, "Movie created");
        self.movie_response(model).await
    }

    #[instrument(skip(self, request), fields(movie_id = %movie_id))]
    pub async fn update_movie(
        &self,
        movie_id: Uuid,
        request: UpdateMovieRequest,
    ) -> Result<MovieResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db;
        let model = self.find_movie(movie_id).await?;

        let status = match request.status.as_deref() {
            Some(s) => Some(parse_movie_status(s)?),
            None => None,
        };

        let txn = db.begin().await?;

        let mut active = model.into_active_model();
        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(release_date) = request.release_date {
            active.release_date = Set(release_date);
        }
        if let Some(duration) = request.duration_minutes {
            active.duration_minutes = Set(duration);
        }
        if let Some(language) = request.language {
            active.language = Set(language);
        }
        if let Some(certification) = request.certification {
            active.certification = Set(Some(certification));
        }
        if let Some(director) = request.director {
            active.director = Set(Some(director));
        }
        if let Some(status) = status {
            active.status = Set(status);
        }
        if let Some(featured) = request.is_featured {
            active.is_featured = Set(featured);
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        // Genre list, when present, replaces the existing set
        if let Some(genre_ids) = request.genre_ids {
            self.ensure_genres_exist(&genre_ids).await?;
            MovieGenreEntity::delete_many()
                .filter(movie_genre::Column::MovieId.eq(movie_id))
                .exec(&txn)
                .await?;
            let now = Utc::now();
            for genre_id in genre_ids {
                movie_genre::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    movie_id: Set(movie_id),
                    genre_id: Set(genre_id),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        self.movie_response(updated).await
    }

    pub async fn get_movie(&self, movie_id: Uuid) -> Result<MovieResponse, ServiceError> {
        let model = self.find_movie(movie_id).await?;
        self.movie_response(model).await
    }

    pub async fn list_movies(
        &self,
        filters: MovieFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<MovieResponse>, u64), ServiceError> {
        let db = &*self.db;
        let mut query = MovieEntity::find().order_by_desc(movie::Column::ReleaseDate);

        if let Some(status) = filters.status.as_deref() {
            query = query.filter(movie::Column::Status.eq(parse_movie_status(status)?));
        }
        if let Some(language) = &filters.language {
            query = query.filter(movie::Column::Language.eq(language.clone()));
        }
        if let Some(search) = &filters.search {
            query = query.filter(movie::Column::Title.contains(search));
        }
        if let Some(featured) = filters.featured {
            query = query.filter(movie::Column::IsFeatured.eq(featured));
        }
        if let Some(genre_id) = filters.genre_id {
            let movie_ids: Vec<Uuid> = MovieGenreEntity::find()
                .filter(movie_genre::Column::GenreId.eq(genre_id))
                .all(db)
                .await?
                .into_iter()
                .map(|mg| mg.movie_id)
                .collect();
            query = query.filter(movie::Column::Id.is_in(movie_ids));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        let mut movies = Vec::with_capacity(models.len());
        for model in models {
            movies.push(self.movie_response(model).await?);
        }
        Ok((movies, total))
    }

    pub async fn create_genre(
        &self,
        request: CreateGenreRequest,
    ) -> Result<genre::Model, ServiceError> {
        request.validate()?;
        let result = genre::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            description: Set(request.description),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await;

        result.map_err(|e| {
            if matches!(
                e.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            ) {
                ServiceError::Conflict("A genre with this name already exists".to_string())
            } else {
                ServiceError::DatabaseError(e)
            }
        })
    }

    pub async fn list_genres(&self) -> Result<Vec<genre::Model>, ServiceError> {
        Ok(GenreEntity::find()
            .order_by_asc(genre::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Creates or replaces the caller's review, then refreshes the
    /// movie's aggregate rating.
    #[instrument(skip(self, request), fields(movie_id = %movie_id, user_id = %user_id))]
    pub async fn write_review(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
        request: WriteReviewRequest,
    ) -> Result<movie_review::Model, ServiceError> {
        request.validate()?;
        let db = &*self.db;
        let movie = self.find_movie(movie_id).await?;

        let existing = MovieReviewEntity::find()
            .filter(movie_review::Column::MovieId.eq(movie_id))
            .filter(movie_review::Column::UserId.eq(user_id))
            .one(db)
            .await?;

        let now = Utc::now();
        let txn = db.begin().await?;

        let review = match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.rating = Set(request.rating);
                active.review_text = Set(request.review_text);
                active.updated_at = Set(Some(now));
                active.update(&txn).await?
            }
            None => {
                movie_review::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    movie_id: Set(movie_id),
                    user_id: Set(user_id),
                    rating: Set(request.rating),
                    review_text: Set(request.review_text),
                    created_at: Set(now),
                    updated_at: Set(Some(now)),
                }
                .insert(&txn)
                .await?
            }
        };

        let ratings: Vec<i32> = MovieReviewEntity::find()
            .filter(movie_review::Column::MovieId.eq(movie_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect();
        let average = if ratings.is_empty() {
            Decimal::ZERO
        } else {
            (Decimal::from(ratings.iter().sum::<i32>()) / Decimal::from(ratings.len() as i64))
                .round_dp(2)
        };

        let mut movie_active = movie.into_active_model();
        movie_active.rating = Set(average);
        movie_active.updated_at = Set(Some(now));
        movie_active.update(&txn).await?;

        txn.commit().await?;
        Ok(review)
    }

    pub async fn list_reviews(
        &self,
        movie_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<movie_review::Model>, u64), ServiceError> {
        self.find_movie(movie_id).await?;
        let paginator = MovieReviewEntity::find()
            .filter(movie_review::Column::MovieId.eq(movie_id))
            .order_by_desc(movie_review::Column::CreatedAt)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let reviews = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((reviews, total))
    }

    async fn find_movie(&self, movie_id: Uuid) -> Result<movie::Model, ServiceError> {
        MovieEntity::find_by_id(movie_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Movie with ID {} not found", movie_id)))
    }

    async fn ensure_genres_exist(&self, genre_ids: &[Uuid]) -> Result<(), ServiceError> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        let found = GenreEntity::find()
            .filter(genre::Column::Id.is_in(genre_ids.to_vec()))
            .count(&*self.db)
            .await?;
        if found as usize != genre_ids.len() {
            return Err(ServiceError::InvalidInput(
                "One or more genre IDs do not exist".to_string(),
            ));
        }
        Ok(())
    }

    async fn movie_response(&self, model: movie::Model) -> Result<MovieResponse, ServiceError> {
        let db = &*self.db;
        let genre_ids: Vec<Uuid> = MovieGenreEntity::find()
            .filter(movie_genre::Column::MovieId.eq(model.id))
            .all(db)
            .await?
            .into_iter()
            .map(|mg| mg.genre_id)
            .collect();
        let genres = if genre_ids.is_empty() {
            Vec::new()
        } else {
            GenreEntity::find()
                .filter(genre::Column::Id.is_in(genre_ids))
                .order_by_asc(genre::Column::Name)
                .all(db)
                .await?
        };

        Ok(MovieResponse {
            id: model.id,
            title: model.title,
            description: model.description,
            release_date: model.release_date,
            duration_minutes: model.duration_minutes,
            language: model.language,
            certification: model.certification,
            director: model.director,
            rating: model.rating,
            status: model.status.to_string(),
            is_featured: model.is_featured,
            genres,
        })
    }
}
