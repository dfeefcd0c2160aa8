use axum::{
    extract::{Path, State},
    response::Json,
};
use common::{ApiResponse, Director, Genre, Movie};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::schemas::AppState;

/// Get all movies
#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    responses(
        (status = 200, description = "Movies retrieved successfully", body = ApiResponse<Vec<Movie>>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_movies(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Movie>>>> {
    let movies = state.catalog.list().await?;
    info!("Retrieved {} movies", movies.len());
    Ok(Json(ApiResponse::ok(movies, "Movies retrieved successfully")))
}

/// Get a movie by its title
#[utoipa::path(
    get,
    path = "/movies/{title}",
    tag = "movies",
    params(("title" = String, Path, description = "Exact movie title")),
    responses(
        (status = 200, description = "Movie retrieved successfully", body = ApiResponse<Movie>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Movie not found", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_movie_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<ApiResponse<Movie>>> {
    let movie = state.catalog.by_title(&title).await?;
    debug!("Found movie ID: {}", movie.id);
    Ok(Json(ApiResponse::ok(movie, "Movie retrieved successfully")))
}

/// Get a genre by name
#[utoipa::path(
    get,
    path = "/movies/genre/{name}",
    tag = "movies",
    params(("name" = String, Path, description = "Genre name")),
    responses(
        (status = 200, description = "Genre retrieved successfully", body = ApiResponse<Genre>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Genre not found", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Genre>>> {
    let genre = state.catalog.genre_by_name(&name).await?;
    Ok(Json(ApiResponse::ok(genre, "Genre retrieved successfully")))
}

/// Get a director by name
#[utoipa::path(
    get,
    path = "/movies/director/{name}",
    tag = "movies",
    params(("name" = String, Path, description = "Director name")),
    responses(
        (status = 200, description = "Director retrieved successfully", body = ApiResponse<Director>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Director not found", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_director(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Director>>> {
    let director = state.catalog.director_by_name(&name).await?;
    Ok(Json(ApiResponse::ok(director, "Director retrieved successfully")))
}
