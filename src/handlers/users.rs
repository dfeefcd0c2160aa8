use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
    Extension,
};
use common::{ApiResponse, RegisterRequest, UpdateProfileRequest, UserDto};
use tracing::{debug, info, instrument, trace};

use crate::auth::AuthenticatedUser;
use crate::error::Result;
use crate::schemas::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserDto>),
        (status = 409, description = "Username already exists", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>)> {
    trace!("Entering create_user function");
    let Json(request) = payload?;
    debug!("Creating user with username: {}", request.username);

    let user = state.accounts.register(request).await?;
    info!(
        "User created successfully with ID: {}, username: {}",
        user.id, user.username
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(user.into(), "User created successfully")),
    ))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserDto>>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<UserDto>>>> {
    let users: Vec<UserDto> = state
        .accounts
        .get_all()
        .await?
        .into_iter()
        .map(UserDto::from)
        .collect();
    info!("Retrieved {} users", users.len());
    Ok(Json(ApiResponse::ok(users, "Users retrieved successfully")))
}

/// Get a user by username
#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserDto>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let user = state.accounts.get_by_username(&username).await?;
    Ok(Json(ApiResponse::ok(user.into(), "User retrieved successfully")))
}

/// Update a user's profile. Only the fields present are changed.
#[utoipa::path(
    put,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserDto>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Invalid request", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
    payload: std::result::Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let Json(request) = payload?;
    debug!("User '{}' updating profile of '{}'", caller.username, username);

    let user = state.accounts.update_profile(&username, request).await?;
    info!("User '{}' updated", user.username);
    Ok(Json(ApiResponse::ok(user.into(), "User updated successfully")))
}

/// Delete a user and their favorites list
#[utoipa::path(
    delete,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<String>>> {
    debug!("User '{}' deleting '{}'", caller.username, username);
    state.accounts.deregister(&username).await?;

    let message = format!("{} was deleted.", username);
    Ok(Json(ApiResponse::ok(username, message)))
}

/// Add a movie to a user's favorites
#[utoipa::path(
    post,
    path = "/users/{username}/movies/{movie_id}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Username"),
        ("movie_id" = i32, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Movie added to favorites", body = ApiResponse<UserDto>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "User or movie not found", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Movie ID is not a number", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, path))]
pub async fn add_favorite_movie(
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, i32)>, PathRejection>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let Path((username, movie_id)) = path?;
    debug!("Favorite change for '{}' on movie {}", username, movie_id);
    let user = state.accounts.add_favorite(&username, movie_id).await?;
    info!("Movie {} is a favorite of '{}'", movie_id, username);
    Ok(Json(ApiResponse::ok(user.into(), "Movie added to favorites")))
}

/// Remove a movie from a user's favorites
#[utoipa::path(
    delete,
    path = "/users/{username}/movies/{movie_id}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Username"),
        ("movie_id" = i32, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Movie removed from favorites", body = ApiResponse<UserDto>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Movie ID is not a number", body = crate::schemas::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, path))]
pub async fn remove_favorite_movie(
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, i32)>, PathRejection>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let Path((username, movie_id)) = path?;
    debug!("Favorite change for '{}' on movie {}", username, movie_id);
    let user = state.accounts.remove_favorite(&username, movie_id).await?;
    info!("Movie {} removed from favorites of '{}'", movie_id, username);
    Ok(Json(ApiResponse::ok(user.into(), "Movie removed from favorites")))
}
