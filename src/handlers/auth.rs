use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use common::{ApiResponse, LoginRequest, LoginResponse};
use tracing::{debug, info, instrument, trace};

use crate::error::Result;
use crate::schemas::AppState;

/// Exchange a username and password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Malformed request body", body = crate::schemas::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    trace!("Entering login function");
    let Json(request) = payload?;
    debug!("Login attempt for username: {}", request.username);

    let issued = state
        .tokens
        .issue(&request.username, &request.password)
        .await?;

    info!("User '{}' logged in", issued.user.username);
    Ok(Json(ApiResponse::ok(
        LoginResponse {
            token: issued.token,
            expires_in: issued.expires_in,
            user: issued.user.into(),
        },
        "Login successful",
    )))
}
