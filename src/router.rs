use std::any::Any;

use crate::auth::require_auth;
use crate::cors::{reject_disallowed_origin, AllowedOrigins};
use crate::error::AppError;
use crate::handlers::{
    auth::login,
    health::{health_check, welcome},
    movies::{get_director, get_genre, get_movie_by_title, get_movies},
    users::{
        add_favorite_movie, create_user, delete_user, get_user, get_users, remove_favorite_movie,
        update_user,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_prometheus::PrometheusMetricLayer;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let routes = app_routes(&state);
    with_middleware(routes, state)
}

/// Same as [`create_router`], plus Prometheus request metrics and a
/// `/metrics` endpoint behind the same middleware as every other route.
///
/// Installs a process wide recorder, so it can only be called once.
pub fn create_router_with_metrics(state: AppState) -> Router {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    let routes = app_routes(&state)
        .route("/metrics", get(move || async move { metric_handle.render() }))
        .layer(prometheus_layer);
    with_middleware(routes, state)
}

fn app_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/users", post(create_user));

    let protected = Router::new()
        // Movie catalog
        .route("/movies", get(get_movies))
        .route("/movies/:title", get(get_movie_by_title))
        .route("/movies/genre/:name", get(get_genre))
        .route("/movies/director/:name", get(get_director))
        // Accounts
        .route("/users", get(get_users))
        .route(
            "/users/:username",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/users/:username/movies/:movie_id",
            post(add_favorite_movie).delete(remove_favorite_movie),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let origins = AllowedOrigins::from_config(&state.settings.allowed_origins);
    let request_timeout = state.settings.request_timeout();

    routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(middleware::from_fn_with_state(
                    origins.clone(),
                    reject_disallowed_origin,
                ))
                .layer(origins.cors_layer())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Handler panicked: {}", detail);
    AppError::Internal("handler panicked".to_string()).into_response()
}
