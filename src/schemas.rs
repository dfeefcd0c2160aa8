use std::sync::Arc;

use common::{
    ApiResponse, Director, FieldError, Genre, LoginRequest, LoginResponse, Movie, RegisterRequest,
    UpdateProfileRequest, UserDto,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use store::{
    BcryptHasher, CatalogStore, CredentialStore, PasswordHasher, SeaOrmCatalogStore,
    SeaOrmCredentialStore,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::auth::{AccessGuard, TokenIssuer};
use crate::config::Settings;
use crate::services::{AccountService, CatalogService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    pub catalog: CatalogService,
    pub accounts: AccountService,
    pub tokens: TokenIssuer,
    pub guard: AccessGuard,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wires the SeaORM stores and the services on top of one connection pool.
    pub fn new(db: DatabaseConnection, settings: &Settings) -> Self {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(settings.bcrypt_cost));
        let credentials: Arc<dyn CredentialStore> = Arc::new(SeaOrmCredentialStore::new(
            db.clone(),
            hasher,
            settings.store_timeout(),
        ));
        let catalog_store: Arc<dyn CatalogStore> = Arc::new(SeaOrmCatalogStore::new(
            db.clone(),
            settings.store_timeout(),
        ));

        let tokens = TokenIssuer::new(
            credentials.clone(),
            &settings.jwt_secret,
            settings.token_ttl(),
        );
        let guard = AccessGuard::new(tokens.clone(), credentials.clone());

        Self {
            db,
            catalog: CatalogService::new(catalog_store.clone(), settings.catalog_cache_ttl()),
            accounts: AccountService::new(credentials, catalog_store),
            tokens,
            guard,
            settings: Arc::new(settings.clone()),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Rejected fields, present on validation failures only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::health::welcome,
        crate::handlers::auth::login,
        crate::handlers::movies::get_movies,
        crate::handlers::movies::get_movie_by_title,
        crate::handlers::movies::get_genre,
        crate::handlers::movies::get_director,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::users::add_favorite_movie,
        crate::handlers::users::remove_favorite_movie,
    ),
    components(
        schemas(
            ApiResponse<Vec<Movie>>,
            ErrorResponse,
            HealthResponse,
            FieldError,
            Movie,
            Genre,
            Director,
            UserDto,
            RegisterRequest,
            UpdateProfileRequest,
            LoginRequest,
            LoginResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Token issuing"),
        (name = "movies", description = "Movie catalog endpoints"),
        (name = "users", description = "User account and favorites endpoints"),
    ),
    info(
        title = "myFlix API",
        description = "Movie catalog API with user accounts and favorites lists",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
