#[cfg(test)]
pub mod test_utils {
    use crate::config::Settings;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
    use axum::Router;
    use axum_test::TestServer;
    use common::{ApiResponse, Director, Genre, LoginResponse};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use serde_json::json;
    use store::{CatalogStore, NewMovie};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Lowest cost bcrypt accepts
    pub const TEST_BCRYPT_COST: u32 = 4;
    pub const TEST_JWT_SECRET: &str = "test-signing-secret";
    pub const TEST_PASSWORD: &str = "p@ss1";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    pub fn test_settings() -> Settings {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            token_ttl_secs: 3600,
            bcrypt_cost: TEST_BCRYPT_COST,
            ..Settings::default()
        }
    }

    fn movie(title: &str, genre: &str, director: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            description: format!("About {}", title),
            genre: Genre {
                name: genre.to_string(),
                description: format!("{} films", genre),
            },
            director: Director {
                name: director.to_string(),
                bio: format!("{} is a film director", director),
            },
            image_path: None,
            featured: false,
        }
    }

    /// Inserts a small catalog and returns the ids in insertion order.
    pub async fn seed_movies(store: &dyn CatalogStore) -> Vec<i32> {
        let mut ids = Vec::new();
        for new_movie in [
            movie("The Godfather", "Crime", "Francis Ford Coppola"),
            movie("Pulp Fiction", "Crime", "Quentin Tarantino"),
            movie("Inception", "Science Fiction", "Christopher Nolan"),
            movie("The Dark Knight", "Action", "Christopher Nolan"),
        ] {
            ids.push(store.insert(new_movie).await.expect("Failed to seed movie").id);
        }
        ids
    }

    /// Create AppState for testing, backed by a seeded in-memory database
    pub async fn setup_test_app_state_with(settings: Settings) -> (AppState, Vec<i32>) {
        let db = setup_test_db().await;
        let catalog = store::SeaOrmCatalogStore::new(db.clone(), settings.store_timeout());
        let movie_ids = seed_movies(&catalog).await;
        (AppState::new(db, &settings), movie_ids)
    }

    pub async fn setup_test_app_state() -> (AppState, Vec<i32>) {
        setup_test_app_state_with(test_settings()).await
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing, together with the seeded movie ids
    pub async fn setup_test_app() -> (Router, Vec<i32>) {
        let _guard = init_test_tracing();

        let (state, movie_ids) = setup_test_app_state().await;
        (create_router(state), movie_ids)
    }

    pub async fn setup_test_server() -> (TestServer, Vec<i32>) {
        let (app, movie_ids) = setup_test_app().await;
        (TestServer::new(app).unwrap(), movie_ids)
    }

    pub fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    pub async fn register(server: &TestServer, username: &str) {
        server
            .post("/users")
            .json(&json!({
                "username": username,
                "password": TEST_PASSWORD,
                "email": format!("{}@example.com", username),
                "birth_date": "1990-05-17"
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    pub async fn login(server: &TestServer, username: &str) -> String {
        let response = server
            .post("/login")
            .json(&json!({ "username": username, "password": TEST_PASSWORD }))
            .await;
        response.assert_status_ok();
        response.json::<ApiResponse<LoginResponse>>().data.token
    }

    /// Registers a user and returns a token for them.
    pub async fn register_and_login(server: &TestServer, username: &str) -> String {
        register(server, username).await;
        login(server, username).await
    }

    pub async fn authorized_get(
        server: &TestServer,
        path: &str,
        token: &str,
    ) -> axum_test::TestResponse {
        server
            .get(path)
            .add_header(AUTHORIZATION, bearer(token))
            .await
    }
}
