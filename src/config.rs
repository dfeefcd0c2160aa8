use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use store::DEFAULT_HASH_COST;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Runtime configuration.
///
/// Resolved from, in increasing precedence: the built-in defaults below, an
/// optional TOML file, `MYFLIX_*` environment variables (a `.env` file is
/// honoured), and finally command line flags.
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// HMAC secret for signing bearer tokens. Has no default.
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    /// Origins allowed to make cross-origin requests; `*` allows any.
    pub allowed_origins: Vec<String>,
    pub store_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub catalog_cache_ttl_secs: u64,
    pub bcrypt_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://myflix.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:8080".to_string(),
            jwt_secret: String::new(),
            token_ttl_secs: 7 * 24 * 60 * 60,
            allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://localhost:1234".to_string(),
            ],
            store_timeout_secs: 5,
            request_timeout_secs: 30,
            catalog_cache_ttl_secs: 300,
            bcrypt_cost: DEFAULT_HASH_COST,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("allowed_origins", &self.allowed_origins)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("catalog_cache_ttl_secs", &self.catalog_cache_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Settings {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn catalog_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_cache_ttl_secs)
    }

    /// The server refuses to start without a signing secret.
    pub fn ensure_jwt_secret(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("No token signing secret configured; set MYFLIX_JWT_SECRET or jwt_secret in the config file");
        }
        Ok(())
    }
}

/// Command line values that take precedence over every other source.
#[derive(Debug, Default)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub bind_address: Option<String>,
}

/// Load settings from defaults, an optional file, the environment and overrides.
pub fn load_settings(config_file: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    dotenvy::dotenv().ok();

    let mut builder = Config::builder().add_source(
        Config::try_from(&Settings::default()).context("Failed to encode default settings")?,
    );
    if let Some(path) = config_file {
        debug!("Reading configuration file: {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }
    builder = builder
        .add_source(
            Environment::with_prefix("MYFLIX")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("allowed_origins"),
        )
        .set_override_option("database_url", overrides.database_url)?
        .set_override_option("bind_address", overrides.bind_address)?;

    let settings: Settings = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}

/// Open the database pool with bounded connect and acquire times.
pub async fn connect_database(settings: &Settings) -> Result<DatabaseConnection> {
    info!("Connecting to database: {}", settings.database_url);
    let mut options = ConnectOptions::new(settings.database_url.clone());
    options
        .connect_timeout(settings.store_timeout())
        .acquire_timeout(settings.store_timeout())
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", settings.database_url))
}

/// Initialize application configuration and state
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    settings.ensure_jwt_secret()?;
    let db = connect_database(settings).await?;
    Ok(AppState::new(db, settings))
}
