use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use tracing::{debug, error, info, trace};

use crate::config::{connect_database, Settings};

pub async fn init_database(settings: &Settings) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    let db = connect_database(settings).await?;
    info!("Successfully connected to database");

    info!("Running database migrations");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
            debug!("All pending migrations have been applied");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    info!("Database initialization completed successfully!");
    Ok(())
}
