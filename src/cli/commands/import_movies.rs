use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use store::{CatalogStore, NewMovie, SeaOrmCatalogStore};
use tracing::{debug, info, trace, warn};

use crate::config::{connect_database, Settings};

/// Outcome of a catalog import
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

pub async fn import_movies(json_path: &Path, settings: &Settings) -> Result<()> {
    trace!("Entering import_movies function");
    info!("Starting movie import");
    debug!("JSON path: {}", json_path.display());

    let file = File::open(json_path)
        .with_context(|| format!("Failed to open file: {}", json_path.display()))?;
    let movies: Vec<NewMovie> =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse JSON")?;
    info!("Loaded {} movies from {}", movies.len(), json_path.display());

    let db = connect_database(settings).await?;
    let store = SeaOrmCatalogStore::new(db, settings.store_timeout());

    let summary = seed_catalog(&store, movies).await?;
    info!(
        "Movie import finished: {} inserted, {} skipped",
        summary.inserted, summary.skipped
    );
    Ok(())
}

/// Inserts every movie whose title is not yet in the catalog.
pub async fn seed_catalog(store: &dyn CatalogStore, movies: Vec<NewMovie>) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for movie in movies {
        if store.find_by_title(&movie.title).await?.is_some() {
            warn!("Movie '{}' already exists, skipping", movie.title);
            summary.skipped += 1;
            continue;
        }
        let inserted = store
            .insert(movie)
            .await
            .context("Failed to insert movie")?;
        debug!("Imported '{}' as ID {}", inserted.title, inserted.id);
        summary.inserted += 1;
    }
    Ok(summary)
}
