use std::sync::Arc;
use std::time::Duration;

use common::{Director, Genre, Movie};
use moka::future::Cache;
use store::CatalogStore;
use tracing::{debug, instrument, trace};

use crate::error::{AppError, Result};

const LIST_KEY: &str = "movies";

/// Cached catalog query results
#[derive(Clone, Debug)]
enum CachedCatalog {
    All(Arc<Vec<Movie>>),
    Title(Movie),
}

/// Read-only queries over the movie catalog.
///
/// The HTTP surface never writes movies, so full listings and title lookups
/// are cached for a short while. Misses are not cached.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    cache: Cache<String, CachedCatalog>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(cache_ttl)
            .build();
        Self { store, cache }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Movie>> {
        if let Some(CachedCatalog::All(movies)) = self.cache.get(LIST_KEY).await {
            trace!("Movie list served from cache");
            return Ok(movies.as_ref().clone());
        }

        let movies = Arc::new(self.store.list().await?);
        self.cache
            .insert(LIST_KEY.to_string(), CachedCatalog::All(movies.clone()))
            .await;
        Ok(movies.as_ref().clone())
    }

    #[instrument(skip(self))]
    pub async fn by_title(&self, title: &str) -> Result<Movie> {
        let cache_key = format!("title:{}", title);
        if let Some(CachedCatalog::Title(movie)) = self.cache.get(&cache_key).await {
            trace!("Movie '{}' served from cache", title);
            return Ok(movie);
        }

        let movie = self
            .store
            .find_by_title(title)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found", title)))?;
        self.cache
            .insert(cache_key, CachedCatalog::Title(movie.clone()))
            .await;
        Ok(movie)
    }

    #[instrument(skip(self))]
    pub async fn genre_by_name(&self, name: &str) -> Result<Genre> {
        debug!("Looking up genre '{}'", name);
        self.store
            .find_by_genre_name(name)
            .await?
            .map(|movie| movie.genre)
            .ok_or_else(|| AppError::NotFound(format!("Genre '{}' not found", name)))
    }

    #[instrument(skip(self))]
    pub async fn director_by_name(&self, name: &str) -> Result<Director> {
        debug!("Looking up director '{}'", name);
        self.store
            .find_by_director_name(name)
            .await?
            .map(|movie| movie.director)
            .ok_or_else(|| AppError::NotFound(format!("Director '{}' not found", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{seed_movies, setup_test_db};
    use store::SeaOrmCatalogStore;

    async fn service() -> (CatalogService, Arc<dyn CatalogStore>) {
        let store: Arc<dyn CatalogStore> = Arc::new(SeaOrmCatalogStore::new(
            setup_test_db().await,
            Duration::from_secs(5),
        ));
        seed_movies(store.as_ref()).await;
        (CatalogService::new(store.clone(), Duration::from_secs(60)), store)
    }

    #[tokio::test]
    async fn test_genre_and_director_are_embedded_objects() {
        let (service, _) = service().await;

        let genre = service.genre_by_name("Crime").await.unwrap();
        assert_eq!(genre.name, "Crime");
        assert!(!genre.description.is_empty());

        let director = service.director_by_name("Christopher Nolan").await.unwrap();
        assert_eq!(director.name, "Christopher Nolan");
    }

    #[tokio::test]
    async fn test_unknown_names_are_not_found() {
        let (service, _) = service().await;

        assert!(matches!(service.by_title("Casablanca").await, Err(AppError::NotFound(_))));
        assert!(matches!(service.genre_by_name("Western").await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.director_by_name("Sergio Leone").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_cached() {
        let (service, store) = service().await;
        let before = service.list().await.unwrap();

        store
            .insert(store::NewMovie {
                title: "Late Arrival".to_string(),
                description: "Inserted after the first listing".to_string(),
                genre: Genre {
                    name: "Drama".to_string(),
                    description: "Drama".to_string(),
                },
                director: Director {
                    name: "Someone".to_string(),
                    bio: "Someone".to_string(),
                },
                image_path: None,
                featured: false,
            })
            .await
            .unwrap();

        assert_eq!(service.list().await.unwrap(), before);
        assert_eq!(store.list().await.unwrap().len(), before.len() + 1);
    }
}
