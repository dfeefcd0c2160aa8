use std::time::Duration;

use async_trait::async_trait;
use common::{Director, Genre, Movie};
use model::entities::movie;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::deadline::bounded;
use crate::error::Result;

/// A catalog entry to insert. Matches the JSON layout accepted by the
/// catalog import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Read access to movie records, plus the insert used to seed them.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Movie>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>>;

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>>;

    /// First movie (by id) whose embedded genre has this name.
    async fn find_by_genre_name(&self, name: &str) -> Result<Option<Movie>>;

    /// First movie (by id) whose embedded director has this name.
    async fn find_by_director_name(&self, name: &str) -> Result<Option<Movie>>;

    async fn insert(&self, new_movie: NewMovie) -> Result<Movie>;
}

/// [`CatalogStore`] backed by a SeaORM connection.
pub struct SeaOrmCatalogStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl SeaOrmCatalogStore {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn first_where(
        &self,
        operation: &'static str,
        column: movie::Column,
        value: &str,
    ) -> Result<Option<Movie>> {
        bounded(self.timeout, operation, async {
            Ok(movie::Entity::find()
                .filter(column.eq(value))
                .order_by_asc(movie::Column::Id)
                .one(&self.db)
                .await?
                .map(into_movie))
        })
        .await
    }
}

fn into_movie(model: movie::Model) -> Movie {
    Movie {
        id: model.id,
        title: model.title,
        description: model.description,
        genre: Genre {
            name: model.genre_name,
            description: model.genre_description,
        },
        director: Director {
            name: model.director_name,
            bio: model.director_bio,
        },
        image_path: model.image_path,
        featured: model.featured,
    }
}

#[async_trait]
impl CatalogStore for SeaOrmCatalogStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Movie>> {
        bounded(self.timeout, "list_movies", async {
            let movies = movie::Entity::find()
                .order_by_asc(movie::Column::Id)
                .all(&self.db)
                .await?;
            debug!("Retrieved {} movies", movies.len());
            Ok(movies.into_iter().map(into_movie).collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>> {
        bounded(self.timeout, "find_movie_by_id", async {
            Ok(movie::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .map(into_movie))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>> {
        self.first_where("find_movie_by_title", movie::Column::Title, title)
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_genre_name(&self, name: &str) -> Result<Option<Movie>> {
        self.first_where("find_movie_by_genre", movie::Column::GenreName, name)
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_director_name(&self, name: &str) -> Result<Option<Movie>> {
        self.first_where("find_movie_by_director", movie::Column::DirectorName, name)
            .await
    }

    #[instrument(skip(self, new_movie), fields(title = %new_movie.title))]
    async fn insert(&self, new_movie: NewMovie) -> Result<Movie> {
        let active = movie::ActiveModel {
            title: Set(new_movie.title),
            description: Set(new_movie.description),
            genre_name: Set(new_movie.genre.name),
            genre_description: Set(new_movie.genre.description),
            director_name: Set(new_movie.director.name),
            director_bio: Set(new_movie.director.bio),
            image_path: Set(new_movie.image_path),
            featured: Set(new_movie.featured),
            ..Default::default()
        };

        let model = bounded(self.timeout, "insert_movie", async {
            Ok(active.insert(&self.db).await?)
        })
        .await?;
        info!("Movie inserted with ID: {}", model.id);
        Ok(into_movie(model))
    }
}
