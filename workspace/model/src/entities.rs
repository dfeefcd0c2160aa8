//! SeaORM entities for the movie catalog and its user accounts.

pub mod favorite_movie;
pub mod movie;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::favorite_movie::Entity as FavoriteMovie;
    pub use super::movie::Entity as Movie;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn new_movie(title: &str, genre: &str, director: &str) -> movie::ActiveModel {
        movie::ActiveModel {
            title: Set(title.to_string()),
            description: Set(format!("{} description", title)),
            genre_name: Set(genre.to_string()),
            genre_description: Set(format!("{} genre", genre)),
            director_name: Set(director.to_string()),
            director_bio: Set(format!("{} bio", director)),
            image_path: Set(None),
            featured: Set(false),
            ..Default::default()
        }
    }

    fn new_user(username: &str) -> user::ActiveModel {
        user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set("not-a-real-hash".to_string()),
            email: Set(format!("{}@example.com", username)),
            birth_date: Set(None),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user = new_user("alice1").insert(&db).await?;
        let godfather = new_movie("The Godfather", "Drama", "Francis Ford Coppola")
            .insert(&db)
            .await?;
        let pulp = new_movie("Pulp Fiction", "Crime", "Quentin Tarantino")
            .insert(&db)
            .await?;

        for movie_id in [pulp.id, godfather.id] {
            favorite_movie::ActiveModel {
                user_id: Set(user.id),
                movie_id: Set(movie_id),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        let favorites = FavoriteMovie::find()
            .filter(favorite_movie::Column::UserId.eq(user.id))
            .order_by_asc(favorite_movie::Column::Id)
            .all(&db)
            .await?;
        let ids: Vec<i32> = favorites.iter().map(|f| f.movie_id).collect();
        assert_eq!(ids, vec![pulp.id, godfather.id]);

        let movies = user.find_related(Movie).all(&db).await?;
        assert_eq!(movies.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_username_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        new_user("alice1").insert(&db).await?;
        let duplicate = new_user("alice1").insert(&db).await;

        assert!(duplicate.is_err());
        assert_eq!(User::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_favorite_pair_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user = new_user("bobby2").insert(&db).await?;
        let movie = new_movie("12 Angry Men", "Drama", "Sidney Lumet")
            .insert(&db)
            .await?;
        let favorite = || favorite_movie::ActiveModel {
            user_id: Set(user.id),
            movie_id: Set(movie.id),
            ..Default::default()
        };

        favorite().insert(&db).await?;
        assert!(favorite().insert(&db).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_removes_favorites() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user = new_user("carol3").insert(&db).await?;
        let movie = new_movie("Schindler's List", "War", "Steven Spielberg")
            .insert(&db)
            .await?;
        favorite_movie::ActiveModel {
            user_id: Set(user.id),
            movie_id: Set(movie.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        User::delete_by_id(user.id).exec(&db).await?;

        assert!(FavoriteMovie::find().all(&db).await?.is_empty());
        assert!(Movie::find_by_id(movie.id).one(&db).await?.is_some());
        Ok(())
    }
}
