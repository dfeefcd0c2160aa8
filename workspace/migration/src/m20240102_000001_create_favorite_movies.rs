use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_users_and_movies::{Movies, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoriteMovies::Table)
                    .if_not_exists()
                    .col(pk_auto(FavoriteMovies::Id))
                    .col(integer(FavoriteMovies::UserId))
                    .col(integer(FavoriteMovies::MovieId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_movies_user")
                            .from(FavoriteMovies::Table, FavoriteMovies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_movies_movie")
                            .from(FavoriteMovies::Table, FavoriteMovies::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A movie appears at most once in a user's favorites
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_movies_user_movie")
                    .table(FavoriteMovies::Table)
                    .col(FavoriteMovies::UserId)
                    .col(FavoriteMovies::MovieId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteMovies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FavoriteMovies {
    Table,
    Id,
    UserId,
    MovieId,
}
