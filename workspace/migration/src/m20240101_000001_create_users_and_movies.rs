use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::Email))
                    .col(date_null(Users::BirthDate))
                    .to_owned(),
            )
            .await?;

        // Create movies table
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(text(Movies::Description))
                    .col(string(Movies::GenreName))
                    .col(text(Movies::GenreDescription))
                    .col(string(Movies::DirectorName))
                    .col(text(Movies::DirectorBio))
                    .col(string_null(Movies::ImagePath))
                    .col(boolean(Movies::Featured).default(false))
                    .to_owned(),
            )
            .await?;

        // Lookups go by title, genre name and director name
        for (name, column) in [
            ("idx_movies_title", Movies::Title),
            ("idx_movies_genre_name", Movies::GenreName),
            ("idx_movies_director_name", Movies::DirectorName),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Movies::Table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    BirthDate,
}

#[derive(DeriveIden)]
pub(crate) enum Movies {
    Table,
    Id,
    Title,
    Description,
    GenreName,
    GenreDescription,
    DirectorName,
    DirectorBio,
    ImagePath,
    Featured,
}
