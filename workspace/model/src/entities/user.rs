use sea_orm::entity::prelude::*;

/// A registered account of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// bcrypt hash, salt included.
    pub password_hash: String,
    pub email: String,
    pub birth_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Favorites rows, removed together with the user.
    #[sea_orm(has_many = "super::favorite_movie::Entity")]
    FavoriteMovie,
}

impl Related<super::favorite_movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteMovie.def()
    }
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::favorite_movie::Relation::Movie.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::favorite_movie::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
