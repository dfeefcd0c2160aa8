use sea_orm::entity::prelude::*;

/// A catalog entry. Genre and director are embedded per movie rather than
/// being entities of their own.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub genre_name: String,
    pub genre_description: String,
    pub director_name: String,
    pub director_bio: String,
    pub image_path: Option<String>,
    #[sea_orm(default_value = "false")]
    pub featured: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorite_movie::Entity")]
    FavoriteMovie,
}

impl Related<super::favorite_movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteMovie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
