use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Genre of a movie, embedded in every movie record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
    pub description: String,
}

/// Director of a movie, embedded in every movie record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Director {
    pub name: String,
    pub bio: String,
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    pub image_path: Option<String>,
    pub featured: bool,
}
