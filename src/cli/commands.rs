pub mod import_movies;
pub mod initdb;
pub mod serve;

pub use import_movies::import_movies;
pub use initdb::init_database;
pub use serve::serve;
