pub mod actor;
pub mod casting;
pub mod collection;
pub mod genre;
pub mod movie;
pub mod movie_genre;
