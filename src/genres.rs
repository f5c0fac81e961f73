//! The metadata provider's movie genre list.
//!
//! Provider responses identify genres by integer id while the local `genres`
//! table is keyed by name, so this table bridges the two. It also seeds the
//! `genres` table on startup.

pub const MOVIE_GENRES: &[(i32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

pub fn name_for(provider_id: i32) -> Option<&'static str> {
    MOVIE_GENRES.iter().find(|(id, _)| *id == provider_id).map(|(_, name)| *name)
}
