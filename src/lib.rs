pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod genres;
pub mod importer;
pub mod library;
pub mod models;
pub mod routes;
pub mod templates;
pub mod tmdb;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{config::Config, library::Library, tmdb::TmdbClient};

pub struct AppState {
    pub library: Library,
    pub tmdb: Arc<TmdbClient>,
}

impl AppState {
    /// Connects to the store, applies migrations and seeds genres.
    pub async fn from_config(config: Config) -> anyhow::Result<Arc<Self>> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cinelog/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let db = db::connect_and_migrate(&config.database_url).await?;
        let tmdb = TmdbClient::new(http, &config);

        Ok(Arc::new(Self {
            library: Library::new(db),
            tmdb: Arc::new(tmdb),
        }))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/topmovies", get(routes::top_movies))
        .route("/actorsall", get(routes::actors))
        .route("/collections", get(routes::collections))
        .route("/details/{movie_id}", get(routes::details))
        .route("/edit", get(routes::edit_form).post(routes::edit_submit))
        .route("/delete", get(routes::delete))
        .route("/add", get(routes::add_form).post(routes::add_search))
        .route("/adding_movie", get(routes::adding_movie))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
