use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    error::AppResult,
    importer::{self, ImportOutcome},
    models::{AddForm, EditForm, FieldErrors, MovieIdQuery, SearchCandidate},
    templates, tmdb,
};

const RECENT_LIMIT: u64 = 20;
const TOP_MOVIES_LIMIT: usize = 10;
const TOP_ACTORS_LIMIT: u64 = 10;

pub async fn home(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.library.recent_movies(RECENT_LIMIT).await?;
    Ok(Html(templates::home_page(&movies)))
}

pub async fn top_movies(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.library.top_movies(TOP_MOVIES_LIMIT).await?;
    Ok(Html(templates::top_movies_page(&movies)))
}

pub async fn actors(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let actors = state.library.top_actors(TOP_ACTORS_LIMIT).await?;
    Ok(Html(templates::actors_page(&actors)))
}

pub async fn collections(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let collections = state.library.collections().await?;
    Ok(Html(templates::collections_page(&collections)))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> AppResult<Html<String>> {
    let movie = state.library.movie(movie_id).await?;
    let cast = state.library.cast(movie_id).await?;
    Ok(Html(templates::details_page(&movie, &cast)))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MovieIdQuery>,
) -> AppResult<Html<String>> {
    let movie = state.library.movie(q.movie_id).await?;
    let form = EditForm {
        rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
        review: movie.review.clone().unwrap_or_default(),
        watched_on: movie.watched_on.clone().unwrap_or_default(),
    };
    Ok(Html(templates::edit_page(&movie, &form, &FieldErrors::default())))
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MovieIdQuery>,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let movie = state.library.movie(q.movie_id).await?;

    match form.validate() {
        Ok(edit) => {
            state.library.apply_edit(movie.id, &edit).await?;
            Ok(Redirect::to("/").into_response())
        },
        Err(errors) => {
            let body = templates::edit_page(&movie, &form, &errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response())
        },
    }
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MovieIdQuery>,
) -> AppResult<Redirect> {
    state.library.delete_movie(q.movie_id).await?;
    Ok(Redirect::to("/"))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page(&AddForm::default(), &FieldErrors::default()))
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> AppResult<Response> {
    let title = match form.validate() {
        Ok(title) => title,
        Err(errors) => {
            let body = templates::add_page(&form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    let candidates: Vec<SearchCandidate> = state
        .tmdb
        .search_movies(&title)
        .await?
        .into_iter()
        .map(|r| SearchCandidate {
            tmdb_id: r.id,
            year: tmdb::release_year(r.release_date.as_deref()),
            poster_url: state.tmdb.image_url(r.poster_path.as_deref()),
            overview: r.overview.filter(|o| !o.trim().is_empty()),
            title: r.title,
        })
        .collect();

    Ok(Html(templates::select_page(&title, &candidates)).into_response())
}

pub async fn adding_movie(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MovieIdQuery>,
) -> AppResult<Redirect> {
    let redirect = match importer::import_movie(&state.library, &state.tmdb, q.movie_id).await? {
        ImportOutcome::Imported(movie_id) => Redirect::to(&format!("/edit?movie_id={movie_id}")),
        ImportOutcome::AlreadyPresent(_) => Redirect::to("/"),
    };
    Ok(redirect)
}
