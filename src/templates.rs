use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::movie,
    models::{
        ActorAppearances, AddForm, CastRow, CollectionSummary, EditForm, FieldErrors,
        SearchCandidate,
    },
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nav {
    Home,
    TopMovies,
    Actors,
    Collections,
    Add,
    Other,
}

pub fn home_page(movies: &[movie::Model]) -> String {
    page(
        "My Movies",
        Nav::Home,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Recently watched" }
            @if movies.is_empty() {
                (empty_state("No movies yet."))
            } @else {
                div class="mt-8 grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                    @for m in movies {
                        (movie_card(m, false))
                    }
                }
            }
        },
    )
}

pub fn top_movies_page(movies: &[movie::Model]) -> String {
    page(
        "Top Movies",
        Nav::TopMovies,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Top movies" }
            @if movies.is_empty() {
                (empty_state("No movies yet."))
            } @else {
                div class="mt-8 grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                    @for m in movies {
                        (movie_card(m, true))
                    }
                }
            }
        },
    )
}

pub fn actors_page(actors: &[ActorAppearances]) -> String {
    page(
        "Actors",
        Nav::Actors,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Most watched actors" }
            @if actors.is_empty() {
                (empty_state("No actors yet."))
            } @else {
                ol class="mt-8 space-y-3" {
                    @for actor in actors {
                        li class="flex items-center gap-4 bg-white shadow rounded-lg p-4" {
                            (thumbnail(actor.image_url.as_deref(), &actor.name))
                            div class="flex-1" {
                                p class="font-semibold text-gray-900" { (actor.name) }
                            }
                            span class="text-sm text-gray-600" {
                                (actor.appearances) " " (plural(actor.appearances, "movie", "movies"))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn collections_page(collections: &[CollectionSummary]) -> String {
    page(
        "Collections",
        Nav::Collections,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Collections" }
            @if collections.is_empty() {
                (empty_state("No collections yet."))
            } @else {
                div class="mt-8 grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                    @for c in collections {
                        div class="bg-white shadow rounded-lg overflow-hidden" {
                            @if let Some(url) = &c.image_url {
                                img class="w-full h-64 object-cover" src=(url) alt=(c.name);
                            }
                            div class="p-4" {
                                h2 class="font-semibold text-gray-900" { (c.name) }
                                p class="text-sm text-gray-600" {
                                    (c.movie_count) " " (plural(c.movie_count, "movie", "movies")) " watched"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn details_page(movie: &movie::Model, cast: &[CastRow]) -> String {
    page(
        &movie.title,
        Nav::Other,
        html! {
            div class="bg-white shadow rounded-lg p-8 md:flex gap-8" {
                @if let Some(url) = &movie.image_url {
                    img class="w-64 rounded-md shadow" src=(url) alt=(movie.title);
                }
                div class="flex-1" {
                    h1 class="text-3xl font-bold text-gray-900" {
                        (movie.title)
                        @if let Some(year) = movie.year {
                            span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                        }
                    }
                    @if let Some(genres) = &movie.genres {
                        p class="mt-2 text-sm text-gray-500" { (genres) }
                    }
                    (rating_line(movie))
                    p class="mt-4 text-gray-700" { (movie.description) }
                    @if let Some(review) = &movie.review {
                        blockquote class="mt-4 border-l-4 border-blue-500 pl-4 italic text-gray-700" { (review) }
                    }
                    (movie_actions(movie.id))
                }
            }

            h2 class="mt-10 text-2xl font-semibold text-gray-900" { "Cast" }
            @if cast.is_empty() {
                (empty_state("No cast recorded."))
            } @else {
                div class="mt-4 grid gap-4 sm:grid-cols-2 lg:grid-cols-3" {
                    @for row in cast {
                        @let name = row.actor_name.as_deref().unwrap_or("Unknown actor");
                        div class="flex items-center gap-4 bg-white shadow rounded-lg p-4" {
                            (thumbnail(row.actor_image.as_deref(), name))
                            div {
                                p class="font-semibold text-gray-900" { (name) }
                                @if let Some(character) = &row.character {
                                    p class="text-sm text-gray-600" { "as " (character) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_page(movie: &movie::Model, form: &EditForm, errors: &FieldErrors) -> String {
    page(
        "Edit Movie",
        Nav::Other,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { (movie.title) }
                p class="mt-1 text-gray-600" { "Edit rating, review and watch date." }

                form class="mt-8 space-y-6" method="post" action=(format!("/edit?movie_id={}", movie.id)) {
                    (text_field("rating", "Your Rating Out of 10 e.g. 7.5", &form.rating, "text", true, errors))
                    (text_field("review", "Your Review", &form.review, "text", false, errors))
                    (text_field("watched_on", "Date You Saw it", &form.watched_on, "date", false, errors))
                    (submit_button("Done"))
                }
            }
        },
    )
}

pub fn add_page(form: &AddForm, errors: &FieldErrors) -> String {
    page(
        "Add Movie",
        Nav::Add,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Add a movie" }
                form class="mt-8 space-y-6" method="post" action="/add" {
                    (text_field("title", "Movie Title", &form.title, "text", true, errors))
                    (submit_button("Add Movie"))
                }
            }
        },
    )
}

pub fn select_page(query: &str, candidates: &[SearchCandidate]) -> String {
    page(
        "Select Movie",
        Nav::Add,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Select a movie" }
            p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }
            @if candidates.is_empty() {
                (empty_state("No matches found."))
            } @else {
                ul class="mt-8 space-y-3" {
                    @for c in candidates {
                        li class="flex gap-4 bg-white shadow rounded-lg p-4" {
                            (thumbnail(c.poster_url.as_deref(), &c.title))
                            div class="flex-1" {
                                a class="text-lg font-semibold text-blue-600 hover:text-blue-800" href=(format!("/adding_movie?movie_id={}", c.tmdb_id)) {
                                    (c.title)
                                    @if let Some(year) = c.year {
                                        span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                                    }
                                }
                                @if let Some(overview) = &c.overview {
                                    p class="mt-1 text-sm text-gray-600 line-clamp-3" { (overview) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        Nav::Other,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" {
                    (status.canonical_reason().unwrap_or("Error"))
                }
                p class="mt-4 text-gray-700" { (message) }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
            }
        },
    )
}

fn page(title: &str, active: Nav, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" {
                (nav_bar(active))
                main class="max-w-6xl mx-auto px-6 py-10" { (body) }
            }
        }
    }
    .into_string()
}

fn nav_bar(active: Nav) -> Markup {
    let links = [
        (Nav::Home, "/", "Home"),
        (Nav::TopMovies, "/topmovies", "Top Movies"),
        (Nav::Actors, "/actorsall", "Actors"),
        (Nav::Collections, "/collections", "Collections"),
        (Nav::Add, "/add", "Add Movie"),
    ];

    html! {
        nav class="bg-gray-900" {
            div class="max-w-6xl mx-auto px-6 py-4 flex gap-6" {
                @for (nav, href, label) in links {
                    @let class = if nav == active { "text-white font-semibold" } else { "text-gray-400 hover:text-white" };
                    a class=(class) href=(href) { (label) }
                }
            }
        }
    }
}

fn movie_card(movie: &movie::Model, show_ranking: bool) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg overflow-hidden flex flex-col" {
            @if let Some(url) = &movie.image_url {
                a href=(format!("/details/{}", movie.id)) {
                    img class="w-full h-80 object-cover" src=(url) alt=(movie.title);
                }
            }
            div class="p-4 flex-1 flex flex-col" {
                h2 class="text-lg font-semibold text-gray-900" {
                    @if show_ranking {
                        @if let Some(ranking) = movie.ranking {
                            span class="mr-2 text-blue-600" { "#" (ranking) }
                        }
                    }
                    a class="hover:text-blue-700" href=(format!("/details/{}", movie.id)) { (movie.title) }
                    @if let Some(year) = movie.year {
                        span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                    }
                }
                @if let Some(genres) = &movie.genres {
                    p class="text-xs text-gray-500" { (genres) }
                }
                (rating_line(movie))
                @if let Some(review) = &movie.review {
                    p class="mt-2 text-sm italic text-gray-700" { (review) }
                }
                div class="mt-auto" { (movie_actions(movie.id)) }
            }
        }
    }
}

fn rating_line(movie: &movie::Model) -> Markup {
    html! {
        p class="mt-2 text-sm text-gray-700" {
            @match movie.rating {
                Some(rating) => { span class="font-semibold" { (format!("{rating:.1}")) } " / 10" },
                None => { span class="text-gray-400" { "Not rated" } },
            }
            @if let Some(date) = &movie.watched_on {
                span class="ml-3 text-gray-500" { "Watched " (date) }
            }
        }
    }
}

fn movie_actions(movie_id: i32) -> Markup {
    html! {
        div class="mt-4 flex gap-4 text-sm" {
            a class="text-blue-600 hover:text-blue-800" href=(format!("/edit?movie_id={movie_id}")) { "Update" }
            a class="text-red-600 hover:text-red-800" href=(format!("/delete?movie_id={movie_id}")) { "Delete" }
        }
    }
}

fn thumbnail(url: Option<&str>, alt: &str) -> Markup {
    html! {
        @if let Some(url) = url {
            img class="h-16 w-12 rounded object-cover" src=(url) alt=(alt);
        } @else {
            div class="h-16 w-12 rounded bg-gray-200" {}
        }
    }
}

fn text_field(
    name: &str,
    label: &str,
    value: &str,
    input_type: &str,
    required: bool,
    errors: &FieldErrors,
) -> Markup {
    let error = errors.get(name);
    let border = if error.is_some() { "border-red-500" } else { "border-gray-300" };

    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class=(format!("mt-2 w-full rounded-md border {border} px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500"))
                type=(input_type) name=(name) id=(name) value=(value) required[required];
            @if let Some(message) = error {
                p class="mt-2 text-sm text-red-600" { (message) }
            }
        }
    }
}

fn submit_button(label: &str) -> Markup {
    html! {
        button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { (label) }
    }
}

fn empty_state(message: &str) -> Markup {
    html! {
        div class="mt-8 bg-white shadow rounded-lg p-8" {
            p class="text-gray-600" { (message) }
        }
    }
}

fn plural(count: i64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}
