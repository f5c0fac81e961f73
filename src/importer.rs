//! Materializes a provider movie, with its genre links, collection and
//! leading cast, as local rows.
//!
//! Both provider calls complete before the database is touched, and all
//! writes happen in one transaction: an import either lands completely or
//! not at all.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait, sea_query::OnConflict,
};
use tracing::{debug, info, warn};

use crate::{
    entities::{actor, casting, collection, genre, movie, movie_genre},
    error::{AppError, AppResult},
    genres,
    library::Library,
    tmdb::{self, Credits, MovieDetails, TmdbClient},
};

/// Number of leading cast entries stored per movie.
pub const CAST_SIZE: usize = 6;
pub const DESCRIPTION_MAX_CHARS: usize = 400;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImportOutcome {
    Imported(i32),
    /// A movie with the same title already exists; nothing was written.
    AlreadyPresent(i32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<i32>,
    pub description: String,
    pub image_url: Option<String>,
    pub genre_names: String,
    pub provider_genre_ids: Vec<i32>,
    pub collection: Option<NewCollection>,
    pub cast: Vec<NewCastMember>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCollection {
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCastMember {
    pub name: String,
    pub gender: i32,
    pub image_url: Option<String>,
    pub character: Option<String>,
}

impl NewMovie {
    pub fn from_tmdb(details: &MovieDetails, credits: &Credits, tmdb: &TmdbClient) -> Self {
        let description = details
            .overview
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(DESCRIPTION_MAX_CHARS)
            .collect();

        let genre_names =
            details.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ");

        let collection = details.belongs_to_collection.as_ref().map(|c| NewCollection {
            name: c.name.clone(),
            image_url: tmdb.image_url(c.poster_path.as_deref()),
        });

        let cast = credits
            .cast
            .iter()
            .take(CAST_SIZE)
            .map(|member| NewCastMember {
                name: member.original_name.clone(),
                gender: member.gender.unwrap_or_default(),
                image_url: tmdb.image_url(member.profile_path.as_deref()),
                character: member.character.clone(),
            })
            .collect();

        Self {
            title: details.title.clone(),
            year: tmdb::release_year(details.release_date.as_deref()),
            description,
            image_url: tmdb.image_url(details.poster_path.as_deref()),
            genre_names,
            provider_genre_ids: details.genres.iter().map(|g| g.id).collect(),
            collection,
            cast,
        }
    }
}

pub async fn import_movie(
    library: &Library,
    tmdb: &TmdbClient,
    tmdb_id: i32,
) -> AppResult<ImportOutcome> {
    let details = tmdb.movie_details(tmdb_id).await?;

    if let Some(existing) = library.find_by_title(&details.title).await? {
        info!(tmdb_id, movie_id = existing.id, title = %details.title, "movie already in library");
        return Ok(ImportOutcome::AlreadyPresent(existing.id));
    }

    let credits = tmdb.movie_credits(tmdb_id).await?;
    let new_movie = NewMovie::from_tmdb(&details, &credits, tmdb);

    let outcome = persist(library.db(), &new_movie).await?;
    if let ImportOutcome::Imported(movie_id) = outcome {
        info!(
            tmdb_id,
            movie_id,
            title = %new_movie.title,
            genres = %new_movie.genre_names,
            cast = new_movie.cast.len(),
            "imported movie"
        );
    }
    Ok(outcome)
}

pub async fn persist(db: &DatabaseConnection, new_movie: &NewMovie) -> AppResult<ImportOutcome> {
    let txn = db.begin().await?;
    match write_movie(&txn, new_movie).await {
        Ok(ImportOutcome::Imported(movie_id)) => {
            txn.commit().await?;
            Ok(ImportOutcome::Imported(movie_id))
        },
        Ok(outcome) => {
            txn.rollback().await?;
            Ok(outcome)
        },
        Err(err) => {
            txn.rollback().await?;
            Err(err)
        },
    }
}

async fn write_movie(txn: &DatabaseTransaction, new_movie: &NewMovie) -> AppResult<ImportOutcome> {
    let collection_id = match &new_movie.collection {
        Some(c) => Some(collection_id_for(txn, c).await?),
        None => None,
    };

    let inserted = movie::Entity::insert(movie::ActiveModel {
        title: Set(new_movie.title.clone()),
        year: Set(new_movie.year),
        description: Set(new_movie.description.clone()),
        image_url: Set(new_movie.image_url.clone()),
        genres: Set(Some(new_movie.genre_names.clone())),
        collection_id: Set(collection_id),
        ..Default::default()
    })
    .on_conflict(OnConflict::column(movie::Column::Title).do_nothing().to_owned())
    .exec_without_returning(txn)
    .await?;

    let movie = find_movie_by_title(txn, &new_movie.title).await?;
    if inserted == 0 {
        debug!(movie_id = movie.id, title = %new_movie.title, "title taken during import");
        return Ok(ImportOutcome::AlreadyPresent(movie.id));
    }

    for &provider_id in &new_movie.provider_genre_ids {
        let Some(name) = genres::name_for(provider_id) else {
            warn!(provider_id, title = %new_movie.title, "unknown provider genre, skipping");
            continue;
        };
        // Genres are never created here; they must already be seeded.
        let genre = genre::Entity::find()
            .filter(genre::Column::Name.eq(name))
            .one(txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("genre {name:?} is missing from the genres table"))?;

        movie_genre::Entity::insert(movie_genre::ActiveModel {
            movie_id: Set(movie.id),
            genre_id: Set(genre.id),
            ..Default::default()
        })
        .exec_without_returning(txn)
        .await?;
    }

    for member in &new_movie.cast {
        let actor_id = actor_id_for(txn, member).await?;
        casting::Entity::insert(casting::ActiveModel {
            movie_id: Set(movie.id),
            actor_id: Set(actor_id),
            character: Set(member.character.clone()),
            ..Default::default()
        })
        .exec_without_returning(txn)
        .await?;
    }

    Ok(ImportOutcome::Imported(movie.id))
}

async fn find_movie_by_title(txn: &DatabaseTransaction, title: &str) -> AppResult<movie::Model> {
    movie::Entity::find()
        .filter(movie::Column::Title.eq(title))
        .one(txn)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("movie {title:?} vanished mid-import")))
}

/// Insert-or-ignore keyed by name, then read back the surviving row.
async fn collection_id_for(txn: &DatabaseTransaction, new: &NewCollection) -> AppResult<i32> {
    collection::Entity::insert(collection::ActiveModel {
        name: Set(new.name.clone()),
        image_url: Set(new.image_url.clone()),
        ..Default::default()
    })
    .on_conflict(OnConflict::column(collection::Column::Name).do_nothing().to_owned())
    .exec_without_returning(txn)
    .await?;

    let row = collection::Entity::find()
        .filter(collection::Column::Name.eq(new.name.as_str()))
        .one(txn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("collection {:?} missing after upsert", new.name))?;
    Ok(row.id)
}

async fn actor_id_for(txn: &DatabaseTransaction, member: &NewCastMember) -> AppResult<i32> {
    actor::Entity::insert(actor::ActiveModel {
        name: Set(member.name.clone()),
        gender: Set(member.gender),
        image_url: Set(member.image_url.clone()),
        ..Default::default()
    })
    .on_conflict(OnConflict::column(actor::Column::Name).do_nothing().to_owned())
    .exec_without_returning(txn)
    .await?;

    let row = actor::Entity::find()
        .filter(actor::Column::Name.eq(member.name.as_str()))
        .one(txn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("actor {:?} missing after upsert", member.name))?;
    Ok(row.id)
}

#[cfg(test)]
mod tests {
    use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};

    use super::*;
    use crate::{config::Config, db};

    fn tmdb() -> TmdbClient {
        let config = Config {
            addr: ([127, 0, 0, 1], 0).into(),
            database_url: "sqlite::memory:".to_string(),
            tmdb_access_token: "token".to_string(),
            tmdb_base_url: "http://localhost".to_string(),
            tmdb_image_base_url: "https://img.example/w500".to_string(),
            tmdb_language: "en-US".to_string(),
            tmdb_rps: 10,
            http_timeout_secs: 1,
        };
        TmdbClient::new(reqwest::Client::new(), &config)
    }

    fn details(json: serde_json::Value) -> MovieDetails {
        serde_json::from_value(json).unwrap()
    }

    fn credits(count: usize) -> Credits {
        let cast: Vec<_> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "original_name": format!("Actor {i}"),
                    "gender": 2,
                    "profile_path": format!("/actor{i}.jpg"),
                    "character": format!("Role {i}"),
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({ "cast": cast })).unwrap()
    }

    fn new_movie(title: &str, genre_ids: Vec<i32>, cast: Vec<&str>) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            year: Some(2001),
            description: "desc".to_string(),
            image_url: None,
            genre_names: String::new(),
            provider_genre_ids: genre_ids,
            collection: None,
            cast: cast
                .into_iter()
                .map(|name| NewCastMember {
                    name: name.to_string(),
                    gender: 1,
                    image_url: None,
                    character: Some(format!("{name}'s role")),
                })
                .collect(),
        }
    }

    #[test]
    fn maps_details_and_caps_cast() {
        let overview = "x".repeat(DESCRIPTION_MAX_CHARS + 50);
        let details = details(serde_json::json!({
            "id": 603,
            "title": "The Matrix",
            "overview": overview,
            "release_date": "1999-03-30",
            "poster_path": "/matrix.jpg",
            "belongs_to_collection": { "name": "The Matrix Collection", "poster_path": "/col.jpg" },
            "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
        }));

        let new = NewMovie::from_tmdb(&details, &credits(8), &tmdb());

        assert_eq!(new.year, Some(1999));
        assert_eq!(new.description.chars().count(), DESCRIPTION_MAX_CHARS);
        assert_eq!(new.image_url.as_deref(), Some("https://img.example/w500/matrix.jpg"));
        assert_eq!(new.genre_names, "Action, Science Fiction");
        assert_eq!(new.provider_genre_ids, [28, 878]);
        assert_eq!(
            new.collection.unwrap().image_url.as_deref(),
            Some("https://img.example/w500/col.jpg")
        );
        assert_eq!(new.cast.len(), CAST_SIZE);
        assert_eq!(new.cast[5].name, "Actor 5");
    }

    #[test]
    fn short_cast_and_missing_fields() {
        let details = details(serde_json::json!({ "id": 1, "title": "Short", "release_date": "" }));
        let new = NewMovie::from_tmdb(&details, &credits(2), &tmdb());

        assert_eq!(new.year, None);
        assert_eq!(new.description, "");
        assert_eq!(new.image_url, None);
        assert!(new.collection.is_none());
        assert_eq!(new.cast.len(), 2);
    }

    #[tokio::test]
    async fn persists_genre_links_and_cast() {
        let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
        let mut new = new_movie("Heat", vec![80, 18, 53], vec!["Al Pacino", "Robert De Niro"]);
        new.collection = Some(NewCollection { name: "Crime Saga".to_string(), image_url: None });

        let ImportOutcome::Imported(id) = persist(&db, &new).await.unwrap() else {
            panic!("expected a fresh import");
        };

        let movie = movie::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
        assert_eq!(movie.find_related(movie_genre::Entity).count(&db).await.unwrap(), 3);
        assert_eq!(movie.find_related(casting::Entity).count(&db).await.unwrap(), 2);
        assert!(movie.collection_id.is_some());
        assert_eq!(movie.rating, None);
        assert_eq!(movie.ranking, None);
    }

    #[tokio::test]
    async fn reuses_actors_and_collections_by_name() {
        let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
        let saga = NewCollection { name: "Saga".to_string(), image_url: None };

        let mut first = new_movie("Part One", vec![], vec!["Shared Star", "Only First"]);
        first.collection = Some(saga.clone());
        let mut second = new_movie("Part Two", vec![], vec!["Shared Star"]);
        second.collection = Some(saga);

        persist(&db, &first).await.unwrap();
        persist(&db, &second).await.unwrap();

        assert_eq!(actor::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(collection::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(casting::Entity::find().count(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_title_writes_nothing() {
        let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
        let mut new = new_movie("Alien", vec![27], vec!["Sigourney Weaver"]);

        let ImportOutcome::Imported(id) = persist(&db, &new).await.unwrap() else {
            panic!("expected a fresh import");
        };

        new.collection = Some(NewCollection {
            name: "Alien Collection".to_string(),
            image_url: None,
        });
        new.cast.push(NewCastMember {
            name: "Tom Skerritt".to_string(),
            gender: 2,
            image_url: None,
            character: None,
        });
        assert_eq!(persist(&db, &new).await.unwrap(), ImportOutcome::AlreadyPresent(id));

        assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(collection::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(actor::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(casting::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_provider_genre_is_skipped() {
        let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
        let new = new_movie("Odd", vec![28, 424242], vec![]);

        persist(&db, &new).await.unwrap();

        assert_eq!(movie_genre::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_seeded_genre_rolls_back_everything() {
        let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
        genre::Entity::delete_many()
            .filter(genre::Column::Name.eq("Western"))
            .exec(&db)
            .await
            .unwrap();
        let new = new_movie("Unforgiven", vec![37], vec!["Clint Eastwood"]);

        assert!(persist(&db, &new).await.is_err());

        assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(actor::Entity::find().count(&db).await.unwrap(), 0);
    }
}
