use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
    sea_query::{Expr, NullOrdering, Order},
};
use tracing::{debug, info};

use crate::{
    entities::{actor, casting, collection, movie, movie_genre},
    error::{AppError, AppResult},
    models::{ActorAppearances, CastRow, CollectionSummary, MovieEdit},
};

/// Read and write access to the movie collection.
#[derive(Clone)]
pub struct Library {
    db: DatabaseConnection,
}

impl Library {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Most recently watched first; unwatched movies sort last.
    pub async fn recent_movies(&self, limit: u64) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_with_nulls(movie::Column::WatchedOn, Order::Desc, NullOrdering::Last)
            .order_by_desc(movie::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    /// Re-ranks every movie by rating, persists the new positions and
    /// returns the first `limit`.
    ///
    /// Concurrent callers are not serialized; the last transaction to commit
    /// wins.
    pub async fn top_movies(&self, limit: usize) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_with_nulls(movie::Column::Rating, Order::Desc, NullOrdering::Last)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;

        let txn = self.db.begin().await?;
        let mut ranked = Vec::with_capacity(movies.len());
        let mut rewritten = 0usize;
        for (idx, mut movie) in movies.into_iter().enumerate() {
            let ranking = i32::try_from(idx + 1).map_err(anyhow::Error::from)?;
            if movie.ranking != Some(ranking) {
                movie::Entity::update_many()
                    .col_expr(movie::Column::Ranking, Expr::value(ranking))
                    .filter(movie::Column::Id.eq(movie.id))
                    .exec(&txn)
                    .await?;
                movie.ranking = Some(ranking);
                rewritten += 1;
            }
            ranked.push(movie);
        }
        txn.commit().await?;

        debug!(total = ranked.len(), rewritten, "recomputed rankings");
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Actors by number of castings, including actors with none.
    pub async fn top_actors(&self, limit: u64) -> AppResult<Vec<ActorAppearances>> {
        let actors = actor::Entity::find()
            .select_only()
            .columns([
                actor::Column::Id,
                actor::Column::Name,
                actor::Column::Gender,
                actor::Column::ImageUrl,
            ])
            .column_as(casting::Column::Id.count(), "appearances")
            .join(JoinType::LeftJoin, actor::Relation::Casting.def())
            .group_by(actor::Column::Id)
            .order_by_desc(casting::Column::Id.count())
            .order_by_asc(actor::Column::Name)
            .limit(limit)
            .into_model::<ActorAppearances>()
            .all(&self.db)
            .await?;
        Ok(actors)
    }

    pub async fn collections(&self) -> AppResult<Vec<CollectionSummary>> {
        let collections = collection::Entity::find()
            .select_only()
            .columns([
                collection::Column::Id,
                collection::Column::Name,
                collection::Column::ImageUrl,
            ])
            .column_as(movie::Column::Id.count(), "movie_count")
            .join(JoinType::LeftJoin, collection::Relation::Movie.def())
            .group_by(collection::Column::Id)
            .order_by_asc(collection::Column::Name)
            .into_model::<CollectionSummary>()
            .all(&self.db)
            .await?;
        Ok(collections)
    }

    pub async fn movie(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("movie {id}")))
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<movie::Model>> {
        let movie =
            movie::Entity::find().filter(movie::Column::Title.eq(title)).one(&self.db).await?;
        Ok(movie)
    }

    /// Cast in credit order. Rows whose actor is missing are kept.
    pub async fn cast(&self, movie_id: i32) -> AppResult<Vec<CastRow>> {
        let cast = casting::Entity::find()
            .select_only()
            .column(casting::Column::Character)
            .column_as(actor::Column::Name, "actor_name")
            .column_as(actor::Column::ImageUrl, "actor_image")
            .join(JoinType::LeftJoin, casting::Relation::Actor.def())
            .filter(casting::Column::MovieId.eq(movie_id))
            .order_by_asc(casting::Column::Id)
            .into_model::<CastRow>()
            .all(&self.db)
            .await?;
        Ok(cast)
    }

    /// Rating and watched date are always replaced; the review only when a
    /// new one was submitted.
    pub async fn apply_edit(&self, id: i32, edit: &MovieEdit) -> AppResult<movie::Model> {
        let mut active = self.movie(id).await?.into_active_model();
        active.rating = Set(Some(edit.rating));
        active.watched_on = Set(edit.watched_on.map(|d| d.to_string()));
        if let Some(review) = &edit.review {
            active.review = Set(Some(review.clone()));
        }

        let updated = active.update(&self.db).await?;
        info!(movie_id = id, rating = edit.rating, "updated movie");
        Ok(updated)
    }

    /// Removes the movie together with its genre links and castings.
    pub async fn delete_movie(&self, id: i32) -> AppResult<()> {
        self.movie(id).await?;

        let txn = self.db.begin().await?;

        let genre_links = movie_genre::Entity::delete_many()
            .filter(movie_genre::Column::MovieId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let castings = casting::Entity::delete_many()
            .filter(casting::Column::MovieId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        movie::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(movie_id = id, genre_links, castings, "deleted movie");
        Ok(())
    }
}
