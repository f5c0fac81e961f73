use migration::Migrator;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Set, Statement,
    sea_query::OnConflict,
};
use sea_orm_migration::MigratorTrait;

use crate::{entities::genre, error::AppResult, genres::MOVIE_GENRES};

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let in_memory = database_url.contains(":memory:");

    let mut opts = ConnectOptions::new(database_url.to_string());
    opts.sqlx_logging(false);
    if in_memory {
        // Every pooled connection would otherwise get its own empty database.
        opts.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opts).await?;

    if !in_memory {
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;
    seed_genres(&db).await?;

    Ok(db)
}

/// Inserts any missing provider genres; existing rows keep their ids.
pub async fn seed_genres(db: &DatabaseConnection) -> AppResult<()> {
    let rows = MOVIE_GENRES.iter().map(|(_, name)| genre::ActiveModel {
        id: Default::default(),
        name: Set((*name).to_string()),
    });

    let inserted = genre::Entity::insert_many(rows)
        .on_conflict(OnConflict::column(genre::Column::Name).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;

    tracing::debug!(inserted, "seeded genres");
    Ok(())
}
