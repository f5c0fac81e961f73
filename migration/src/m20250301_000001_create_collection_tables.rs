use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(pk_auto(Collections::Id))
                    .col(string_uniq(Collections::Name))
                    .col(string_null(Collections::ImageUrl))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_uniq(Movies::Title))
                    .col(integer_null(Movies::Year))
                    .col(text(Movies::Description))
                    .col(double_null(Movies::Rating))
                    .col(integer_null(Movies::Ranking))
                    .col(text_null(Movies::Review))
                    .col(string_null(Movies::ImageUrl))
                    .col(string_null(Movies::WatchedOn))
                    .col(string_null(Movies::Genres))
                    .col(integer_null(Movies::CollectionId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_collection")
                            .from(Movies::Table, Movies::CollectionId)
                            .to(Collections::Table, Collections::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_watched_on")
                    .table(Movies::Table)
                    .col(Movies::WatchedOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(pk_auto(Genres::Id))
                    .col(string_uniq(Genres::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenres::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieGenres::Id))
                    .col(integer(MovieGenres::MovieId))
                    .col(integer(MovieGenres::GenreId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genres_movie")
                            .from(MovieGenres::Table, MovieGenres::MovieId)
                            .to(Movies::Table, Movies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genres_genre")
                            .from(MovieGenres::Table, MovieGenres::GenreId)
                            .to(Genres::Table, Genres::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::Id))
                    .col(string_uniq(Actors::Name))
                    .col(integer(Actors::Gender))
                    .col(string_null(Actors::ImageUrl))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Castings::Table)
                    .if_not_exists()
                    .col(pk_auto(Castings::Id))
                    .col(integer(Castings::MovieId))
                    .col(integer(Castings::ActorId))
                    .col(string_null(Castings::Character))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_castings_movie")
                            .from(Castings::Table, Castings::MovieId)
                            .to(Movies::Table, Movies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_castings_actor")
                            .from(Castings::Table, Castings::ActorId)
                            .to(Actors::Table, Actors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_castings_movie")
                    .table(Castings::Table)
                    .col(Castings::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genres_movie")
                    .table(MovieGenres::Table)
                    .col(MovieGenres::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Castings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Collections::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Year,
    Description,
    Rating,
    Ranking,
    Review,
    ImageUrl,
    WatchedOn,
    Genres,
    CollectionId,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum MovieGenres {
    Table,
    Id,
    MovieId,
    GenreId,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    Name,
    Gender,
    ImageUrl,
}

#[derive(DeriveIden)]
enum Castings {
    Table,
    Id,
    MovieId,
    ActorId,
    Character,
}

#[derive(DeriveIden)]
enum Collections {
    Table,
    Id,
    Name,
    ImageUrl,
}
