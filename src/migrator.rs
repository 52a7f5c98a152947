use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_movie_tables::Migration),
            Box::new(m20240101_000003_create_theatre_tables::Migration),
            Box::new(m20240101_000004_create_shows_table::Migration),
            Box::new(m20240101_000005_create_booking_tables::Migration),
            Box::new(m20240101_000006_create_payment_tables::Migration),
            Box::new(m20240101_000007_create_food_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create users table aligned with entities::user Model
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FullName).string().null())
                        .col(ColumnDef::new(Users::PhoneNumber).string().null())
                        .col(
                            ColumnDef::new(Users::IsAdmin)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        Email,
        PasswordHash,
        FullName,
        PhoneNumber,
        IsAdmin,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_movie_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_movie_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create genres table
            manager
                .create_table(
                    Table::create()
                        .table(Genres::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Genres::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Genres::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Genres::Description).string().null())
                        .col(ColumnDef::new(Genres::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // Create movies table
            manager
                .create_table(
                    Table::create()
                        .table(Movies::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Movies::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Movies::Title).string().not_null())
                        .col(ColumnDef::new(Movies::Description).string().null())
                        .col(ColumnDef::new(Movies::ReleaseDate).date().not_null())
                        .col(
                            ColumnDef::new(Movies::DurationMinutes)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movies::Language).string().not_null())
                        .col(ColumnDef::new(Movies::Certification).string().null())
                        .col(ColumnDef::new(Movies::Director).string().null())
                        .col(
                            ColumnDef::new(Movies::Rating)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Movies::Status).string().not_null())
                        .col(
                            ColumnDef::new(Movies::IsFeatured)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Movies::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Movies::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // Create movie_genres join table
            manager
                .create_table(
                    Table::create()
                        .table(MovieGenres::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MovieGenres::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MovieGenres::MovieId).uuid().not_null())
                        .col(ColumnDef::new(MovieGenres::GenreId).uuid().not_null())
                        .col(
                            ColumnDef::new(MovieGenres::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movie_genres_movie_id")
                                .from(MovieGenres::Table, MovieGenres::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movie_genres_genre_id")
                                .from(MovieGenres::Table, MovieGenres::GenreId)
                                .to(Genres::Table, Genres::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create movie_reviews table
            manager
                .create_table(
                    Table::create()
                        .table(MovieReviews::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MovieReviews::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MovieReviews::MovieId).uuid().not_null())
                        .col(ColumnDef::new(MovieReviews::UserId).uuid().not_null())
                        .col(ColumnDef::new(MovieReviews::Rating).integer().not_null())
                        .col(ColumnDef::new(MovieReviews::ReviewText).string().null())
                        .col(
                            ColumnDef::new(MovieReviews::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MovieReviews::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movie_reviews_movie_id")
                                .from(MovieReviews::Table, MovieReviews::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movie_reviews_user_id")
                                .from(MovieReviews::Table, MovieReviews::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Useful indexes
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movies_status")
                        .table(Movies::Table)
                        .col(Movies::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movies_release_date")
                        .table(Movies::Table)
                        .col(Movies::ReleaseDate)
                        .to_owned(),
                )
                .await?;

            // One genre link per (movie, genre)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movie_genres_movie_genre")
                        .table(MovieGenres::Table)
                        .col(MovieGenres::MovieId)
                        .col(MovieGenres::GenreId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // One review per (movie, user)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movie_reviews_movie_user")
                        .table(MovieReviews::Table)
                        .col(MovieReviews::MovieId)
                        .col(MovieReviews::UserId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MovieReviews::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MovieGenres::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Movies::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Genres::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Genres {
        Table,
        Id,
        Name,
        Description,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Movies {
        Table,
        Id,
        Title,
        Description,
        ReleaseDate,
        DurationMinutes,
        Language,
        Certification,
        Director,
        Rating,
        Status,
        IsFeatured,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum MovieGenres {
        Table,
        Id,
        MovieId,
        GenreId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum MovieReviews {
        Table,
        Id,
        MovieId,
        UserId,
        Rating,
        ReviewText,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }
}

mod m20240101_000003_create_theatre_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_theatre_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create theatres table
            manager
                .create_table(
                    Table::create()
                        .table(Theatres::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Theatres::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Theatres::Name).string().not_null())
                        .col(ColumnDef::new(Theatres::Address).string().not_null())
                        .col(ColumnDef::new(Theatres::City).string().not_null())
                        .col(ColumnDef::new(Theatres::State).string().not_null())
                        .col(ColumnDef::new(Theatres::PostalCode).string().not_null())
                        .col(ColumnDef::new(Theatres::PhoneNumber).string().null())
                        .col(
                            ColumnDef::new(Theatres::TotalScreens)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Theatres::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Theatres::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Theatres::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // Create screens table
            manager
                .create_table(
                    Table::create()
                        .table(Screens::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Screens::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Screens::TheatreId).uuid().not_null())
                        .col(ColumnDef::new(Screens::Name).string().not_null())
                        .col(
                            ColumnDef::new(Screens::Capacity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Screens::TotalRows)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Screens::SeatsPerRow)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Screens::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Screens::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Screens::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_screens_theatre_id")
                                .from(Screens::Table, Screens::TheatreId)
                                .to(Theatres::Table, Theatres::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create seats table
            manager
                .create_table(
                    Table::create()
                        .table(Seats::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Seats::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Seats::ScreenId).uuid().not_null())
                        .col(ColumnDef::new(Seats::Row).string().not_null())
                        .col(ColumnDef::new(Seats::SeatNumber).integer().not_null())
                        .col(ColumnDef::new(Seats::SeatType).string().not_null())
                        .col(ColumnDef::new(Seats::BasePrice).decimal().not_null())
                        .col(
                            ColumnDef::new(Seats::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Seats::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_seats_screen_id")
                                .from(Seats::Table, Seats::ScreenId)
                                .to(Screens::Table, Screens::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_theatres_city")
                        .table(Theatres::Table)
                        .col(Theatres::City)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_screens_theatre_id")
                        .table(Screens::Table)
                        .col(Screens::TheatreId)
                        .to_owned(),
                )
                .await?;

            // One screen name per theatre
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_screens_theatre_name")
                        .table(Screens::Table)
                        .col(Screens::TheatreId)
                        .col(Screens::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_seats_screen_id")
                        .table(Seats::Table)
                        .col(Seats::ScreenId)
                        .to_owned(),
                )
                .await?;

            // One physical seat per (screen, row, number)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_seats_screen_row_number")
                        .table(Seats::Table)
                        .col(Seats::ScreenId)
                        .col(Seats::Row)
                        .col(Seats::SeatNumber)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Seats::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Screens::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Theatres::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Theatres {
        Table,
        Id,
        Name,
        Address,
        City,
        State,
        PostalCode,
        PhoneNumber,
        TotalScreens,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Screens {
        Table,
        Id,
        TheatreId,
        Name,
        Capacity,
        TotalRows,
        SeatsPerRow,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Seats {
        Table,
        Id,
        ScreenId,
        Row,
        SeatNumber,
        SeatType,
        BasePrice,
        IsActive,
        CreatedAt,
    }
}

mod m20240101_000004_create_shows_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_shows_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create shows table
            manager
                .create_table(
                    Table::create()
                        .table(Shows::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Shows::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Shows::MovieId).uuid().not_null())
                        .col(ColumnDef::new(Shows::ScreenId).uuid().not_null())
                        .col(ColumnDef::new(Shows::ShowDate).date().not_null())
                        .col(ColumnDef::new(Shows::ShowTime).time().not_null())
                        .col(ColumnDef::new(Shows::EndTime).time().not_null())
                        .col(
                            ColumnDef::new(Shows::BaseTicketPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Shows::Status).string().not_null())
                        .col(
                            ColumnDef::new(Shows::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Shows::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Shows::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shows_movie_id")
                                .from(Shows::Table, Shows::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shows_screen_id")
                                .from(Shows::Table, Shows::ScreenId)
                                .to(Screens::Table, Screens::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shows_movie_id")
                        .table(Shows::Table)
                        .col(Shows::MovieId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shows_screen_id")
                        .table(Shows::Table)
                        .col(Shows::ScreenId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shows_show_date")
                        .table(Shows::Table)
                        .col(Shows::ShowDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Shows::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Shows {
        Table,
        Id,
        MovieId,
        ScreenId,
        ShowDate,
        ShowTime,
        EndTime,
        BaseTicketPrice,
        Status,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Movies {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Screens {
        Table,
        Id,
    }
}

mod m20240101_000005_create_booking_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_booking_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create bookings table
            manager
                .create_table(
                    Table::create()
                        .table(Bookings::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bookings::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Bookings::BookingCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                        .col(ColumnDef::new(Bookings::ShowId).uuid().not_null())
                        .col(ColumnDef::new(Bookings::TotalAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Bookings::DiscountAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Bookings::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Bookings::FinalAmount).decimal().not_null())
                        .col(ColumnDef::new(Bookings::Status).string().not_null())
                        .col(ColumnDef::new(Bookings::PaymentMethod).string().null())
                        .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Bookings::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookings_user_id")
                                .from(Bookings::Table, Bookings::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookings_show_id")
                                .from(Bookings::Table, Bookings::ShowId)
                                .to(Shows::Table, Shows::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create tickets table
            manager
                .create_table(
                    Table::create()
                        .table(Tickets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Tickets::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Tickets::TicketCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Tickets::BookingId).uuid().not_null())
                        .col(ColumnDef::new(Tickets::ShowId).uuid().not_null())
                        .col(ColumnDef::new(Tickets::SeatId).uuid().not_null())
                        .col(ColumnDef::new(Tickets::BasePrice).decimal().not_null())
                        .col(
                            ColumnDef::new(Tickets::Tax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Tickets::FinalPrice).decimal().not_null())
                        .col(ColumnDef::new(Tickets::Status).string().not_null())
                        .col(ColumnDef::new(Tickets::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Tickets::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tickets_booking_id")
                                .from(Tickets::Table, Tickets::BookingId)
                                .to(Bookings::Table, Bookings::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tickets_show_id")
                                .from(Tickets::Table, Tickets::ShowId)
                                .to(Shows::Table, Shows::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tickets_seat_id")
                                .from(Tickets::Table, Tickets::SeatId)
                                .to(Seats::Table, Seats::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create booking_cancellations table
            manager
                .create_table(
                    Table::create()
                        .table(BookingCancellations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BookingCancellations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BookingCancellations::BookingId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(BookingCancellations::CancelledBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BookingCancellations::CancellationReason)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(BookingCancellations::RefundAmount)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BookingCancellations::CancellationCharges)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BookingCancellations::RefundProcessedAt)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(BookingCancellations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_booking_cancellations_booking_id")
                                .from(
                                    BookingCancellations::Table,
                                    BookingCancellations::BookingId,
                                )
                                .to(Bookings::Table, Bookings::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_booking_cancellations_cancelled_by")
                                .from(
                                    BookingCancellations::Table,
                                    BookingCancellations::CancelledBy,
                                )
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_user_id")
                        .table(Bookings::Table)
                        .col(Bookings::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_show_id")
                        .table(Bookings::Table)
                        .col(Bookings::ShowId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_status")
                        .table(Bookings::Table)
                        .col(Bookings::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tickets_booking_id")
                        .table(Tickets::Table)
                        .col(Tickets::BookingId)
                        .to_owned(),
                )
                .await?;

            // Seat reservation guard: at most one live ticket per (show, seat).
            // Partial so cancelled tickets keep their row without blocking
            // resale. Raw SQL because the builder cannot express the predicate;
            // the syntax is shared by SQLite and Postgres.
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_tickets_show_seat_live \
                     ON tickets (show_id, seat_id) WHERE status <> 'cancelled'",
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BookingCancellations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Tickets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Bookings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Bookings {
        Table,
        Id,
        BookingCode,
        UserId,
        ShowId,
        TotalAmount,
        DiscountAmount,
        TaxAmount,
        FinalAmount,
        Status,
        PaymentMethod,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Tickets {
        Table,
        Id,
        TicketCode,
        BookingId,
        ShowId,
        SeatId,
        BasePrice,
        Tax,
        FinalPrice,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum BookingCancellations {
        Table,
        Id,
        BookingId,
        CancelledBy,
        CancellationReason,
        RefundAmount,
        CancellationCharges,
        RefundProcessedAt,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Shows {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Seats {
        Table,
        Id,
    }
}

mod m20240101_000006_create_payment_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_payment_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create payments table
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Payments::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Payments::PaymentCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Payments::BookingId)
                                .uuid()
                                .null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Payments::Amount).decimal().not_null())
                        .col(
                            ColumnDef::new(Payments::ProcessingCharges)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Payments::TotalAmount).decimal().not_null())
                        .col(ColumnDef::new(Payments::Method).string().not_null())
                        .col(ColumnDef::new(Payments::Status).string().not_null())
                        .col(ColumnDef::new(Payments::GatewayOrderId).string().null())
                        .col(ColumnDef::new(Payments::GatewayPaymentId).string().null())
                        .col(ColumnDef::new(Payments::GatewaySignature).string().null())
                        .col(
                            ColumnDef::new(Payments::Currency)
                                .string()
                                .not_null()
                                .default("INR"),
                        )
                        .col(ColumnDef::new(Payments::Notes).string().null())
                        .col(ColumnDef::new(Payments::CompletedAt).timestamp().null())
                        .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Payments::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_booking_id")
                                .from(Payments::Table, Payments::BookingId)
                                .to(Bookings::Table, Bookings::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create refunds table
            manager
                .create_table(
                    Table::create()
                        .table(Refunds::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Refunds::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Refunds::RefundCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Refunds::PaymentId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Refunds::CancellationId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Refunds::RefundAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Refunds::RefundCharges)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Refunds::NetRefundAmount)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Refunds::Status).string().not_null())
                        .col(ColumnDef::new(Refunds::Reason).string().null())
                        .col(ColumnDef::new(Refunds::ProcessedAt).timestamp().null())
                        .col(ColumnDef::new(Refunds::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_refunds_payment_id")
                                .from(Refunds::Table, Refunds::PaymentId)
                                .to(Payments::Table, Payments::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_refunds_cancellation_id")
                                .from(Refunds::Table, Refunds::CancellationId)
                                .to(BookingCancellations::Table, BookingCancellations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create invoices table
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::InvoiceCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::PaymentId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::InvoiceDate).date().not_null())
                        .col(ColumnDef::new(Invoices::DueDate).date().not_null())
                        .col(ColumnDef::new(Invoices::Subtotal).decimal().not_null())
                        .col(
                            ColumnDef::new(Invoices::Tax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Invoices::Total).decimal().not_null())
                        .col(
                            ColumnDef::new(Invoices::IsPaid)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_payment_id")
                                .from(Invoices::Table, Invoices::PaymentId)
                                .to(Payments::Table, Payments::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Callback lookup key
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payments_gateway_order_id")
                        .table(Payments::Table)
                        .col(Payments::GatewayOrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payments_status")
                        .table(Payments::Table)
                        .col(Payments::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Refunds::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Payments {
        Table,
        Id,
        PaymentCode,
        BookingId,
        Amount,
        ProcessingCharges,
        TotalAmount,
        Method,
        Status,
        GatewayOrderId,
        GatewayPaymentId,
        GatewaySignature,
        Currency,
        Notes,
        CompletedAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Refunds {
        Table,
        Id,
        RefundCode,
        PaymentId,
        CancellationId,
        RefundAmount,
        RefundCharges,
        NetRefundAmount,
        Status,
        Reason,
        ProcessedAt,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        InvoiceCode,
        PaymentId,
        InvoiceDate,
        DueDate,
        Subtotal,
        Tax,
        Total,
        IsPaid,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Bookings {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum BookingCancellations {
        Table,
        Id,
    }
}

mod m20240101_000007_create_food_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_food_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create food_categories table
            manager
                .create_table(
                    Table::create()
                        .table(FoodCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FoodCategories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FoodCategories::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(FoodCategories::Description).string().null())
                        .col(
                            ColumnDef::new(FoodCategories::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(FoodCategories::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Create food_items table
            manager
                .create_table(
                    Table::create()
                        .table(FoodItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FoodItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FoodItems::CategoryId).uuid().null())
                        .col(ColumnDef::new(FoodItems::Name).string().not_null())
                        .col(ColumnDef::new(FoodItems::Description).string().null())
                        .col(ColumnDef::new(FoodItems::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(FoodItems::QuantityUnit)
                                .string()
                                .not_null()
                                .default("piece"),
                        )
                        .col(
                            ColumnDef::new(FoodItems::IsAvailable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(FoodItems::IsVegetarian)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(FoodItems::PreparationTimeMinutes)
                                .integer()
                                .not_null()
                                .default(15),
                        )
                        .col(ColumnDef::new(FoodItems::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(FoodItems::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_food_items_category_id")
                                .from(FoodItems::Table, FoodItems::CategoryId)
                                .to(FoodCategories::Table, FoodCategories::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create carts table
            manager
                .create_table(
                    Table::create()
                        .table(Carts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Carts::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Carts::UserId).uuid().not_null())
                        .col(
                            ColumnDef::new(Carts::Status)
                                .string()
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Carts::ExpiresAt).timestamp().not_null())
                        .col(ColumnDef::new(Carts::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Carts::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_carts_user_id")
                                .from(Carts::Table, Carts::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create cart_items table
            manager
                .create_table(
                    Table::create()
                        .table(CartItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CartItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CartItems::CartId).uuid().not_null())
                        .col(ColumnDef::new(CartItems::FoodItemId).uuid().not_null())
                        .col(ColumnDef::new(CartItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(CartItems::SpecialInstructions)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(CartItems::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(CartItems::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cart_items_cart_id")
                                .from(CartItems::Table, CartItems::CartId)
                                .to(Carts::Table, Carts::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cart_items_food_item_id")
                                .from(CartItems::Table, CartItems::FoodItemId)
                                .to(FoodItems::Table, FoodItems::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create food_orders table
            manager
                .create_table(
                    Table::create()
                        .table(FoodOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FoodOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FoodOrders::OrderCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(FoodOrders::UserId).uuid().not_null())
                        .col(ColumnDef::new(FoodOrders::BookingId).uuid().null())
                        .col(ColumnDef::new(FoodOrders::TheatreId).uuid().not_null())
                        .col(ColumnDef::new(FoodOrders::TotalAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(FoodOrders::Discount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(FoodOrders::Tax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(FoodOrders::FinalAmount).decimal().not_null())
                        .col(ColumnDef::new(FoodOrders::Status).string().not_null())
                        .col(
                            ColumnDef::new(FoodOrders::SpecialInstructions)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(FoodOrders::EstimatedReadyTime)
                                .timestamp()
                                .null(),
                        )
                        .col(ColumnDef::new(FoodOrders::DeliveredAt).timestamp().null())
                        .col(ColumnDef::new(FoodOrders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(FoodOrders::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_food_orders_user_id")
                                .from(FoodOrders::Table, FoodOrders::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_food_orders_booking_id")
                                .from(FoodOrders::Table, FoodOrders::BookingId)
                                .to(Bookings::Table, Bookings::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_food_orders_theatre_id")
                                .from(FoodOrders::Table, FoodOrders::TheatreId)
                                .to(Theatres::Table, Theatres::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create food_order_items table
            manager
                .create_table(
                    Table::create()
                        .table(FoodOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FoodOrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FoodOrderItems::FoodOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FoodOrderItems::FoodItemId).uuid().not_null())
                        .col(ColumnDef::new(FoodOrderItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(FoodOrderItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FoodOrderItems::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FoodOrderItems::SpecialInstructions)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(FoodOrderItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_food_order_items_food_order_id")
                                .from(FoodOrderItems::Table, FoodOrderItems::FoodOrderId)
                                .to(FoodOrders::Table, FoodOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_food_order_items_food_item_id")
                                .from(FoodOrderItems::Table, FoodOrderItems::FoodItemId)
                                .to(FoodItems::Table, FoodItems::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_food_items_category_id")
                        .table(FoodItems::Table)
                        .col(FoodItems::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_carts_user_id")
                        .table(Carts::Table)
                        .col(Carts::UserId)
                        .to_owned(),
                )
                .await?;

            // One line per (cart, item); quantity accumulates on the line
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cart_items_cart_item")
                        .table(CartItems::Table)
                        .col(CartItems::CartId)
                        .col(CartItems::FoodItemId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_food_orders_user_id")
                        .table(FoodOrders::Table)
                        .col(FoodOrders::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_food_orders_status")
                        .table(FoodOrders::Table)
                        .col(FoodOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_food_order_items_food_order_id")
                        .table(FoodOrderItems::Table)
                        .col(FoodOrderItems::FoodOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FoodOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FoodOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CartItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Carts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FoodItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FoodCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum FoodCategories {
        Table,
        Id,
        Name,
        Description,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum FoodItems {
        Table,
        Id,
        CategoryId,
        Name,
        Description,
        Price,
        QuantityUnit,
        IsAvailable,
        IsVegetarian,
        PreparationTimeMinutes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Carts {
        Table,
        Id,
        UserId,
        Status,
        ExpiresAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum CartItems {
        Table,
        Id,
        CartId,
        FoodItemId,
        Quantity,
        SpecialInstructions,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum FoodOrders {
        Table,
        Id,
        OrderCode,
        UserId,
        BookingId,
        TheatreId,
        TotalAmount,
        Discount,
        Tax,
        FinalAmount,
        Status,
        SpecialInstructions,
        EstimatedReadyTime,
        DeliveredAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum FoodOrderItems {
        Table,
        Id,
        FoodOrderId,
        FoodItemId,
        Quantity,
        UnitPrice,
        TotalPrice,
        SpecialInstructions,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Bookings {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Theatres {
        Table,
        Id,
    }
}
