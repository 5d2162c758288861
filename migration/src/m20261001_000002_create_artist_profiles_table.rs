use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `artist_profiles` table and its columns.
#[derive(DeriveIden)]
enum ArtistProfiles {
    Table,
    Id,
    UserId,
    Email,
    FullName,
    Whatsapp,
    Calling,
    ShortBio,
    Gender,
    Language,
    HomeCity,
    HomeState,
    CurrentCity,
    CurrentState,
    Instagram,
    Youtube,
    Twitter,
    Linkedin,
    TalentCategory,
    Height,
    Age,
    ScreenAge,
    VideoReel,
    Skills,
    PastProjects,
    Photos,
    Monologues,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArtistProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArtistProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ArtistProfiles::UserId).uuid().not_null())
                    .col(ColumnDef::new(ArtistProfiles::Email).string().not_null())
                    .col(ColumnDef::new(ArtistProfiles::FullName).string().null())
                    .col(ColumnDef::new(ArtistProfiles::Whatsapp).string().null())
                    .col(ColumnDef::new(ArtistProfiles::Calling).string().null())
                    .col(ColumnDef::new(ArtistProfiles::ShortBio).text().null())
                    .col(ColumnDef::new(ArtistProfiles::Gender).string().null())
                    .col(ColumnDef::new(ArtistProfiles::Language).string().null())
                    .col(ColumnDef::new(ArtistProfiles::HomeCity).string().null())
                    .col(ColumnDef::new(ArtistProfiles::HomeState).string().null())
                    .col(ColumnDef::new(ArtistProfiles::CurrentCity).string().null())
                    .col(ColumnDef::new(ArtistProfiles::CurrentState).string().null())
                    .col(ColumnDef::new(ArtistProfiles::Instagram).text().null())
                    .col(ColumnDef::new(ArtistProfiles::Youtube).text().null())
                    .col(ColumnDef::new(ArtistProfiles::Twitter).text().null())
                    .col(ColumnDef::new(ArtistProfiles::Linkedin).text().null())
                    .col(ColumnDef::new(ArtistProfiles::TalentCategory).string().null())
                    .col(ColumnDef::new(ArtistProfiles::Height).string().null())
                    .col(ColumnDef::new(ArtistProfiles::Age).integer().null())
                    .col(ColumnDef::new(ArtistProfiles::ScreenAge).integer().null())
                    .col(ColumnDef::new(ArtistProfiles::VideoReel).text().null())
                    .col(ColumnDef::new(ArtistProfiles::Skills).json_binary().not_null())
                    .col(
                        ColumnDef::new(ArtistProfiles::PastProjects)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ArtistProfiles::Photos).json_binary().not_null())
                    .col(
                        ColumnDef::new(ArtistProfiles::Monologues)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArtistProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArtistProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One profile per owner; `ensure_profile` relies on this to stay race-free.
        manager
            .create_index(
                Index::create()
                    .name("uq_artist_profiles_user_id")
                    .table(ArtistProfiles::Table)
                    .col(ArtistProfiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artist_profiles_created_at")
                    .table(ArtistProfiles::Table)
                    .col(ArtistProfiles::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArtistProfiles::Table).to_owned())
            .await
    }
}
