use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `projects` table and its columns.
#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    CreatedBy,
    ProjectName,
    TypeOfProject,
    Description,
    CastingStart,
    CastingEnd,
    CastingCity,
    CastingState,
    CastingCountry,
    ShootingStart,
    ShootingEnd,
    ShootingCity,
    ShootingState,
    ShootingCountry,
    Role,
    Gender,
    AgeRange,
    Language,
    BannerImage,
    BannerPdf,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Projects::ProjectName).string().not_null())
                    .col(ColumnDef::new(Projects::TypeOfProject).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(ColumnDef::new(Projects::CastingStart).date().not_null())
                    .col(ColumnDef::new(Projects::CastingEnd).date().not_null())
                    .col(ColumnDef::new(Projects::CastingCity).string().not_null())
                    .col(ColumnDef::new(Projects::CastingState).string().not_null())
                    .col(ColumnDef::new(Projects::CastingCountry).string().not_null())
                    .col(ColumnDef::new(Projects::ShootingStart).date().not_null())
                    .col(ColumnDef::new(Projects::ShootingEnd).date().not_null())
                    .col(ColumnDef::new(Projects::ShootingCity).string().not_null())
                    .col(ColumnDef::new(Projects::ShootingState).string().not_null())
                    .col(ColumnDef::new(Projects::ShootingCountry).string().not_null())
                    .col(ColumnDef::new(Projects::Role).string().not_null())
                    .col(ColumnDef::new(Projects::Gender).string().not_null())
                    .col(ColumnDef::new(Projects::AgeRange).string().not_null())
                    .col(ColumnDef::new(Projects::Language).string().not_null())
                    .col(ColumnDef::new(Projects::BannerImage).text().not_null())
                    .col(ColumnDef::new(Projects::BannerPdf).text().not_null())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_created_by")
                    .table(Projects::Table)
                    .col(Projects::CreatedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}
