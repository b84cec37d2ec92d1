//! Migration: Create communiques and reports.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE report_type AS ENUM ('ATTENDANCE', 'FINANCIAL', 'ACTIVITY', 'GENERAL')",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Communiques::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Communiques::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Communiques::ChoirId).integer().null())
                    .col(ColumnDef::new(Communiques::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Communiques::Content).text().not_null())
                    .col(
                        ColumnDef::new(Communiques::TargetCategories)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'::text[]")),
                    )
                    .col(ColumnDef::new(Communiques::PublishedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Communiques::AuthorId).integer().null())
                    .col(
                        ColumnDef::new(Communiques::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Communiques::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_communiques_choir")
                            .from(Communiques::Table, Communiques::ChoirId)
                            .to(Choirs::Table, Choirs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::ChoirId).integer().null())
                    .col(ColumnDef::new(Reports::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Reports::ReportType)
                            .custom(Alias::new("report_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reports::PeriodStart).date().not_null())
                    .col(ColumnDef::new(Reports::PeriodEnd).date().not_null())
                    .col(ColumnDef::new(Reports::Content).text().not_null())
                    .col(ColumnDef::new(Reports::AuthorId).integer().null())
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_choir")
                            .from(Reports::Table, Reports::ChoirId)
                            .to(Choirs::Table, Choirs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Communiques::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS report_type")
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Choirs {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Communiques {
    Table,
    Id,
    ChoirId,
    Title,
    Content,
    TargetCategories,
    PublishedAt,
    AuthorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    ChoirId,
    Title,
    ReportType,
    PeriodStart,
    PeriodEnd,
    Content,
    AuthorId,
    CreatedAt,
}
