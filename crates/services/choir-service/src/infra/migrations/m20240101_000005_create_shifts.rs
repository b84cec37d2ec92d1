//! Migration: Create leadership and louado shifts.
//!
//! The partial unique index lets any number of shifts exist but at most one
//! row hold `status = 'Active'`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SINGLE_ACTIVE_INDEX_SQL: &str = r#"
CREATE UNIQUE INDEX uq_leadership_shifts_single_active
    ON leadership_shifts ((status))
    WHERE status = 'Active';
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TYPE shift_status AS ENUM ('Upcoming', 'Active', 'Completed', 'Cancelled')",
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeadershipShifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeadershipShifts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeadershipShifts::Name).string_len(255).not_null())
                    .col(ColumnDef::new(LeadershipShifts::LeaderId).integer().not_null())
                    .col(ColumnDef::new(LeadershipShifts::StartDate).date().not_null())
                    .col(ColumnDef::new(LeadershipShifts::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(LeadershipShifts::Status)
                            .custom(Alias::new("shift_status"))
                            .not_null()
                            .default(Expr::cust("'Upcoming'::shift_status")),
                    )
                    .col(ColumnDef::new(LeadershipShifts::Notes).text().null())
                    .col(
                        ColumnDef::new(LeadershipShifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LeadershipShifts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leadership_shifts_leader")
                            .from(LeadershipShifts::Table, LeadershipShifts::LeaderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        db.execute_unprepared(SINGLE_ACTIVE_INDEX_SQL).await?;

        manager
            .create_table(
                Table::create()
                    .table(LouadoShifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LouadoShifts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LouadoShifts::UserId).integer().not_null())
                    .col(ColumnDef::new(LouadoShifts::StartDate).date().not_null())
                    .col(ColumnDef::new(LouadoShifts::EndDate).date().not_null())
                    .col(ColumnDef::new(LouadoShifts::Notes).text().null())
                    .col(
                        ColumnDef::new(LouadoShifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_louado_shifts_user")
                            .from(LouadoShifts::Table, LouadoShifts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LouadoShifts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeadershipShifts::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS shift_status")
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum LeadershipShifts {
    Table,
    Id,
    Name,
    LeaderId,
    StartDate,
    EndDate,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LouadoShifts {
    Table,
    Id,
    UserId,
    StartDate,
    EndDate,
    Notes,
    CreatedAt,
}
