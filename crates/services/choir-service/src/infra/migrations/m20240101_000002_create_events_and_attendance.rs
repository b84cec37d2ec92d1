//! Migration: Create events and per-member attendance.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CREATE_ENUMS_SQL: &str = r#"
CREATE TYPE event_type AS ENUM ('REHEARSAL', 'SERVICE', 'CONCERT', 'MEETING', 'OTHER');
CREATE TYPE attendance_status AS ENUM ('PRESENT', 'ABSENT', 'LATE', 'EXCUSED');
"#;

const DROP_ENUMS_SQL: &str = r#"
DROP TYPE IF EXISTS attendance_status;
DROP TYPE IF EXISTS event_type;
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(CREATE_ENUMS_SQL)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::ChoirId).integer().null())
                    .col(ColumnDef::new(Events::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Events::EventType)
                            .custom(Alias::new("event_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::Location).string_len(255).null())
                    .col(ColumnDef::new(Events::StartsAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Events::EndsAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_choir")
                            .from(Events::Table, Events::ChoirId)
                            .to(Choirs::Table, Choirs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_choir_starts_at")
                    .table(Events::Table)
                    .col(Events::ChoirId)
                    .col(Events::StartsAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::EventId).integer().not_null())
                    .col(ColumnDef::new(Attendance::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Attendance::Status)
                            .custom(Alias::new("attendance_status"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendance::Note).text().null())
                    .col(
                        ColumnDef::new(Attendance::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_event")
                            .from(Attendance::Table, Attendance::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_user")
                            .from(Attendance::Table, Attendance::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_attendance_event_user")
                    .table(Attendance::Table)
                    .col(Attendance::EventId)
                    .col(Attendance::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared(DROP_ENUMS_SQL)
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
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    ChoirId,
    Title,
    EventType,
    Location,
    StartsAt,
    EndsAt,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    EventId,
    UserId,
    Status,
    Note,
    RecordedAt,
}
