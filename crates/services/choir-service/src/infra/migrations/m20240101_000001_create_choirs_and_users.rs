//! Migration: Create choirs, members and admin accounts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CREATE_ENUMS_SQL: &str = r#"
CREATE TYPE user_role AS ENUM ('SUPER_ADMIN', 'CHOIR_ADMIN', 'ATTENDANCE_ADMIN', 'FINANCE_ADMIN', 'CHOIR_MEMBER');
CREATE TYPE gender AS ENUM ('MALE', 'FEMALE');
"#;

const DROP_ENUMS_SQL: &str = r#"
DROP TYPE IF EXISTS gender;
DROP TYPE IF EXISTS user_role;
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
                    .table(Choirs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Choirs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Choirs::Name).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Choirs::Description).text().null())
                    .col(
                        ColumnDef::new(Choirs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Choirs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::ChoirId).integer().null())
                    .col(ColumnDef::new(Users::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Users::PhoneNumber).string_len(32).null())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).null())
                    .col(ColumnDef::new(Users::Gender).custom(Alias::new("gender")).not_null())
                    .col(ColumnDef::new(Users::DateOfBirth).date().null())
                    .col(ColumnDef::new(Users::Address).text().null())
                    .col(ColumnDef::new(Users::ProfileImageUrl).text().null())
                    .col(
                        ColumnDef::new(Users::Categories)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'::text[]")),
                    )
                    .col(
                        ColumnDef::new(Users::Role)
                            .custom(Alias::new("user_role"))
                            .not_null()
                            .default(Expr::cust("'CHOIR_MEMBER'::user_role")),
                    )
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Users::JoinedAt)
                            .date()
                            .not_null()
                            .default(Expr::cust("CURRENT_DATE")),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_choir")
                            .from(Users::Table, Users::ChoirId)
                            .to(Choirs::Table, Choirs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_choir_id")
                    .table(Users::Table)
                    .col(Users::ChoirId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminUsers::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(AdminUsers::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(AdminUsers::FullName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(AdminUsers::Role)
                            .custom(Alias::new("user_role"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminUsers::ChoirId).integer().null())
                    .col(ColumnDef::new(AdminUsers::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(AdminUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_users_choir")
                            .from(AdminUsers::Table, AdminUsers::ChoirId)
                            .to(Choirs::Table, Choirs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Choirs::Table).to_owned())
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
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    ChoirId,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    PasswordHash,
    Gender,
    DateOfBirth,
    Address,
    ProfileImageUrl,
    Categories,
    Role,
    IsActive,
    JoinedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminUsers {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Role,
    ChoirId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
