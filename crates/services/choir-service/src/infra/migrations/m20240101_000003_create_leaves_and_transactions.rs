//! Migration: Create leave requests and financial transactions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CREATE_ENUMS_SQL: &str = r#"
CREATE TYPE leave_status AS ENUM ('PENDING', 'APPROVED', 'REJECTED', 'CANCELLED');
CREATE TYPE transaction_type AS ENUM ('INCOME', 'EXPENSE');
CREATE TYPE transaction_category AS ENUM ('CONTRIBUTION', 'DONATION', 'OFFERING', 'EVENT', 'EQUIPMENT', 'TRANSPORT', 'UNIFORM', 'OTHER');
"#;

const DROP_ENUMS_SQL: &str = r#"
DROP TYPE IF EXISTS transaction_category;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS leave_status;
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
                    .table(Leaves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leaves::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leaves::UserId).integer().not_null())
                    .col(ColumnDef::new(Leaves::Reason).string_len(32).not_null())
                    .col(ColumnDef::new(Leaves::StartDate).date().not_null())
                    .col(ColumnDef::new(Leaves::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Leaves::Status)
                            .custom(Alias::new("leave_status"))
                            .not_null()
                            .default(Expr::cust("'PENDING'::leave_status")),
                    )
                    .col(ColumnDef::new(Leaves::Note).text().null())
                    .col(ColumnDef::new(Leaves::ReviewedBy).integer().null())
                    .col(ColumnDef::new(Leaves::ReviewedAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Leaves::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Leaves::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leaves_user")
                            .from(Leaves::Table, Leaves::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::ChoirId).integer().null())
                    .col(
                        ColumnDef::new(Transactions::Type)
                            .custom(Alias::new("transaction_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Category)
                            .custom(Alias::new("transaction_category"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Amount).decimal_len(14, 2).not_null())
                    .col(
                        ColumnDef::new(Transactions::Currency)
                            .char_len(3)
                            .not_null()
                            .default("RWF"),
                    )
                    .col(ColumnDef::new(Transactions::Description).text().null())
                    .col(ColumnDef::new(Transactions::ContributorId).integer().null())
                    .col(ColumnDef::new(Transactions::TransactionDate).date().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_choir")
                            .from(Transactions::Table, Transactions::ChoirId)
                            .to(Choirs::Table, Choirs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_contributor")
                            .from(Transactions::Table, Transactions::ContributorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_choir_date")
                    .table(Transactions::Table)
                    .col(Transactions::ChoirId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leaves::Table).to_owned())
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
enum Leaves {
    Table,
    Id,
    UserId,
    Reason,
    StartDate,
    EndDate,
    Status,
    Note,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    ChoirId,
    Type,
    Category,
    Amount,
    Currency,
    Description,
    ContributorId,
    TransactionDate,
    CreatedAt,
}
