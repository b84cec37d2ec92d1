//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_choirs_and_users;
mod m20240101_000002_create_events_and_attendance;
mod m20240101_000003_create_leaves_and_transactions;
mod m20240101_000004_create_repertoire;
mod m20240101_000005_create_shifts;
mod m20240101_000006_create_communiques_and_reports;
mod m20240215_000001_add_user_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_choirs_and_users::Migration),
            Box::new(m20240101_000002_create_events_and_attendance::Migration),
            Box::new(m20240101_000003_create_leaves_and_transactions::Migration),
            Box::new(m20240101_000004_create_repertoire::Migration),
            Box::new(m20240101_000005_create_shifts::Migration),
            Box::new(m20240101_000006_create_communiques_and_reports::Migration),
            Box::new(m20240215_000001_add_user_status::Migration),
        ]
    }
}
