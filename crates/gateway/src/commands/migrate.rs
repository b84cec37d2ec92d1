//! Migrate command - database migration management.

use std::error::Error;

use choir_service_lib::run_migrations;
use common::DatabaseConfig;

use crate::cli::MigrateArgs;

pub async fn execute(args: MigrateArgs) -> Result<(), Box<dyn Error>> {
    let database = DatabaseConfig::from_env();
    tracing::info!(action = ?args.action, "Running migration command");
    run_migrations(&database.url, args.action.into()).await
}
