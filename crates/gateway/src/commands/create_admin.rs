//! Create-admin command - bootstraps a back-office account.
//!
//! The first super admin cannot be created over HTTP, since every admin
//! endpoint already requires one.

use std::error::Error;
use std::sync::Arc;

use choir_service_lib::infra::Database;
use choir_service_lib::repository::AdminUserStore;
use choir_service_lib::service::{AdminManager, AdminService, NewAdminAccount};
use common::DatabaseConfig;

use crate::cli::CreateAdminArgs;

pub async fn execute(args: CreateAdminArgs) -> Result<(), Box<dyn Error>> {
    let db = Database::connect(&DatabaseConfig::from_env()).await?;
    let admins = AdminManager::new(Arc::new(AdminUserStore::new(db.get_connection())));

    let admin = admins
        .create_admin(NewAdminAccount {
            email: args.email,
            password: args.password,
            full_name: args.name,
            role: args.role,
            choir_id: args.choir_id,
        })
        .await?;

    tracing::info!(
        admin_id = admin.id,
        email = %admin.email,
        role = %admin.role,
        "Admin account created"
    );
    println!("Created {} account {} (id {})", admin.role, admin.email, admin.id);
    Ok(())
}
