//! CLI argument definitions.

use clap::{Parser, Subcommand};

use choir_service_lib::MigrateAction;
use domain::Role;

/// Choir administration API
#[derive(Parser, Debug)]
#[command(name = "choir-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create a back-office admin account
    CreateAdmin(CreateAdminArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateCommand,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum MigrateCommand {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop everything and re-run all migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CreateAdminArgs {
    #[arg(long)]
    pub email: String,

    /// Read from ADMIN_PASSWORD when not given
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub name: String,

    /// SUPER_ADMIN, CHOIR_ADMIN, ATTENDANCE_ADMIN or FINANCE_ADMIN
    #[arg(long, default_value = "SUPER_ADMIN")]
    pub role: Role,

    /// Choir the account is bound to; omit for an organization-wide account
    #[arg(long)]
    pub choir_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_admin_with_default_role() {
        let cli = Cli::try_parse_from([
            "choir-api",
            "create-admin",
            "--email",
            "root@choir.example",
            "--password",
            "correct-horse-battery",
            "--name",
            "Root Admin",
        ])
        .unwrap();

        match cli.command {
            Commands::CreateAdmin(args) => {
                assert_eq!(args.role, Role::SuperAdmin);
                assert_eq!(args.choir_id, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_role() {
        let parsed = Cli::try_parse_from([
            "choir-api",
            "create-admin",
            "--email",
            "a@choir.example",
            "--password",
            "correct-horse-battery",
            "--name",
            "A",
            "--role",
            "CONDUCTOR",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["choir-api", "migrate", "status", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateCommand::Status
            })
        ));
    }
}
