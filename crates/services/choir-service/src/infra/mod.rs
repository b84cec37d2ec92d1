//! Infrastructure: database connection and schema migrations.

mod db;
pub mod migrations;

pub use db::Database;
