//! Common utilities shared by the choir service and the gateway.
//!
//! This crate provides:
//! - Unified error handling and its HTTP mapping
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
