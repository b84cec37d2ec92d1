//! Gateway configuration.

use std::env;

use common::{ConfigError, DatabaseConfig, JwtConfig, ServiceConfig, StorageConfig};

/// Everything the `choir-api` binary reads from the environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    /// Origins allowed by CORS. Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServiceConfig::from_env("choir-api"),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env()?,
            storage: StorageConfig::from_env(),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" https://choir.example , http://localhost:5173,,"),
            vec!["https://choir.example", "http://localhost:5173"]
        );
    }

    #[test]
    fn wildcard_means_any_origin() {
        assert!(parse_origins("*").is_empty());
    }
}
