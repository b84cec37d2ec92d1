//! Serve command - starts the HTTP server.

use std::error::Error;

use crate::cli::ServeArgs;
use crate::config::GatewayConfig;

pub async fn execute(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let mut config = GatewayConfig::from_env()?;
    config.server.host = args.host;
    config.server.port = args.port;

    crate::run_server(config).await
}
