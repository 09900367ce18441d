//! Gateway entry-point: loads settings, wires provider adapters, and serves
//! the email and notification endpoints.

mod server;

use std::env;

use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use comms_gateway::config::GatewaySettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = GatewaySettings::load_from_iter(env::args_os())
        .map_err(|error| std::io::Error::other(format!("failed to load settings: {error}")))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_settings(&settings)
        .map_err(|error| std::io::Error::other(format!("invalid configuration: {error}")))?;
    let bind_addr = config.bind_addr();
    let server = create_server(config)?;
    info!(%bind_addr, "comms gateway listening");
    server.await
}
