//! API gate.
//!
//! ```text
//!     Client ──▶ listener ──▶ request id / trace ──▶ gate ──▶ forwarder ──▶ API server
//!                                                     │
//!                     429 / 400 / 204 / 401 ◀─────────┘
//! ```
//!
//! The gate applies to paths under the API prefix only:
//! rate limit → origin check → preflight → route exclusion → bearer token.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use api_gate::config::{loader, GateConfig};
use api_gate::lifecycle::{signals, Shutdown};
use api_gate::observability::{logging, metrics};
use api_gate::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "api-gate")]
#[command(about = "Rate limiting, CORS and JWT gate for dApp API routes")]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "GATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => loader::finalize(GateConfig::default())?,
    };

    logging::init(&config.observability.log_level);
    tracing::info!("api-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        config_file = ?args.config,
        environment = %config.cors.environment,
        allowed_origins = ?config.cors.active_origins(),
        tokens_per_interval = config.rate_limit.tokens_per_interval,
        interval_secs = config.rate_limit.interval_secs,
        excluded_routes = config.auth.excluded_routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
