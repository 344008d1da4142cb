// Rural Ledger - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use rural_ledger::config::{ServerConfig, DEFAULT_PORT, PORT_ENV};
use rural_ledger::{router, AppState, ClientRegistry, Ledger, LedgerConfig, SensorLink, Simulator};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// In-memory revenue ledger behind a JSON API.
#[derive(Parser, Debug)]
#[command(name = "rural-ledger-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on.
    #[arg(long, short, default_value_t = DEFAULT_PORT, env = PORT_ENV)]
    port: u16,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = ServerConfig::with_port(cli.port);
    let ledger = Ledger::new(LedgerConfig::default());
    let registry = ClientRegistry::builtin();
    let hardware = Simulator::new();

    info!("rural-ledger v{}", rural_ledger::VERSION);
    info!(target = %ledger.config().monthly_target, "monthly revenue target");
    info!(clients = registry.len(), "client registry loaded");
    if hardware.is_connected() {
        info!("hardware interface connected");
    } else {
        tracing::warn!("hardware not connected, serving simulated readings");
    }

    let addr = config.bind_addr();
    let app = router(AppState::new(ledger, registry, hardware, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
