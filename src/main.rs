use clap::Parser;
use miette::{IntoDiagnostic, Result};
use startup_pulse::application::checkout::CheckoutService;
use startup_pulse::application::intake::IntakeService;
use startup_pulse::config::{Config, GatewaySettings};
use startup_pulse::infrastructure::Stores;
use startup_pulse::interfaces::http::{AppState, router};
use std::io::IsTerminal;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "startup_pulse=info,tower_http=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<&Path>) -> startup_pulse::error::Result<Stores> {
    use startup_pulse::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            info!(path = %path.display(), "using RocksDB storage");
            Ok(Stores::persistent(RocksDBStore::open(path)?))
        }
        None => Ok(Stores::in_memory()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<&Path>) -> startup_pulse::error::Result<Stores> {
    if db_path.is_some() {
        warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Stores::in_memory())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing();

    let settings = config.gateway_settings().into_diagnostic()?;
    let timeout = config.gateway_timeout().into_diagnostic()?;
    let currency = config.currency().into_diagnostic()?;
    if settings == GatewaySettings::Mock {
        warn!("no payment gateway credentials configured, running in mock mode");
    }
    let gateway = settings.build(timeout).into_diagnostic()?;
    let stores = open_stores(config.db_path.as_deref()).into_diagnostic()?;

    info!(
        mode = settings.mode(),
        %currency,
        timeout_secs = timeout.as_secs(),
        price_policy = ?config.price_policy(),
        "configuration resolved"
    );
    if config.check_config {
        return Ok(());
    }

    let intake = IntakeService::new(stores.clone());
    let checkout = CheckoutService::new(stores.payments.clone(), gateway, currency)
        .with_timeout(timeout)
        .with_price_policy(config.price_policy());
    let app = router(AppState::new(intake, checkout), &config.cors_origins).into_diagnostic()?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .into_diagnostic()?;
    info!(addr = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    Ok(())
}
