// Web server for the livestock feed predictor

use clap::Parser;
use log::{error, info};

use livestock_predict::web::config::{Cli, LoadStrategy, ServerConfig};
use livestock_predict::web::logger::setup_logging;
use livestock_predict::web::model_manager::initialize;
use livestock_predict::web::server::serve;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from(Cli::parse());

    if let Err(e) = setup_logging(config.log_level, config.log_dir.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
    }

    // Eager mode reads the artifact here, before any connection is accepted.
    let state = initialize(&config);
    if config.load_strategy == LoadStrategy::Lazy {
        info!("Lazy loading enabled, model will load on first /predict");
    }

    let (addr, server) = serve(config.bind_addr(), state, shutdown_signal())?;

    info!("Livestock feed predictor starting on http://{addr}");
    info!("Available endpoints:");
    info!("  POST    /predict  - Predict DMD, OMD, ME, CH4 from a feature record");
    info!("  OPTIONS /predict  - CORS preflight");
    info!("  GET     /test     - Backend and model status");

    server.await?;
    Ok(())
}
