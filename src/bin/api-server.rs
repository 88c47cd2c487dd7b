//! Copper Signal API Server
//!
//! Serves the dashboard readings, weighted score and BUY/SELL/HOLD signal,
//! and refreshes market data on demand.

use copper_signal::config::AppConfig;
use copper_signal::core::http::start_server;
use copper_signal::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env();
    info!("Starting Copper Signal API Server");
    info!(environment = %config.environment, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(path = %config.settings_path.display(), "Settings file");
    match &config.market_data.proxy_url {
        Some(proxy) => info!(
            base_url = %config.market_data.base_url,
            proxy = %proxy,
            "Market data via proxy"
        ),
        None => info!(base_url = %config.market_data.base_url, "Market data direct"),
    }

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        result = start_server(config) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
                return Err(e);
            }
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
