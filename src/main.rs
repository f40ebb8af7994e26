use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use stock_sales_dashboard::config::{ProviderKind, ServerConfig};
use stock_sales_dashboard::external::price_provider::PriceProvider;
use stock_sales_dashboard::external::synthetic::SyntheticProvider;
use stock_sales_dashboard::external::yahoofinance::YahooFinanceProvider;
use stock_sales_dashboard::logging::{init_logging, LoggingConfig};
use stock_sales_dashboard::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let provider: Arc<dyn PriceProvider> = match config.price_provider {
        ProviderKind::Yahoo => {
            tracing::info!("📊 Using price provider: Yahoo Finance");
            Arc::new(YahooFinanceProvider::new())
        }
        ProviderKind::Synthetic => {
            tracing::info!("📊 Using price provider: synthetic random walk (offline)");
            Arc::new(SyntheticProvider::new())
        }
    };

    let state = AppState::new(provider, &config.default_ticker);
    let app = create_app(state);

    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Dashboard running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
