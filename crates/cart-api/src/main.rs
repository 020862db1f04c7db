//! `shop-cart` binary: serves the catalog and one session cart over HTTP.
//!
//! Configuration comes from the environment (or a `.env` file):
//! `HOST`, `PORT`, `ENVIRONMENT`, `CATALOG_PATH`. Log filtering follows
//! `RUST_LOG` and defaults to `info`.

use cart_api::{create_router, AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let state = AppState::new()?;
    let addr = state.config.socket_addr()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %state.config.environment,
        products = state.catalog.len(),
        categories = state.catalog.categories().len(),
        session = %state.cart.session_id(),
        "shop-cart configured"
    );
    if !state.config.is_production() {
        info!("catalog at http://{}/api/v1/products, cart at http://{}/api/v1/cart", addr, addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the state ends the cart session.
    info!("shop-cart stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested, draining connections");
}
