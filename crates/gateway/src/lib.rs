//! API Gateway Library
//!
//! HTTP surface for the account service: registration, login and the
//! bearer-protected profile routes.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

use tokio::net::TcpListener;
use tracing::{error, info};

use account_service_lib::{build_service, infra::Database};

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Connect to the database, apply migrations and serve HTTP until shutdown.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.accounts.database).await?;
    let accounts = build_service(&db, &config.accounts.jwt);

    let app = create_router(AppState::new(accounts));

    let listener = TcpListener::bind(config.server.addr()).await?;
    info!("Gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
