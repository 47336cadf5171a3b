//! Internal HTTP surface: JSON in, [`SearchResponse`](crate::domain::model::SearchResponse) out.

pub mod handlers;
pub mod routes;

use crate::config::toml_config::ServiceConfig;
use crate::core::search::ExternalSearch;
use crate::domain::ports::KnowledgeProvider;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

pub type SharedSearch = ExternalSearch<Arc<dyn KnowledgeProvider>, ServiceConfig>;
pub type AppState = Arc<SharedSearch>;

pub use routes::create_routes;

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState, config: &ServiceConfig) -> Result<()> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        provider = state.provider_name(),
        "Starting web search service on {}",
        addr
    );

    axum::serve(listener, create_routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web search service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
